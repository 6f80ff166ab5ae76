//! Sentiment primitive: The black box that segments text, scores its raw
//! polarity and extracts keywords. The tuning pipeline and the analyzer only
//! ever talk to it through [`SentimentPrimitive`].

pub mod keyword;

pub use keyword::KeywordPrimitive;

use crate::error::PrimitiveError;

// ── Primitive Trait ────────────────────────────────────

pub trait SentimentPrimitive: Send + Sync {
    /// Unique identifier for this primitive (e.g. "keyword").
    fn id(&self) -> &str;

    /// Split text into an ordered token sequence.
    fn segment(&self, text: &str) -> Result<Vec<String>, PrimitiveError>;

    /// Raw sentiment probability in [0, 1] (0 = negative, 1 = positive).
    fn score(&self, text: &str) -> Result<f64, PrimitiveError>;

    /// Up to `k` keywords, most salient first.
    fn keywords(&self, text: &str, k: usize) -> Result<Vec<String>, PrimitiveError>;
}

/// Raw scores for a batch of texts, computed once each.
pub fn score_all<'a, I>(primitive: &dyn SentimentPrimitive, texts: I) -> Result<Vec<f64>, PrimitiveError>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(|t| primitive.score(t)).collect()
}
