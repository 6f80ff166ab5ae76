use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::corpus::{LabeledSample, SentimentClass};
use crate::error::PrimitiveError;
use crate::primitive::SentimentPrimitive;

pub fn sample(text: &str, sentiment: f64, class: SentimentClass) -> LabeledSample {
    LabeledSample {
        text: text.to_string(),
        sentiment,
        class,
    }
}

// ── Scripted primitive ──────────────────────────────────────

/// Deterministic stand-in for a real sentiment model.
///
/// Unscripted texts segment on whitespace and score 0.5. Keywords are the
/// first `k` tokens.
#[derive(Default)]
pub struct ScriptedPrimitive {
    tokens: HashMap<String, Vec<String>>,
    scores: HashMap<String, f64>,
    default_score: Option<f64>,
    fail_segment: bool,
    fail_score: bool,
    score_calls: AtomicUsize,
}

impl ScriptedPrimitive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(mut self, text: &str, tokens: &[&str]) -> Self {
        self.tokens.insert(
            text.to_string(),
            tokens.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_score(mut self, text: &str, score: f64) -> Self {
        self.scores.insert(text.to_string(), score);
        self
    }

    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = Some(score);
        self
    }

    pub fn failing_segment(mut self) -> Self {
        self.fail_segment = true;
        self
    }

    pub fn failing_score(mut self) -> Self {
        self.fail_score = true;
        self
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    fn split(&self, text: &str) -> Vec<String> {
        match self.tokens.get(text) {
            Some(tokens) => tokens.clone(),
            None => text.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl SentimentPrimitive for ScriptedPrimitive {
    fn id(&self) -> &str {
        "scripted"
    }

    fn segment(&self, text: &str) -> Result<Vec<String>, PrimitiveError> {
        if self.fail_segment {
            return Err(PrimitiveError::Segmentation("scripted failure".to_string()));
        }
        Ok(self.split(text))
    }

    fn score(&self, text: &str) -> Result<f64, PrimitiveError> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_score {
            return Err(PrimitiveError::Scoring("scripted failure".to_string()));
        }
        Ok(self
            .scores
            .get(text)
            .copied()
            .or(self.default_score)
            .unwrap_or(0.5))
    }

    fn keywords(&self, text: &str, k: usize) -> Result<Vec<String>, PrimitiveError> {
        Ok(self.split(text).into_iter().take(k).collect())
    }
}
