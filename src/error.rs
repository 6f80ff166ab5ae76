//! Error types shared across the tuning pipeline and the analyzer.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`SentimentPrimitive`](crate::primitive::SentimentPrimitive).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrimitiveError {
    #[error("segmentation failed: {0}")]
    Segmentation(String),

    #[error("scoring failed: {0}")]
    Scoring(String),

    #[error("keyword extraction failed: {0}")]
    Keywords(String),
}

/// Artifact persistence failures. Every variant names the file involved.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid thresholds in {path}: positive {positive} must exceed negative {negative}")]
    InvalidThresholds {
        path: PathBuf,
        positive: f64,
        negative: f64,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Pipeline failure, tagged with the stage that aborted.
#[derive(Error, Debug)]
pub enum TuneError {
    /// Corpus could not be generated or written.
    #[error("generation error: {0}")]
    Generation(String),

    /// Primitive failure during aggregation, or the lexicon could not be written.
    #[error("dictionary error: {0}")]
    Dictionary(String),

    /// No usable threshold pair, or the thresholds could not be written.
    #[error("optimization error: {0}")]
    Optimization(String),

    /// Metrics could not be computed or written.
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl TuneError {
    /// Short stage name, used in logs.
    pub fn stage(&self) -> &'static str {
        match self {
            TuneError::Generation(_) => "generation",
            TuneError::Dictionary(_) => "dictionary",
            TuneError::Optimization(_) => "optimization",
            TuneError::Evaluation(_) => "evaluation",
        }
    }
}

pub type TuneResult<T> = Result<T, TuneError>;

/// Per-call analysis failure. Never escapes [`SentimentAnalyzer::analyze`](crate::analyzer::SentimentAnalyzer::analyze);
/// it is folded into a failure result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("input text is empty")]
    EmptyInput,

    #[error(transparent)]
    Primitive(#[from] PrimitiveError),

    #[error("primitive returned an invalid raw score: {0}")]
    InvalidScore(f64),
}
