//! SentiTune: Lightweight Chinese sentiment scoring with a self-tuning
//! lexicon and thresholds.
//!
//! Presentation layers talk to two entry points:
//! [`SentimentAnalyzer::analyze`] for single texts and
//! [`TuningManager::run`] for the generate → dictionary → thresholds →
//! evaluate pipeline.

pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod primitive;
pub mod store;
pub mod tuning;

#[cfg(test)]
mod tests;

pub use analyzer::{AnalysisResult, Category, ModelSnapshot, SentimentAnalyzer};
pub use config::TuneConfig;
pub use error::{InferenceError, PrimitiveError, StoreError, TuneError};
pub use lexicon::Lexicon;
pub use primitive::{KeywordPrimitive, SentimentPrimitive};
pub use store::{ArtifactStore, ModelInfo};
pub use tuning::{EvaluationMetrics, Thresholds, TuningManager, TuningOutcome};
