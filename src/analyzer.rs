//! Inference engine: Blends the primitive's raw score with the tuned lexicon,
//! classifies against the tuned thresholds and reports a decomposed confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{InferenceError, StoreError};
use crate::lexicon::Lexicon;
use crate::primitive::SentimentPrimitive;
use crate::store::ArtifactStore;
use crate::tuning::Thresholds;

/// Keywords attached to every successful result.
const KEYWORD_COUNT: usize = 3;
/// Token count at which the length factor saturates.
const LENGTH_SATURATION: f64 = 20.0;
const MIN_CONFIDENCE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 1.0;
/// Neutral calls are inherently less certain.
const NEUTRAL_DISCOUNT: f64 = 0.9;

// Factor weights: polarity, coverage, length, consistency.
const W_POLARITY: f64 = 0.4;
const W_COVERAGE: f64 = 0.3;
const W_LENGTH: f64 = 0.1;
const W_CONSISTENCY: f64 = 0.2;

// ── Snapshot ───────────────────────────────────────────────

/// Immutable lexicon + thresholds pair. The analyzer holds one behind an
/// `Arc`; a reload builds a new snapshot and swaps it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelSnapshot {
    lexicon: Lexicon,
    thresholds: Thresholds,
}

impl ModelSnapshot {
    pub fn new(lexicon: Lexicon, thresholds: Thresholds) -> Self {
        Self {
            lexicon,
            thresholds,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}

// ── Results ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Positive,
    Negative,
    Neutral,
}

impl Category {
    pub fn classify(score: f64, thresholds: &Thresholds) -> Self {
        if score > thresholds.positive {
            Category::Positive
        } else if score < thresholds.negative {
            Category::Negative
        } else {
            Category::Neutral
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Positive => "positive",
            Category::Negative => "negative",
            Category::Neutral => "neutral",
        })
    }
}

/// The four independent signals blended into the final confidence, each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceFactors {
    pub polarity: f64,
    pub dictionary_coverage: f64,
    pub length_sufficiency: f64,
    pub consistency: f64,
}

impl ConfidenceFactors {
    fn blend(&self) -> f64 {
        W_POLARITY * self.polarity
            + W_COVERAGE * self.dictionary_coverage
            + W_LENGTH * self.length_sufficiency
            + W_CONSISTENCY * self.consistency
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    /// Adjusted score: raw score blended with lexicon evidence.
    #[serde(rename = "adjusted_score")]
    pub score: f64,
    pub raw_score: f64,
    pub category: Category,
    pub confidence: f64,
    pub confidence_factors: ConfidenceFactors,
    pub matched_tokens: usize,
    pub total_tokens: usize,
    pub keywords: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success(Analysis),
    Failure {
        #[serde(rename = "error_message")]
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            AnalysisResult::Success(a) => Some(a),
            AnalysisResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisResult::Success(_) => None,
            AnalysisResult::Failure { message, .. } => Some(message),
        }
    }
}

// ── Scoring ────────────────────────────────────────────────

/// Outcome of blending one text's raw score with the lexicon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blended {
    pub score: f64,
    pub category: Category,
    pub confidence: f64,
    pub factors: ConfidenceFactors,
    pub matched: usize,
}

/// Blend a raw score with lexicon evidence for the given tokens.
///
/// Matched tokens contribute their lexicon value weighted by
/// `1 + 2·|v − 0.5|`; unmatched tokens only lower the coverage factor.
pub fn blend(raw_score: f64, tokens: &[String], snapshot: &ModelSnapshot) -> Blended {
    let matched: Vec<f64> = tokens
        .iter()
        .filter_map(|t| snapshot.lexicon.get(t))
        .collect();
    let total = tokens.len();

    let score = if matched.is_empty() {
        raw_score
    } else {
        let (sum, weight) = matched.iter().fold((0.0, 0.0), |(sum, weight), &v| {
            let w = 1.0 + 2.0 * (v - 0.5).abs();
            (sum + v * w, weight + w)
        });
        (raw_score + sum / weight) / 2.0
    };

    let consistency = if matched.is_empty() {
        1.0
    } else {
        let mean = matched.iter().sum::<f64>() / matched.len() as f64;
        1.0 - (raw_score - mean).abs() / 2.0
    };

    let factors = ConfidenceFactors {
        polarity: ((score - 0.5).abs() * 2.0).clamp(0.0, 1.0),
        dictionary_coverage: if total == 0 {
            0.0
        } else {
            matched.len() as f64 / total as f64
        },
        length_sufficiency: (total as f64 / LENGTH_SATURATION).min(1.0),
        consistency: consistency.clamp(0.0, 1.0),
    };

    let category = Category::classify(score, &snapshot.thresholds);
    let mut confidence = factors.blend().clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    if category == Category::Neutral {
        // The discount must not push a result under the confidence floor.
        confidence = (confidence * NEUTRAL_DISCOUNT).max(MIN_CONFIDENCE);
    }

    Blended {
        score,
        category,
        confidence,
        factors,
        matched: matched.len(),
    }
}

// ── Analyzer ───────────────────────────────────────────────

pub struct SentimentAnalyzer {
    primitive: Arc<dyn SentimentPrimitive>,
    snapshot: Arc<ModelSnapshot>,
}

impl SentimentAnalyzer {
    pub fn new(primitive: Arc<dyn SentimentPrimitive>, snapshot: ModelSnapshot) -> Self {
        Self {
            primitive,
            snapshot: Arc::new(snapshot),
        }
    }

    /// Analyzer over whatever lexicon and thresholds are currently persisted.
    pub fn from_store(primitive: Arc<dyn SentimentPrimitive>, store: &ArtifactStore) -> Result<Self, StoreError> {
        let snapshot = store.load_snapshot()?;
        info!(
            "[Analyzer] Loaded snapshot: {} dictionary words, thresholds {:.2}/{:.2}",
            snapshot.lexicon.len(),
            snapshot.thresholds.positive,
            snapshot.thresholds.negative
        );
        Ok(Self::new(primitive, snapshot))
    }

    pub fn snapshot(&self) -> Arc<ModelSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Swap in a new snapshot (e.g. the one returned by a tuning run).
    pub fn install(&mut self, snapshot: ModelSnapshot) {
        self.snapshot = Arc::new(snapshot);
    }

    /// Re-read the persisted artifacts. On failure the current snapshot stays in place.
    pub fn reload(&mut self, store: &ArtifactStore) -> Result<(), StoreError> {
        let snapshot = store.load_snapshot()?;
        info!(
            "[Analyzer] Reloaded snapshot: {} dictionary words",
            snapshot.lexicon.len()
        );
        self.install(snapshot);
        Ok(())
    }

    /// Analyze one text. Never fails outright: errors come back as
    /// [`AnalysisResult::Failure`].
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        match self.try_analyze(text) {
            Ok(analysis) => {
                debug!(
                    "[Analyzer] score={:.3} category={} confidence={:.3}",
                    analysis.score, analysis.category, analysis.confidence
                );
                AnalysisResult::Success(analysis)
            }
            Err(e) => {
                warn!("[Analyzer] Analysis failed: {}", e);
                AnalysisResult::Failure {
                    message: e.to_string(),
                    timestamp: Utc::now(),
                }
            }
        }
    }

    fn try_analyze(&self, text: &str) -> Result<Analysis, InferenceError> {
        if text.trim().is_empty() {
            return Err(InferenceError::EmptyInput);
        }

        let raw_score = self.primitive.score(text)?;
        if !raw_score.is_finite() || !(0.0..=1.0).contains(&raw_score) {
            return Err(InferenceError::InvalidScore(raw_score));
        }
        let tokens = self.primitive.segment(text)?;

        let blended = blend(raw_score, &tokens, &self.snapshot);
        if !blended.score.is_finite() {
            return Err(InferenceError::InvalidScore(blended.score));
        }

        let keywords = self.primitive.keywords(text, KEYWORD_COUNT)?;

        Ok(Analysis {
            score: blended.score,
            raw_score,
            category: blended.category,
            confidence: blended.confidence,
            confidence_factors: blended.factors,
            matched_tokens: blended.matched,
            total_tokens: tokens.len(),
            keywords,
            timestamp: Utc::now(),
        })
    }
}
