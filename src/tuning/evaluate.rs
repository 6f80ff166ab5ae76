//! Held-out evaluation of a tuned threshold configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{info, warn};

use super::thresholds::{agrees, Thresholds};
use crate::corpus::LabeledSample;
use crate::error::{TuneError, TuneResult};
use crate::primitive::{self, SentimentPrimitive};

/// Samples above this confidence form the high-confidence subset.
pub const HIGH_CONFIDENCE_CUTOFF: f64 = 0.8;

/// One evaluated sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub predicted: f64,
    pub label: f64,
    /// `|raw − 0.5| × 2`.
    pub confidence: f64,
}

impl Prediction {
    pub fn new(raw_score: f64, label: f64, thresholds: &Thresholds) -> Self {
        Self {
            predicted: thresholds.predict(raw_score),
            label,
            confidence: (raw_score - 0.5).abs() * 2.0,
        }
    }

    fn correct(&self) -> bool {
        agrees(self.predicted, self.label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub average_error: f64,
    pub average_confidence: f64,
    /// `0.0` when no sample clears [`HIGH_CONFIDENCE_CUTOFF`]; see `high_confidence_defined`.
    pub high_confidence_accuracy: f64,
    pub high_confidence_defined: bool,
    pub high_confidence_count: usize,
    pub sample_count: usize,
}

impl EvaluationMetrics {
    /// Human-readable report, one metric per line.
    pub fn report(&self, evaluated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Evaluated at: {}", evaluated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Samples: {}", self.sample_count);
        let _ = writeln!(out, "Metrics:");
        let _ = writeln!(out, "accuracy: {}", self.accuracy);
        let _ = writeln!(out, "average_error: {}", self.average_error);
        let _ = writeln!(out, "average_confidence: {}", self.average_confidence);
        if self.high_confidence_defined {
            let _ = writeln!(
                out,
                "high_confidence_accuracy: {} ({} samples)",
                self.high_confidence_accuracy, self.high_confidence_count
            );
        } else {
            let _ = writeln!(
                out,
                "high_confidence_accuracy: undefined (no sample above {} confidence)",
                HIGH_CONFIDENCE_CUTOFF
            );
        }
        out
    }
}

/// Aggregate metrics over evaluated samples. Pure; identical input gives identical output.
pub fn compute_metrics(predictions: &[Prediction]) -> TuneResult<EvaluationMetrics> {
    if predictions.is_empty() {
        return Err(TuneError::Evaluation(
            "cannot evaluate an empty sample set".to_string(),
        ));
    }

    let n = predictions.len() as f64;
    let correct = predictions.iter().filter(|p| p.correct()).count();
    let error_sum: f64 = predictions.iter().map(|p| (p.predicted - p.label).abs()).sum();
    let confidence_sum: f64 = predictions.iter().map(|p| p.confidence).sum();

    let high: Vec<&Prediction> = predictions
        .iter()
        .filter(|p| p.confidence > HIGH_CONFIDENCE_CUTOFF)
        .collect();
    let high_correct = high.iter().filter(|p| p.correct()).count();
    let high_confidence_defined = !high.is_empty();
    let high_confidence_accuracy = if high_confidence_defined {
        high_correct as f64 / high.len() as f64
    } else {
        0.0
    };

    Ok(EvaluationMetrics {
        accuracy: correct as f64 / n,
        average_error: error_sum / n,
        average_confidence: confidence_sum / n,
        high_confidence_accuracy,
        high_confidence_defined,
        high_confidence_count: high.len(),
        sample_count: predictions.len(),
    })
}

/// Apply tuned thresholds to the primitive's raw scores and measure agreement.
pub fn evaluate(
    samples: &[LabeledSample],
    thresholds: &Thresholds,
    primitive: &dyn SentimentPrimitive,
) -> TuneResult<EvaluationMetrics> {
    let raw = primitive::score_all(primitive, samples.iter().map(|s| s.text.as_str()))
        .map_err(|e| TuneError::Evaluation(format!("scoring samples: {}", e)))?;

    let predictions: Vec<Prediction> = raw
        .into_iter()
        .zip(samples)
        .map(|(score, sample)| Prediction::new(score, sample.sentiment, thresholds))
        .collect();

    let metrics = compute_metrics(&predictions)?;
    if !metrics.high_confidence_defined {
        warn!(
            "[Evaluate] No sample above {} confidence; high_confidence_accuracy is undefined",
            HIGH_CONFIDENCE_CUTOFF
        );
    }
    info!(
        "[Evaluate] accuracy={:.2} average_error={:.2} average_confidence={:.2}",
        metrics.accuracy, metrics.average_error, metrics.average_confidence
    );
    Ok(metrics)
}
