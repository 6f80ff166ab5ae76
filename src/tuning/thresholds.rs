//! Threshold configuration and the grid search that tunes it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::corpus::LabeledSample;
use crate::error::{TuneError, TuneResult};
use crate::primitive::{self, SentimentPrimitive};

/// A prediction counts as correct when it lands within this distance of the label.
pub const AGREEMENT_TOLERANCE: f64 = 0.3;

/// Category cut-offs on the [0, 1] sentiment axis. Invariant: `positive > negative`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            positive: 0.7,
            negative: 0.3,
        }
    }
}

impl Thresholds {
    pub fn is_valid(&self) -> bool {
        self.positive.is_finite() && self.negative.is_finite() && self.positive > self.negative
    }

    /// Three-way predicted label: 1.0 above `positive`, 0.0 below `negative`, else 0.5.
    pub fn predict(&self, raw_score: f64) -> f64 {
        if raw_score > self.positive {
            1.0
        } else if raw_score < self.negative {
            0.0
        } else {
            0.5
        }
    }
}

/// Whether a predicted label agrees with the true label.
pub fn agrees(predicted: f64, label: f64) -> bool {
    (predicted - label).abs() < AGREEMENT_TOLERANCE
}

// ── Grid ───────────────────────────────────────────────────

/// Upper bound on values per grid axis; finer steps are truncated.
pub const MAX_GRID_STEPS: usize = 1000;

/// Half-open range `[start, stop)` walked in `step` increments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl GridRange {
    pub const fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Grid values, each computed as `start + i × step` to avoid accumulated drift.
    pub fn values(&self) -> Vec<f64> {
        if !(self.step > 0.0) || !self.start.is_finite() || !self.stop.is_finite() {
            return Vec::new();
        }
        let span = self.stop - self.start;
        if span <= 0.0 {
            return Vec::new();
        }
        let needed = (span / self.step).ceil();
        if needed > MAX_GRID_STEPS as f64 {
            warn!(
                "[Thresholds] Grid [{}, {}) step {} needs {} values, truncating to {}",
                self.start, self.stop, self.step, needed, MAX_GRID_STEPS
            );
        }
        let count = needed.min(MAX_GRID_STEPS as f64) as usize;

        // Small slack so a float landing a hair under `stop` is not mistaken for an extra step.
        let slack = self.step * 1e-9;
        (0..count)
            .map(|i| self.start + i as f64 * self.step)
            .take_while(|v| *v < self.stop - slack)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdGrid {
    pub positive: GridRange,
    pub negative: GridRange,
}

impl Default for ThresholdGrid {
    fn default() -> Self {
        Self {
            positive: GridRange::new(0.6, 0.9, 0.02),
            negative: GridRange::new(0.2, 0.5, 0.02),
        }
    }
}

impl ThresholdGrid {
    /// Valid `(positive, negative)` pairs in search order: ascending positive,
    /// then ascending negative.
    pub fn pairs(&self) -> Vec<Thresholds> {
        let negatives = self.negative.values();
        self.positive
            .values()
            .into_iter()
            .flat_map(|positive| {
                negatives
                    .iter()
                    .map(move |&negative| Thresholds { positive, negative })
            })
            .filter(Thresholds::is_valid)
            .collect()
    }
}

// ── Search ─────────────────────────────────────────────────

/// Fraction of samples whose predicted label agrees with the true label.
pub fn accuracy(scored: &[(f64, f64)], thresholds: &Thresholds) -> f64 {
    if scored.is_empty() {
        return 0.0;
    }
    let correct = scored
        .iter()
        .filter(|(raw, label)| agrees(thresholds.predict(*raw), *label))
        .count();
    correct as f64 / scored.len() as f64
}

/// Pick the grid pair with the highest accuracy over precomputed
/// `(raw_score, label)` pairs. The first maximum in search order wins.
pub fn search_thresholds(scored: &[(f64, f64)], grid: &ThresholdGrid) -> TuneResult<(Thresholds, f64)> {
    if scored.is_empty() {
        return Err(TuneError::Optimization(
            "cannot optimize thresholds on an empty sample set".to_string(),
        ));
    }

    let mut best: Option<(Thresholds, f64)> = None;
    for candidate in grid.pairs() {
        let acc = accuracy(scored, &candidate);
        let improved = match best {
            Some((_, best_acc)) => acc > best_acc,
            None => true,
        };
        if improved {
            debug!(
                "[Thresholds] New best: positive={:.2} negative={:.2} accuracy={:.4}",
                candidate.positive, candidate.negative, acc
            );
            best = Some((candidate, acc));
        }
    }

    best.ok_or_else(|| {
        TuneError::Optimization("threshold grid produced no valid (positive > negative) pair".to_string())
    })
}

/// Score every sample once with the primitive, then grid-search thresholds.
pub fn optimize_thresholds(
    samples: &[LabeledSample],
    primitive: &dyn SentimentPrimitive,
    grid: &ThresholdGrid,
) -> TuneResult<Thresholds> {
    let raw = primitive::score_all(primitive, samples.iter().map(|s| s.text.as_str()))
        .map_err(|e| TuneError::Optimization(format!("scoring samples: {}", e)))?;
    let scored: Vec<(f64, f64)> = raw
        .into_iter()
        .zip(samples.iter().map(|s| s.sentiment))
        .collect();

    let (best, acc) = search_thresholds(&scored, grid)?;
    info!(
        "[Thresholds] Optimized: positive={:.2}, negative={:.2}, accuracy={:.2}",
        best.positive, best.negative, acc
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SentimentClass;
    use crate::tests::helpers::{sample, ScriptedPrimitive};

    #[test]
    fn default_grid_has_fifteen_steps_per_axis() {
        let grid = ThresholdGrid::default();
        let pos = grid.positive.values();
        let neg = grid.negative.values();
        assert_eq!(pos.len(), 15);
        assert_eq!(neg.len(), 15);
        assert!((pos[0] - 0.6).abs() < 1e-12);
        assert!((pos[14] - 0.88).abs() < 1e-9);
        assert!((neg[14] - 0.48).abs() < 1e-9);
        assert_eq!(grid.pairs().len(), 225);
    }

    #[test]
    fn tiny_step_is_capped() {
        let range = GridRange::new(0.2, 0.5, 1e-12);
        let values = range.values();
        assert_eq!(values.len(), MAX_GRID_STEPS);
        assert!((values[1] - values[0] - 1e-12).abs() < 1e-15);
    }

    #[test]
    fn degenerate_ranges_are_empty() {
        assert!(GridRange::new(0.5, 0.5, 0.02).values().is_empty());
        assert!(GridRange::new(0.9, 0.6, 0.02).values().is_empty());
        assert!(GridRange::new(0.2, 0.5, 0.0).values().is_empty());
        assert!(GridRange::new(0.2, 0.5, f64::NAN).values().is_empty());
    }

    #[test]
    fn predict_uses_strict_bounds() {
        let t = Thresholds::default();
        assert_eq!(t.predict(0.71), 1.0);
        assert_eq!(t.predict(0.7), 0.5);
        assert_eq!(t.predict(0.3), 0.5);
        assert_eq!(t.predict(0.29), 0.0);
    }

    #[test]
    fn first_maximum_wins() {
        // Every sample is neutral-labeled with a neutral raw score: every pair scores 1.0.
        let scored = vec![(0.5, 0.5), (0.55, 0.5)];
        let (best, acc) = search_thresholds(&scored, &ThresholdGrid::default()).unwrap();
        assert_eq!(acc, 1.0);
        assert!((best.positive - 0.6).abs() < 1e-12);
        assert!((best.negative - 0.2).abs() < 1e-12);
    }

    #[test]
    fn all_zero_accuracy_still_returns_a_pair() {
        // A raw 0.55 always predicts neutral; a 1.0 label never agrees with it.
        let scored = vec![(0.55, 1.0)];
        let (best, acc) = search_thresholds(&scored, &ThresholdGrid::default()).unwrap();
        assert_eq!(acc, 0.0);
        assert!(best.is_valid());
    }

    #[test]
    fn finds_separating_thresholds() {
        let scored = vec![(0.85, 1.0), (0.75, 0.9), (0.45, 0.5), (0.25, 0.1), (0.35, 0.0)];
        let (best, acc) = search_thresholds(&scored, &ThresholdGrid::default()).unwrap();
        assert_eq!(acc, 1.0);
        assert!(best.positive < 0.75);
        assert!(best.negative > 0.35 && best.negative < 0.45);
    }

    #[test]
    fn overlapping_grid_reports_no_valid_pair() {
        let grid = ThresholdGrid {
            positive: GridRange::new(0.1, 0.3, 0.1),
            negative: GridRange::new(0.5, 0.7, 0.1),
        };
        let err = search_thresholds(&[(0.5, 0.5)], &grid).unwrap_err();
        assert!(matches!(err, TuneError::Optimization(_)));
    }

    #[test]
    fn empty_samples_are_rejected() {
        let err = search_thresholds(&[], &ThresholdGrid::default()).unwrap_err();
        assert!(matches!(err, TuneError::Optimization(_)));
    }

    #[test]
    fn optimize_scores_each_sample_once() {
        let primitive = ScriptedPrimitive::new()
            .with_score("好", 0.9)
            .with_score("壞", 0.1);
        let samples = vec![
            sample("好", 0.9, SentimentClass::Positive),
            sample("壞", 0.1, SentimentClass::Negative),
        ];

        let t = optimize_thresholds(&samples, &primitive, &ThresholdGrid::default()).unwrap();

        assert!(t.is_valid());
        assert_eq!(primitive.score_calls(), 2);
    }

    #[test]
    fn scoring_failure_is_an_optimization_error() {
        let primitive = ScriptedPrimitive::new().failing_score();
        let samples = vec![sample("任何", 0.5, SentimentClass::Neutral)];
        let err = optimize_thresholds(&samples, &primitive, &ThresholdGrid::default()).unwrap_err();
        assert!(matches!(err, TuneError::Optimization(_)));
    }
}
