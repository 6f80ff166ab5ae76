//! Custom lexicon: Per-token sentiment weights aggregated from a labeled corpus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::corpus::LabeledSample;
use crate::error::{TuneError, TuneResult};
use crate::primitive::SentimentPrimitive;

/// Word → sentiment weight (nominally [0, 1], not clamped).
///
/// Backed by a `BTreeMap` so the persisted JSON is key-sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<String, f64>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.entries.get(word).copied()
    }

    pub fn insert(&mut self, word: impl Into<String>, weight: f64) {
        self.entries.insert(word.into(), weight);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for Lexicon {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Observation weight: polarized labels count exponentially more than near-neutral ones.
fn observation_weight(score: f64) -> f64 {
    (score - 0.5).abs().exp()
}

fn weighted_mean(scores: &[f64]) -> f64 {
    let (sum, total) = scores.iter().fold((0.0, 0.0), |(sum, total), &s| {
        let w = observation_weight(s);
        (sum + s * w, total + w)
    });
    sum / total
}

/// Aggregate every token's label observations into a single lexicon weight.
///
/// Tokens are taken as the primitive returns them (no stemming, case-sensitive);
/// a token repeated within a sample contributes one observation per occurrence.
pub fn build_lexicon(samples: &[LabeledSample], primitive: &dyn SentimentPrimitive) -> TuneResult<Lexicon> {
    if samples.is_empty() {
        return Err(TuneError::Dictionary(
            "cannot build a lexicon from an empty sample set".to_string(),
        ));
    }

    let mut observations: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        let tokens = primitive.segment(&sample.text).map_err(|e| {
            TuneError::Dictionary(format!("segmenting {:?}: {}", sample.text, e))
        })?;
        for token in tokens {
            observations.entry(token).or_default().push(sample.sentiment);
        }
    }

    let lexicon: Lexicon = observations
        .into_iter()
        .map(|(word, scores)| {
            let weight = weighted_mean(&scores);
            (word, weight)
        })
        .collect();

    debug!(
        "[Lexicon] Aggregated {} samples via '{}' primitive",
        samples.len(),
        primitive.id()
    );
    info!("[Lexicon] Custom dictionary built with {} words", lexicon.len());
    Ok(lexicon)
}
