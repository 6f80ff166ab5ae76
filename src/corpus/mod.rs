//! Synthetic labeled corpus: Template phrases combined with subject nouns,
//! labeled with a sentiment drawn from a class-specific range.

mod templates;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TuneError, TuneResult};
use templates::{NEGATIVE, NEUTRAL, POSITIVE, SARCASTIC, SUBJECTS};

// ── Samples ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Negative,
    Sarcastic,
    Neutral,
}

impl SentimentClass {
    pub const ALL: [SentimentClass; 4] = [
        SentimentClass::Positive,
        SentimentClass::Negative,
        SentimentClass::Sarcastic,
        SentimentClass::Neutral,
    ];

    /// Inclusive label range for the class. Sarcasm is modeled as biased-negative.
    pub fn label_range(self) -> (f64, f64) {
        match self {
            SentimentClass::Positive => (0.7, 1.0),
            SentimentClass::Negative => (0.0, 0.3),
            SentimentClass::Sarcastic => (0.1, 0.4),
            SentimentClass::Neutral => (0.3, 0.7),
        }
    }

    fn templates(self) -> &'static [&'static str] {
        match self {
            SentimentClass::Positive => POSITIVE,
            SentimentClass::Negative => NEGATIVE,
            SentimentClass::Sarcastic => SARCASTIC,
            SentimentClass::Neutral => NEUTRAL,
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SentimentClass::Positive => "positive",
            SentimentClass::Negative => "negative",
            SentimentClass::Sarcastic => "sarcastic",
            SentimentClass::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabeledSample {
    pub text: String,
    /// Target sentiment (0.0 = negative, 1.0 = positive).
    pub sentiment: f64,
    pub class: SentimentClass,
}

// ── Generator ──────────────────────────────────────────────

/// Probability that a sarcastic sample gets a subject attached.
const SARCASTIC_SUBJECT_CHANCE: f64 = 0.3;

pub struct CorpusGenerator {
    rng: StdRng,
}

impl Default for CorpusGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate `4 × count_per_class` shuffled samples, each class
    /// represented exactly `count_per_class` times.
    pub fn generate(&mut self, count_per_class: usize) -> TuneResult<Vec<LabeledSample>> {
        if count_per_class == 0 {
            return Err(TuneError::Generation(
                "count_per_class must be positive".to_string(),
            ));
        }

        let mut samples = Vec::with_capacity(count_per_class * SentimentClass::ALL.len());
        for class in SentimentClass::ALL {
            for _ in 0..count_per_class {
                let sample = self.sample(class);
                samples.push(sample);
            }
        }

        samples.shuffle(&mut self.rng);
        Ok(samples)
    }

    fn sample(&mut self, class: SentimentClass) -> LabeledSample {
        let template = *class
            .templates()
            .choose(&mut self.rng)
            .unwrap_or(&"");

        let attach_subject = match class {
            SentimentClass::Sarcastic => self.rng.gen_bool(SARCASTIC_SUBJECT_CHANCE),
            _ => true,
        };

        let text = if attach_subject {
            let subject = *SUBJECTS.choose(&mut self.rng).unwrap_or(&"");
            self.join(template, subject)
        } else {
            template.to_string()
        };

        let (lo, hi) = class.label_range();
        let raw = self.rng.gen_range(lo..=hi);
        // Two-decimal labels; rounding cannot leave the range since both ends are on the grid.
        let sentiment = ((raw * 100.0).round() / 100.0).clamp(lo, hi);

        LabeledSample {
            text,
            sentiment,
            class,
        }
    }

    fn join(&mut self, template: &str, subject: &str) -> String {
        if subject.is_empty() {
            return template.to_string();
        }
        if self.rng.gen_bool(0.5) {
            format!("{}！{}", template, subject)
        } else {
            format!("{}{}", subject, template)
        }
    }
}

// ── Stats ──────────────────────────────────────────────────

/// Class counts and label-band distribution of a corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub sarcastic: usize,
    pub neutral: usize,
    /// Labels above 0.7.
    pub band_high: usize,
    /// Labels below 0.3.
    pub band_low: usize,
    /// Labels within [0.3, 0.7].
    pub band_mid: usize,
}

impl CorpusStats {
    pub fn from_samples(samples: &[LabeledSample]) -> Self {
        let mut stats = CorpusStats {
            total: samples.len(),
            ..Default::default()
        };
        for s in samples {
            match s.class {
                SentimentClass::Positive => stats.positive += 1,
                SentimentClass::Negative => stats.negative += 1,
                SentimentClass::Sarcastic => stats.sarcastic += 1,
                SentimentClass::Neutral => stats.neutral += 1,
            }
            if s.sentiment > 0.7 {
                stats.band_high += 1;
            } else if s.sentiment < 0.3 {
                stats.band_low += 1;
            } else {
                stats.band_mid += 1;
            }
        }
        stats
    }

    pub fn count(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Positive => self.positive,
            SentimentClass::Negative => self.negative,
            SentimentClass::Sarcastic => self.sarcastic,
            SentimentClass::Neutral => self.neutral,
        }
    }
}

/// Positional train/test split. No re-shuffling: the generator already shuffled.
pub fn split_train_test(samples: &[LabeledSample], train_ratio: f64) -> (&[LabeledSample], &[LabeledSample]) {
    let ratio = train_ratio.clamp(0.0, 1.0);
    let train_len = ((samples.len() as f64) * ratio).floor() as usize;
    samples.split_at(train_len.min(samples.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_four_classes_evenly() {
        let samples = CorpusGenerator::with_seed(7).generate(25).unwrap();
        assert_eq!(samples.len(), 100);

        let stats = CorpusStats::from_samples(&samples);
        for class in SentimentClass::ALL {
            assert_eq!(stats.count(class), 25, "class {} miscounted", class);
        }
    }

    #[test]
    fn labels_stay_in_class_range() {
        let samples = CorpusGenerator::with_seed(11).generate(200).unwrap();
        for s in &samples {
            let (lo, hi) = s.class.label_range();
            assert!(
                s.sentiment >= lo && s.sentiment <= hi,
                "{} label {} outside [{}, {}]",
                s.class,
                s.sentiment,
                lo,
                hi
            );
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = CorpusGenerator::with_seed(1).generate(0).unwrap_err();
        assert!(matches!(err, TuneError::Generation(_)));
    }

    #[test]
    fn same_seed_same_corpus() {
        let a = CorpusGenerator::with_seed(42).generate(10).unwrap();
        let b = CorpusGenerator::with_seed(42).generate(10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_sarcastic_samples_always_carry_a_subject() {
        let samples = CorpusGenerator::with_seed(3).generate(50).unwrap();
        for s in samples.iter().filter(|s| s.class != SentimentClass::Sarcastic) {
            assert!(
                SUBJECTS.iter().any(|subj| s.text.contains(subj)),
                "missing subject in {:?}",
                s.text
            );
        }
    }

    #[test]
    fn sarcastic_samples_mostly_stand_alone() {
        let samples = CorpusGenerator::with_seed(5).generate(400).unwrap();
        let sarcastic: Vec<_> = samples
            .iter()
            .filter(|s| s.class == SentimentClass::Sarcastic)
            .collect();
        let bare = sarcastic
            .iter()
            .filter(|s| SARCASTIC.contains(&s.text.as_str()))
            .count();
        let share = bare as f64 / sarcastic.len() as f64;
        assert!(share > 0.6 && share < 0.8, "bare share {}", share);
    }

    #[test]
    fn split_is_positional() {
        let samples = CorpusGenerator::with_seed(9).generate(5).unwrap();
        let (train, test) = split_train_test(&samples, 0.8);
        assert_eq!(train.len(), 16);
        assert_eq!(test.len(), 4);
        assert_eq!(train[0], samples[0]);
        assert_eq!(test[0], samples[16]);
    }

    #[test]
    fn output_is_shuffled_across_classes() {
        let samples = CorpusGenerator::with_seed(7).generate(25).unwrap();

        let first_class = samples[0].class;
        assert!(
            samples[..25].iter().any(|s| s.class != first_class),
            "leading block is a single class"
        );

        // Generated in class blocks, there would be exactly three class changes.
        let changes = samples.windows(2).filter(|w| w[0].class != w[1].class).count();
        assert!(changes > 3, "only {} class changes", changes);

        let (_, test) = split_train_test(&samples, 0.8);
        let held_out = CorpusStats::from_samples(test);
        let classes_held_out = SentimentClass::ALL
            .iter()
            .filter(|c| held_out.count(**c) > 0)
            .count();
        assert!(classes_held_out > 1);
    }

    #[test]
    fn shuffle_is_a_permutation_of_the_generated_samples() {
        let samples = CorpusGenerator::with_seed(21).generate(10).unwrap();
        let stats = CorpusStats::from_samples(&samples);
        for class in SentimentClass::ALL {
            assert_eq!(stats.count(class), 10);
        }

        // Every sample is one a class would have produced: text from its own
        // template bank and a label inside its range.
        for s in &samples {
            let (lo, hi) = s.class.label_range();
            assert!(s.sentiment >= lo && s.sentiment <= hi);
            assert!(
                s.class.templates().iter().any(|t| s.text.contains(t)),
                "{:?} not built from a {} template",
                s.text,
                s.class
            );
        }
    }

    #[test]
    fn stats_bands_cover_every_sample() {
        let samples = CorpusGenerator::with_seed(13).generate(30).unwrap();
        let stats = CorpusStats::from_samples(&samples);
        assert_eq!(stats.band_high + stats.band_low + stats.band_mid, stats.total);
    }
}
