//! Tuning pipeline: generate corpus → build lexicon → optimize thresholds →
//! evaluate, persisting each artifact as its stage completes.

pub mod evaluate;
pub mod thresholds;

pub use evaluate::{compute_metrics, evaluate, EvaluationMetrics, Prediction, HIGH_CONFIDENCE_CUTOFF};
pub use thresholds::{optimize_thresholds, GridRange, ThresholdGrid, Thresholds};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

use crate::analyzer::ModelSnapshot;
use crate::config::TuneConfig;
use crate::corpus::{split_train_test, CorpusGenerator, CorpusStats};
use crate::error::{TuneError, TuneResult};
use crate::lexicon::build_lexicon;
use crate::primitive::SentimentPrimitive;
use crate::store::ArtifactStore;

/// Everything a caller needs after a successful run.
#[derive(Debug, Clone)]
pub struct TuningOutcome {
    pub metrics: EvaluationMetrics,
    /// Freshly tuned lexicon + thresholds, ready to install into an analyzer.
    pub snapshot: ModelSnapshot,
    pub corpus_stats: CorpusStats,
    pub timestamp: DateTime<Utc>,
}

pub struct TuningManager {
    store: ArtifactStore,
    primitive: Arc<dyn SentimentPrimitive>,
    config: TuneConfig,
}

impl TuningManager {
    pub fn new(store: ArtifactStore, primitive: Arc<dyn SentimentPrimitive>, config: TuneConfig) -> Self {
        Self {
            store,
            primitive,
            config,
        }
    }

    /// Run the whole pipeline with the configured corpus size.
    pub fn run_default(&self) -> TuneResult<TuningOutcome> {
        self.run(self.config.count_per_class)
    }

    /// Run the whole pipeline. The first failing stage aborts the rest;
    /// artifacts written by earlier stages stay on disk.
    pub fn run(&self, count_per_class: usize) -> TuneResult<TuningOutcome> {
        let started = Utc::now();
        info!(
            "[Tuning] === Starting tuning run ({} samples per class) ===",
            count_per_class
        );

        let result = self.run_stages(count_per_class, started);
        match &result {
            Ok(outcome) => info!(
                "[Tuning] === Tuning complete in {}ms: accuracy={:.2}, dictionary={} words ===",
                (Utc::now() - started).num_milliseconds(),
                outcome.metrics.accuracy,
                outcome.snapshot.lexicon().len()
            ),
            Err(e) => error!("[Tuning] Aborted at {} stage: {}", e.stage(), e),
        }
        result
    }

    fn run_stages(&self, count_per_class: usize, at: DateTime<Utc>) -> TuneResult<TuningOutcome> {
        let primitive = self.primitive.as_ref();

        // 1. Corpus
        let mut generator = match self.config.seed {
            Some(seed) => CorpusGenerator::with_seed(seed),
            None => CorpusGenerator::new(),
        };
        let corpus = generator.generate(count_per_class)?;
        self.store
            .save_corpus(&corpus, at)
            .map_err(|e| TuneError::Generation(e.to_string()))?;

        let corpus_stats = CorpusStats::from_samples(&corpus);
        info!(
            "[Tuning] Corpus: {} total ({} positive, {} negative, {} sarcastic, {} neutral)",
            corpus_stats.total,
            corpus_stats.positive,
            corpus_stats.negative,
            corpus_stats.sarcastic,
            corpus_stats.neutral
        );
        info!(
            "[Tuning] Label bands: >0.7 {}, <0.3 {}, 0.3-0.7 {}",
            corpus_stats.band_high, corpus_stats.band_low, corpus_stats.band_mid
        );

        let (train, test) = split_train_test(&corpus, self.config.train_ratio);
        info!("[Tuning] Split: {} train / {} test", train.len(), test.len());

        // 2. Dictionary
        info!("[Tuning] Building custom dictionary...");
        let lexicon = build_lexicon(train, primitive)?;
        self.store
            .save_lexicon(&lexicon, at)
            .map_err(|e| TuneError::Dictionary(e.to_string()))?;

        // 3. Thresholds
        info!("[Tuning] Optimizing thresholds...");
        let thresholds = optimize_thresholds(train, primitive, &self.config.grid)?;
        self.store
            .save_thresholds(&thresholds, at)
            .map_err(|e| TuneError::Optimization(e.to_string()))?;

        // 4. Evaluation
        info!("[Tuning] Evaluating on held-out split...");
        let metrics = evaluate(test, &thresholds, primitive)?;
        self.store
            .save_metrics(&metrics, at)
            .map_err(|e| TuneError::Evaluation(e.to_string()))?;

        Ok(TuningOutcome {
            metrics,
            snapshot: ModelSnapshot::new(lexicon, thresholds),
            corpus_stats,
            timestamp: at,
        })
    }
}
