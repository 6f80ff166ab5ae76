//! Artifact store: Persisted corpus, lexicon, thresholds and metrics.
//!
//! Layout under the root directory:
//!
//! ```text
//! data/training_data_<ts>.json      data/current_training_data.json
//! models/custom_dict_<ts>.json      models/custom_dict.json
//! models/thresholds_<ts>.json       models/thresholds.json
//! evaluation/evaluation_<ts>.txt    evaluation/latest_metrics.json
//! ```
//!
//! Every write goes to a temp file in the target directory and is then
//! renamed over the destination, so readers never observe a partial file.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyzer::ModelSnapshot;
use crate::corpus::LabeledSample;
use crate::error::StoreError;
use crate::lexicon::Lexicon;
use crate::tuning::{EvaluationMetrics, Thresholds};

const DATA_DIR: &str = "data";
const MODELS_DIR: &str = "models";
const EVALUATION_DIR: &str = "evaluation";

const CURRENT_CORPUS: &str = "current_training_data.json";
const CURRENT_LEXICON: &str = "custom_dict.json";
const CURRENT_THRESHOLDS: &str = "thresholds.json";
const LATEST_METRICS: &str = "latest_metrics.json";

/// File-name timestamp, UTC.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Replace `path` with `bytes` via write-temp-then-rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    let tmp = parent.join(format!(".{}.tmp-{}", file_name, std::process::id()));

    std::fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        StoreError::io(path, e)
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
    write_atomic(path, json.as_bytes())
}

/// `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StoreError::json(path, e))
}

/// Summary of the currently persisted model, for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub dictionary_size: usize,
    /// Modification time of the current lexicon file, if one exists.
    pub last_updated: Option<DateTime<Utc>>,
    pub thresholds: Thresholds,
    pub evaluation_metrics: Option<EvaluationMetrics>,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn data_path(&self, name: &str) -> PathBuf {
        self.root.join(DATA_DIR).join(name)
    }

    fn models_path(&self, name: &str) -> PathBuf {
        self.root.join(MODELS_DIR).join(name)
    }

    fn evaluation_path(&self, name: &str) -> PathBuf {
        self.root.join(EVALUATION_DIR).join(name)
    }

    pub fn current_corpus_path(&self) -> PathBuf {
        self.data_path(CURRENT_CORPUS)
    }

    pub fn current_lexicon_path(&self) -> PathBuf {
        self.models_path(CURRENT_LEXICON)
    }

    pub fn current_thresholds_path(&self) -> PathBuf {
        self.models_path(CURRENT_THRESHOLDS)
    }

    pub fn latest_metrics_path(&self) -> PathBuf {
        self.evaluation_path(LATEST_METRICS)
    }

    // ── Corpus ─────────────────────────────────────────────

    /// Write the timestamped and current corpus copies. Returns the timestamped path.
    pub fn save_corpus(&self, samples: &[LabeledSample], at: DateTime<Utc>) -> Result<PathBuf, StoreError> {
        let stamped = self.data_path(&format!("training_data_{}.json", file_stamp(at)));
        write_json(&stamped, samples)?;
        write_json(&self.current_corpus_path(), samples)?;
        info!(
            "[Store] Saved {} samples to {}",
            samples.len(),
            stamped.display()
        );
        Ok(stamped)
    }

    /// Load a corpus file written by [`save_corpus`](Self::save_corpus).
    pub fn load_corpus(&self, path: &Path) -> Result<Vec<LabeledSample>, StoreError> {
        read_json(path)?.ok_or_else(|| {
            StoreError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "corpus file not found"),
            )
        })
    }

    // ── Lexicon ────────────────────────────────────────────

    pub fn save_lexicon(&self, lexicon: &Lexicon, at: DateTime<Utc>) -> Result<PathBuf, StoreError> {
        let stamped = self.models_path(&format!("custom_dict_{}.json", file_stamp(at)));
        write_json(&stamped, lexicon)?;
        write_json(&self.current_lexicon_path(), lexicon)?;
        info!("[Store] Custom dictionary saved: {}", stamped.display());
        Ok(stamped)
    }

    /// Current lexicon, or an empty one if none has been tuned yet.
    pub fn load_lexicon(&self) -> Result<Lexicon, StoreError> {
        Ok(read_json(&self.current_lexicon_path())?.unwrap_or_default())
    }

    // ── Thresholds ─────────────────────────────────────────

    pub fn save_thresholds(&self, thresholds: &Thresholds, at: DateTime<Utc>) -> Result<PathBuf, StoreError> {
        let stamped = self.models_path(&format!("thresholds_{}.json", file_stamp(at)));
        write_json(&stamped, thresholds)?;
        write_json(&self.current_thresholds_path(), thresholds)?;
        info!("[Store] Thresholds saved: {}", stamped.display());
        Ok(stamped)
    }

    /// Current thresholds, or the defaults if none have been tuned yet.
    pub fn load_thresholds(&self) -> Result<Thresholds, StoreError> {
        let path = self.current_thresholds_path();
        let thresholds: Thresholds = read_json(&path)?.unwrap_or_default();
        if !thresholds.is_valid() {
            return Err(StoreError::InvalidThresholds {
                path,
                positive: thresholds.positive,
                negative: thresholds.negative,
            });
        }
        Ok(thresholds)
    }

    // ── Metrics ────────────────────────────────────────────

    /// Write the human-readable report and the machine-readable latest copy.
    pub fn save_metrics(&self, metrics: &EvaluationMetrics, at: DateTime<Utc>) -> Result<PathBuf, StoreError> {
        let report = self.evaluation_path(&format!("evaluation_{}.txt", file_stamp(at)));
        write_atomic(&report, metrics.report(at).as_bytes())?;
        write_json(&self.latest_metrics_path(), metrics)?;
        info!("[Store] Evaluation results saved: {}", report.display());
        Ok(report)
    }

    pub fn load_latest_metrics(&self) -> Result<Option<EvaluationMetrics>, StoreError> {
        read_json(&self.latest_metrics_path())
    }

    // ── Snapshot / Info ────────────────────────────────────

    pub fn load_snapshot(&self) -> Result<ModelSnapshot, StoreError> {
        Ok(ModelSnapshot::new(self.load_lexicon()?, self.load_thresholds()?))
    }

    pub fn model_info(&self) -> Result<ModelInfo, StoreError> {
        let lexicon_path = self.current_lexicon_path();
        let last_updated = std::fs::metadata(&lexicon_path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(ModelInfo {
            dictionary_size: self.load_lexicon()?.len(),
            last_updated,
            thresholds: self.load_thresholds()?,
            evaluation_metrics: self.load_latest_metrics()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusGenerator;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 8, 13, 6, 20).unwrap()
    }

    #[test]
    fn fresh_store_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        assert!(store.load_lexicon().unwrap().is_empty());
        assert_eq!(store.load_thresholds().unwrap(), Thresholds::default());
        assert_eq!(store.load_latest_metrics().unwrap(), None);

        let info = store.model_info().unwrap();
        assert_eq!(info.dictionary_size, 0);
        assert_eq!(info.last_updated, None);
    }

    #[test]
    fn lexicon_round_trip_is_bit_identical() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        let mut lexicon = Lexicon::new();
        lexicon.insert("讚", 0.1 + 0.2);
        lexicon.insert("爛", 1.0 / 3.0);
        lexicon.insert("普通", 0.5000000000000001);

        let stamped = store.save_lexicon(&lexicon, at()).unwrap();
        assert!(stamped.ends_with("custom_dict_20250508_130620.json"));

        let loaded = store.load_lexicon().unwrap();
        for (word, value) in lexicon.iter() {
            assert_eq!(loaded.get(word).unwrap().to_bits(), value.to_bits(), "{}", word);
        }
    }

    #[test]
    fn thresholds_round_trip_is_bit_identical() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        let t = Thresholds {
            positive: 0.6 + 7.0 * 0.02,
            negative: 0.2 + 11.0 * 0.02,
        };
        store.save_thresholds(&t, at()).unwrap();

        let loaded = store.load_thresholds().unwrap();
        assert_eq!(loaded.positive.to_bits(), t.positive.to_bits());
        assert_eq!(loaded.negative.to_bits(), t.negative.to_bits());
    }

    #[test]
    fn inverted_thresholds_on_disk_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());
        write_atomic(
            &store.current_thresholds_path(),
            br#"{ "positive": 0.3, "negative": 0.7 }"#,
        )
        .unwrap();

        assert!(matches!(
            store.load_thresholds(),
            Err(StoreError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn malformed_lexicon_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());
        write_atomic(&store.current_lexicon_path(), b"{ nope").unwrap();

        assert!(matches!(store.load_lexicon(), Err(StoreError::Json { .. })));
    }

    #[test]
    fn corpus_written_twice_and_reloadable() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let samples = CorpusGenerator::with_seed(4).generate(3).unwrap();

        let stamped = store.save_corpus(&samples, at()).unwrap();

        assert_eq!(store.load_corpus(&stamped).unwrap(), samples);
        assert_eq!(store.load_corpus(&store.current_corpus_path()).unwrap(), samples);
    }

    #[test]
    fn metrics_write_report_and_latest() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());
        let metrics = EvaluationMetrics {
            accuracy: 0.75,
            average_error: 0.2,
            average_confidence: 0.4,
            high_confidence_accuracy: 1.0,
            high_confidence_defined: true,
            high_confidence_count: 3,
            sample_count: 8,
        };

        let report = store.save_metrics(&metrics, at()).unwrap();

        let text = std::fs::read_to_string(report).unwrap();
        assert!(text.contains("accuracy: 0.75"));
        assert_eq!(store.load_latest_metrics().unwrap(), Some(metrics));
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("nested").join("file.json");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_failure_surfaces_as_io_error() {
        let tmp = TempDir::new().unwrap();
        // A regular file where a directory is expected.
        let blocker = tmp.path().join("data");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let store = ArtifactStore::new(tmp.path());

        let samples = CorpusGenerator::with_seed(2).generate(1).unwrap();
        assert!(matches!(
            store.save_corpus(&samples, at()),
            Err(StoreError::Io { .. })
        ));
    }
}
