//! On-disk artifacts shared between pipeline stages.
//!
//! Every artifact lives at a fixed path under one root directory:
//!
//! | artifact | path |
//! |---|---|
//! | dataset | `data/dataset.csv` |
//! | dataset metadata | `data/meta.json` |
//! | model | `models/model.bin` |
//! | training metadata | `models/train_meta.json` |
//! | metrics | `metrics.json` |
//! | ROC table | `reports/roc.csv` |
//!
//! Writes go to a temporary file in the destination directory which is then
//! renamed over the final name, so readers never see a partial artifact.

use crate::classification::{LogisticRegression, Solver};
use crate::data::{feature_name, Dataset, LABEL_COLUMN};
use crate::error::{PipelineError, Result};
use crate::metrics::{MetricsReport, RocPoint, RocTable};
use crate::primitives::Matrix;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Dataset CSV, relative to the root.
pub const DATASET_CSV: &str = "data/dataset.csv";
/// Dataset metadata JSON.
pub const DATASET_META: &str = "data/meta.json";
/// Serialized model.
pub const MODEL_BIN: &str = "models/model.bin";
/// Training metadata JSON.
pub const TRAIN_META: &str = "models/train_meta.json";
/// Evaluation metrics JSON.
pub const METRICS_JSON: &str = "metrics.json";
/// ROC sweep CSV.
pub const ROC_CSV: &str = "reports/roc.csv";

/// Generation parameters recorded next to the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    /// Rows generated
    pub n_samples: usize,
    /// Feature columns
    pub n_features: usize,
    /// Columns carrying class signal
    pub n_informative: usize,
    /// Centroid separation
    pub class_sep: f64,
    /// Generator seed
    pub random_state: u64,
}

/// Training summary recorded next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainMeta {
    /// ROC AUC on the held-out rows, measured right after fitting
    pub auc_sanity: f64,
    /// Inverse regularization strength
    #[serde(rename = "C")]
    pub c: f64,
    /// Iteration cap
    pub max_iter: usize,
    /// Optimizer used
    pub solver: Solver,
    /// Iterations actually run
    pub n_iter: usize,
    /// Whether the gradient tolerance was met
    pub converged: bool,
    /// Hex SHA-256 identifying the train/test split
    pub split_fingerprint: String,
    /// Training rows
    pub n_train: usize,
    /// Held-out rows
    pub n_test: usize,
}

/// Reads and writes the pipeline's artifacts under a root directory.
///
/// # Examples
///
/// ```
/// use binclf::artifacts::ArtifactStore;
///
/// let store = ArtifactStore::new("/tmp/run");
/// assert!(store.model_path().ends_with("models/model.bin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `data/dataset.csv`
    #[must_use]
    pub fn dataset_path(&self) -> PathBuf {
        self.root.join(DATASET_CSV)
    }

    /// `data/meta.json`
    #[must_use]
    pub fn dataset_meta_path(&self) -> PathBuf {
        self.root.join(DATASET_META)
    }

    /// `models/model.bin`
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.root.join(MODEL_BIN)
    }

    /// `models/train_meta.json`
    #[must_use]
    pub fn train_meta_path(&self) -> PathBuf {
        self.root.join(TRAIN_META)
    }

    /// `metrics.json`
    #[must_use]
    pub fn metrics_path(&self) -> PathBuf {
        self.root.join(METRICS_JSON)
    }

    /// `reports/roc.csv`
    #[must_use]
    pub fn roc_path(&self) -> PathBuf {
        self.root.join(ROC_CSV)
    }

    // ---------------------------------------------------------------------
    // Dataset
    // ---------------------------------------------------------------------

    /// Writes the dataset as CSV with header `f0,...,f{F-1},label`.
    ///
    /// Floats use Rust's shortest round-trip formatting, so reading the file
    /// back reproduces every value bit for bit.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactIo`] if the file cannot be written.
    pub fn write_dataset(&self, dataset: &Dataset) -> Result<()> {
        let path = self.dataset_path();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(dataset.column_names())
            .map_err(|e| csv_error(&path, e))?;

        let features = dataset.features();
        for (row, &label) in dataset.labels().iter().enumerate() {
            let mut record: Vec<String> = features
                .row_slice(row)
                .iter()
                .map(ToString::to_string)
                .collect();
            record.push(label.to_string());
            writer
                .write_record(&record)
                .map_err(|e| csv_error(&path, e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PipelineError::artifact(&path, e.to_string()))?;
        write_atomic(&path, &bytes)?;
        tracing::debug!(path = %path.display(), rows = dataset.n_samples(), "wrote dataset");
        Ok(())
    }

    /// Reads the dataset CSV, validating the header and every row.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ArtifactIo`] if the file cannot be opened
    /// - [`PipelineError::Artifact`] for a bad header, ragged rows,
    ///   unparsable values, labels other than 0 and 1, or no rows
    pub fn read_dataset(&self) -> Result<Dataset> {
        let path = self.dataset_path();
        let file = File::open(&path).map_err(|e| PipelineError::io(&path, e))?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| csv_error(&path, e))?
            .clone();
        let n_features = validate_header(&path, &headers)?;

        let mut values = Vec::new();
        let mut labels = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| csv_error(&path, e))?;
            if record.len() != n_features + 1 {
                return Err(PipelineError::artifact(
                    &path,
                    format!(
                        "row {row} has {} fields, expected {}",
                        record.len(),
                        n_features + 1
                    ),
                ));
            }
            for (col, field) in record.iter().take(n_features).enumerate() {
                let value: f64 = field.parse().map_err(|_| {
                    PipelineError::artifact(
                        &path,
                        format!("row {row}, column {}: invalid number {field:?}", feature_name(col)),
                    )
                })?;
                values.push(value);
            }
            let field = &record[n_features];
            let label = match field {
                "0" => 0,
                "1" => 1,
                other => {
                    return Err(PipelineError::artifact(
                        &path,
                        format!("row {row}: label must be 0 or 1, found {other:?}"),
                    ))
                }
            };
            labels.push(label);
        }

        if labels.is_empty() {
            return Err(PipelineError::artifact(&path, "no data rows"));
        }
        let features = Matrix::from_vec(labels.len(), n_features, values)
            .map_err(|e| PipelineError::artifact(&path, e))?;
        let dataset = Dataset::new(features, labels)?;
        tracing::debug!(path = %path.display(), shape = ?dataset.shape(), "read dataset");
        Ok(dataset)
    }

    /// Writes `data/meta.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_dataset_meta(&self, meta: &DatasetMeta) -> Result<()> {
        write_json(&self.dataset_meta_path(), meta)
    }

    /// Reads `data/meta.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn read_dataset_meta(&self) -> Result<DatasetMeta> {
        read_json(&self.dataset_meta_path())
    }

    // ---------------------------------------------------------------------
    // Model
    // ---------------------------------------------------------------------

    /// Writes the model with bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_model(&self, model: &LogisticRegression) -> Result<()> {
        let path = self.model_path();
        let bytes = bincode::serde::encode_to_vec(model, bincode::config::standard())
            .map_err(|e| PipelineError::artifact(&path, format!("encode failed: {e}")))?;
        write_atomic(&path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote model");
        Ok(())
    }

    /// Reads the model back.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ArtifactIo`] if the file cannot be read
    /// - [`PipelineError::Artifact`] if decoding fails, trailing bytes
    ///   remain, or the stored model was never fitted
    pub fn read_model(&self) -> Result<LogisticRegression> {
        let path = self.model_path();
        let bytes = std::fs::read(&path).map_err(|e| PipelineError::io(&path, e))?;
        let (model, used): (LogisticRegression, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
                .map_err(|e| PipelineError::artifact(&path, format!("decode failed: {e}")))?;
        if used != bytes.len() {
            return Err(PipelineError::artifact(
                &path,
                format!("{} trailing bytes after model", bytes.len() - used),
            ));
        }
        if !model.is_fitted() {
            return Err(PipelineError::artifact(&path, "stored model is not fitted"));
        }
        Ok(model)
    }

    /// Writes `models/train_meta.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_train_meta(&self, meta: &TrainMeta) -> Result<()> {
        write_json(&self.train_meta_path(), meta)
    }

    /// Reads `models/train_meta.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn read_train_meta(&self) -> Result<TrainMeta> {
        read_json(&self.train_meta_path())
    }

    // ---------------------------------------------------------------------
    // Evaluation outputs
    // ---------------------------------------------------------------------

    /// Writes `metrics.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_metrics(&self, report: &MetricsReport) -> Result<()> {
        write_json(&self.metrics_path(), report)
    }

    /// Reads `metrics.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn read_metrics(&self) -> Result<MetricsReport> {
        read_json(&self.metrics_path())
    }

    /// Writes `reports/roc.csv` with header `threshold,tpr,fpr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_roc(&self, roc: &RocTable) -> Result<()> {
        let path = self.roc_path();
        let mut writer = csv::Writer::from_writer(Vec::new());
        if roc.is_empty() {
            writer
                .write_record(["threshold", "tpr", "fpr"])
                .map_err(|e| csv_error(&path, e))?;
        }
        for point in roc.points() {
            writer.serialize(point).map_err(|e| csv_error(&path, e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PipelineError::artifact(&path, e.to_string()))?;
        write_atomic(&path, &bytes)?;
        tracing::debug!(path = %path.display(), rows = roc.len(), "wrote ROC table");
        Ok(())
    }

    /// Reads `reports/roc.csv`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a row is malformed.
    pub fn read_roc(&self) -> Result<RocTable> {
        let path = self.roc_path();
        let file = File::open(&path).map_err(|e| PipelineError::io(&path, e))?;
        let mut reader = csv::Reader::from_reader(file);
        let points = reader
            .deserialize::<RocPoint>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| csv_error(&path, e))?;
        Ok(RocTable::from_points(points))
    }
}

/// Number of feature columns if the header is exactly `f0..f{F-1},label`.
fn validate_header(path: &Path, headers: &csv::StringRecord) -> Result<usize> {
    let n_features = headers.len().saturating_sub(1);
    if n_features == 0 {
        return Err(PipelineError::artifact(
            path,
            "header needs at least one feature column and a label column",
        ));
    }
    for (col, name) in headers.iter().take(n_features).enumerate() {
        if name != feature_name(col) {
            return Err(PipelineError::artifact(
                path,
                format!("header column {col} is {name:?}, expected {:?}", feature_name(col)),
            ));
        }
    }
    if &headers[n_features] != LABEL_COLUMN {
        return Err(PipelineError::artifact(
            path,
            format!(
                "last header column is {:?}, expected {LABEL_COLUMN:?}",
                &headers[n_features]
            ),
        ));
    }
    Ok(n_features)
}

fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PipelineError::io(path, source),
        _ => PipelineError::artifact(path, message),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| PipelineError::artifact(path, format!("encode failed: {e}")))?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), "wrote JSON artifact");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| PipelineError::io(path, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| PipelineError::artifact(path, format!("decode failed: {e}")))
}

/// Writes `bytes` to a sibling temporary file, syncs it, and renames it
/// over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| PipelineError::io(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PipelineError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;
    Ok(())
}
