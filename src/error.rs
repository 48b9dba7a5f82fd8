//! Error types for binclf operations.
//!
//! Every stage of the pipeline fails fast with one of these variants; the
//! CLI maps each variant onto its own exit code.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for binclf operations.
///
/// # Examples
///
/// ```
/// use binclf::error::PipelineError;
///
/// let err = PipelineError::DegenerateInput {
///     reason: "all training labels are 1".to_string(),
/// };
/// assert!(err.to_string().contains("degenerate input"));
/// ```
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or malformed parameter file, missing key, or invalid value.
    #[error("configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration
        message: String,
    },

    /// Not enough rows per class to stratify or to score.
    #[error("insufficient data: {reason}")]
    InsufficientData {
        /// Why the data cannot be used
        reason: String,
    },

    /// Training labels lack one of the two classes.
    #[error("degenerate input: {reason}")]
    DegenerateInput {
        /// Why the fit is ill-defined
        reason: String,
    },

    /// Filesystem failure while reading or writing an artifact.
    #[error("artifact I/O error at {}: {source}", path.display())]
    ArtifactIo {
        /// Failing path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An artifact was readable but its content is invalid.
    #[error("invalid artifact {}: {message}", path.display())]
    Artifact {
        /// Offending artifact
        path: PathBuf,
        /// Decode or validation failure
        message: String,
    },

    /// The evaluation-stage split differs from the one used at training time.
    #[error("split mismatch: trained on {expected}, evaluating {actual}")]
    SplitMismatch {
        /// Fingerprint recorded at training time
        expected: String,
        /// Fingerprint recomputed now
        actual: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Operation received no rows.
    #[error("empty input: {context}")]
    EmptyInput {
        /// Where the empty input was seen
        context: String,
    },

    /// A label outside {0, 1}.
    #[error("invalid label {label} at row {row}: labels must be 0 or 1")]
    InvalidLabel {
        /// Row index
        row: usize,
        /// Offending value
        label: usize,
    },

    /// Model used before `fit`.
    #[error("model is not fitted")]
    NotFitted,
}

impl PipelineError {
    /// Configuration error from any message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Invalid hyperparameter, reported as a configuration error.
    #[must_use]
    pub fn invalid_param(param: &str, value: impl std::fmt::Display, constraint: &str) -> Self {
        Self::Configuration {
            message: format!("{param} = {value}, expected {constraint}"),
        }
    }

    /// Insufficient data with context.
    #[must_use]
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Wrap an I/O error with the path it happened on.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::ArtifactIo {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Malformed artifact content.
    #[must_use]
    pub fn artifact(path: &Path, message: impl Into<String>) -> Self {
        Self::Artifact {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, PipelineError>;
