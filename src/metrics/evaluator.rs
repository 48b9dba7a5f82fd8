//! Held-out evaluation of a probabilistic classifier.

use super::classification::ConfusionCounts;
use super::ranking::{roc_auc, RocTable};
use super::DEFAULT_DECISION_THRESHOLD;
use crate::config::DEFAULT_THRESHOLDS;
use crate::error::{PipelineError, Result};
use crate::primitives::Matrix;
use crate::traits::ProbabilisticClassifier;
use serde::{Deserialize, Serialize};

/// Headline metrics written to `metrics.json`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Rank-based area under the ROC curve
    pub roc_auc: f64,
    /// Accuracy at the decision threshold
    pub accuracy: f64,
    /// Precision at the decision threshold
    pub precision: f64,
    /// Recall at the decision threshold
    pub recall: f64,
    /// F1 at the decision threshold
    pub f1: f64,
    /// Number of scored rows
    pub n_test: usize,
}

/// Everything one evaluation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Scalar metrics
    pub report: MetricsReport,
    /// Threshold sweep
    pub roc: RocTable,
}

/// Scores a model on held-out rows.
///
/// # Examples
///
/// ```
/// use binclf::metrics::Evaluator;
///
/// let probs = [0.1, 0.4, 0.35, 0.8];
/// let labels = [0, 0, 1, 1];
/// let eval = Evaluator::new().with_n_thresholds(5).score(&probs, &labels).expect("valid");
/// assert!((eval.report.roc_auc - 0.75).abs() < 1e-12);
/// assert_eq!(eval.roc.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluator {
    decision_threshold: f64,
    n_thresholds: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Threshold 0.5 and a 50-point sweep.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
            n_thresholds: DEFAULT_THRESHOLDS,
        }
    }

    /// Probability at or above which a row is labelled 1.
    #[must_use]
    pub fn with_decision_threshold(mut self, threshold: f64) -> Self {
        self.decision_threshold = threshold;
        self
    }

    /// Points in the ROC sweep.
    #[must_use]
    pub fn with_n_thresholds(mut self, n: usize) -> Self {
        self.n_thresholds = n;
        self
    }

    /// Current decision threshold.
    #[must_use]
    pub fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }

    /// Current sweep length.
    #[must_use]
    pub fn n_thresholds(&self) -> usize {
        self.n_thresholds
    }

    /// Scores `model` on `(x, y)`.
    ///
    /// # Errors
    ///
    /// - dimension mismatch if `y` and `x` disagree on the row count
    /// - whatever `model.predict_proba` returns
    /// - see [`score`](Self::score)
    pub fn evaluate<M>(&self, model: &M, x: &Matrix<f64>, y: &[usize]) -> Result<Evaluation>
    where
        M: ProbabilisticClassifier + ?Sized,
    {
        if x.n_rows() != y.len() {
            return Err(PipelineError::dimension_mismatch(
                "test rows",
                x.n_rows(),
                y.len(),
            ));
        }
        let probs = model.predict_proba(x)?;
        self.score(probs.as_slice(), y)
    }

    /// Metrics from precomputed probabilities.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Configuration`] for a zero-length sweep or a
    ///   threshold outside [0, 1]
    /// - [`PipelineError::EmptyInput`] for no rows
    /// - [`PipelineError::InvalidLabel`] for labels other than 0 and 1
    /// - [`PipelineError::InsufficientData`] when `y` lacks a class
    pub fn score(&self, probs: &[f64], y: &[usize]) -> Result<Evaluation> {
        self.validate()?;
        if probs.len() != y.len() {
            return Err(PipelineError::dimension_mismatch(
                "labels",
                probs.len(),
                y.len(),
            ));
        }
        if y.is_empty() {
            return Err(PipelineError::empty_input("evaluation rows"));
        }
        if let Some((row, &label)) = y.iter().enumerate().find(|(_, &l)| l > 1) {
            return Err(PipelineError::InvalidLabel { row, label });
        }

        let roc_auc = roc_auc(probs, y)?;
        let counts = ConfusionCounts::at_threshold(probs, y, self.decision_threshold);
        let roc = RocTable::sweep(probs, y, self.n_thresholds)?;

        let report = MetricsReport {
            roc_auc,
            accuracy: counts.accuracy(),
            precision: counts.precision(),
            recall: counts.recall(),
            f1: counts.f1(),
            n_test: y.len(),
        };
        tracing::debug!(
            roc_auc = report.roc_auc,
            accuracy = report.accuracy,
            f1 = report.f1,
            n_test = report.n_test,
            "scored held-out rows"
        );
        Ok(Evaluation { report, roc })
    }

    fn validate(&self) -> Result<()> {
        if self.n_thresholds == 0 {
            return Err(PipelineError::invalid_param("thresholds", 0, ">= 1"));
        }
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(PipelineError::invalid_param(
                "decision_threshold",
                self.decision_threshold,
                "in [0, 1]",
            ));
        }
        Ok(())
    }
}
