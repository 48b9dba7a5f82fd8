//! Evaluation metrics for binary classifiers.
//!
//! Includes confusion-count metrics (accuracy, precision, recall, F1),
//! ranking metrics (rank-based ROC AUC, exact ROC curve, threshold sweep)
//! and the [`Evaluator`] that runs them against a fitted model.

pub mod classification;
pub mod evaluator;
pub mod ranking;

pub use classification::{accuracy, f1_score, precision, recall, ConfusionCounts};
pub use evaluator::{Evaluation, Evaluator, MetricsReport};
pub use ranking::{linspace, roc_auc, roc_curve, RocPoint, RocTable};

/// Probability at or above which a row is labelled 1.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;
