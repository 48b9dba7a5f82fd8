//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use binclf::prelude::*;
//! ```

pub use crate::artifacts::ArtifactStore;
pub use crate::classification::{LogisticRegression, Solver};
pub use crate::config::PipelineParams;
pub use crate::data::Dataset;
pub use crate::error::{PipelineError, Result};
pub use crate::metrics::{roc_auc, Evaluation, Evaluator, MetricsReport, RocTable};
pub use crate::model_selection::{SplitIndices, StratifiedSplit};
pub use crate::primitives::{Matrix, Vector};
pub use crate::synthetic::{make_classification, ClassificationParams};
pub use crate::traits::ProbabilisticClassifier;
