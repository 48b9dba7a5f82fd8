//! binclf: a reproducible binary-classification pipeline in pure Rust.
//!
//! Three stages share one parameter file and one artifact directory:
//! synthesize a labeled dataset, fit an L2-regularized logistic regression
//! on a stratified training split, and score it on the held-out rows.
//!
//! # Quick Start
//!
//! ```
//! use binclf::prelude::*;
//!
//! let params = ClassificationParams::new(200, 10)
//!     .with_n_informative(5)
//!     .with_class_sep(2.0)
//!     .with_random_state(42);
//! let dataset = make_classification(&params).expect("valid parameters");
//!
//! let split = StratifiedSplit::new(0.25)
//!     .with_random_state(42)
//!     .split(dataset.labels())
//!     .expect("both classes present");
//! let train = dataset.take(&split.train);
//! let test = dataset.take(&split.test);
//!
//! let mut model = LogisticRegression::new();
//! model.fit(train.features(), train.labels()).expect("fit");
//!
//! let eval = Evaluator::new()
//!     .evaluate(&model, test.features(), test.labels())
//!     .expect("scored");
//! assert_eq!(eval.report.n_test, 50);
//! assert!(eval.report.roc_auc > 0.5);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`config`]: Pipeline parameters loaded from YAML
//! - [`synthetic`]: Synthetic classification data (`make_classification`)
//! - [`data`]: Labeled dataset
//! - [`model_selection`]: Stratified train/test splitting and split fingerprints
//! - [`optim`]: Optimization algorithms (L-BFGS, damped Newton, line searches)
//! - [`classification`]: Logistic regression
//! - [`metrics`]: Binary metrics, ROC AUC, ROC sweep and the evaluator
//! - [`artifacts`]: On-disk layout and artifact readers/writers
//! - [`pipeline`]: The `make_data`, `train` and `evaluate` stages

pub mod artifacts;
pub mod classification;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod model_selection;
pub mod optim;
pub mod pipeline;
pub mod prelude;
pub mod primitives;
pub mod synthetic;
pub mod traits;

pub use error::{PipelineError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::ProbabilisticClassifier;
