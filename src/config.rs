//! Pipeline parameters.
//!
//! Loaded from a YAML file (`params.yaml` by default) once per stage and
//! passed explicitly to every component:
//!
//! ```yaml
//! data:
//!   n_samples: 200
//!   n_features: 10
//!   n_informative: 5
//!   class_sep: 2.0
//!   random_state: 42
//!   test_size: 0.25
//! train:
//!   C: 1.0
//!   max_iter: 100
//!   solver: lbfgs
//! eval:
//!   thresholds: 50
//! ```

use crate::classification::Solver;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of swept ROC thresholds.
pub const DEFAULT_THRESHOLDS: usize = 50;

/// Number of non-informative columns the generator keeps as pure noise
/// before the rest become redundant combinations.
const NOISE_BUDGET: usize = 5;

/// All parameters of the three stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Dataset generation and split parameters
    pub data: DataParams,
    /// Trainer parameters
    pub train: TrainParams,
    /// Evaluator parameters
    #[serde(default)]
    pub eval: EvalParams,
}

/// `data` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataParams {
    /// Number of rows to generate
    pub n_samples: usize,
    /// Total feature columns
    pub n_features: usize,
    /// Columns that carry class signal
    pub n_informative: usize,
    /// Hypercube half-side separating the cluster centroids
    pub class_sep: f64,
    /// Seed shared by the generator and the splitter
    pub random_state: u64,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
}

/// `train` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    /// Inverse regularization strength
    #[serde(rename = "C")]
    pub c: f64,
    /// Optimizer iteration cap
    pub max_iter: usize,
    /// Optimizer choice
    pub solver: Solver,
}

/// `eval` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalParams {
    /// Number of equally spaced thresholds in [0, 1]
    #[serde(default = "default_thresholds")]
    pub thresholds: usize,
}

fn default_thresholds() -> usize {
    DEFAULT_THRESHOLDS
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS,
        }
    }
}

impl DataParams {
    /// Redundant column count: everything beyond the informative columns
    /// and the noise budget.
    #[must_use]
    pub fn n_redundant(&self) -> usize {
        self.n_features
            .saturating_sub(self.n_informative)
            .saturating_sub(NOISE_BUDGET)
    }
}

impl PipelineParams {
    /// Reads and validates a parameter file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] if the file is missing,
    /// unparsable, lacks a required key, or holds an invalid value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let params = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), ?params, "loaded parameters");
        Ok(params)
    }

    /// Parses and validates YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] on parse or validation failure.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let params: Self = serde_yaml::from_str(content)
            .map_err(|e| PipelineError::config(format!("YAML parse error: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Checks value ranges that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let d = &self.data;
        if d.n_samples == 0 {
            return Err(PipelineError::invalid_param("data.n_samples", d.n_samples, "> 0"));
        }
        if d.n_features == 0 {
            return Err(PipelineError::invalid_param("data.n_features", d.n_features, "> 0"));
        }
        if d.n_informative == 0 || d.n_informative > d.n_features {
            return Err(PipelineError::invalid_param(
                "data.n_informative",
                d.n_informative,
                "in 1..=n_features",
            ));
        }
        if !(d.class_sep.is_finite() && d.class_sep > 0.0) {
            return Err(PipelineError::invalid_param("data.class_sep", d.class_sep, "> 0"));
        }
        if !(d.test_size > 0.0 && d.test_size < 1.0) {
            return Err(PipelineError::invalid_param(
                "data.test_size",
                d.test_size,
                "in (0, 1)",
            ));
        }

        let t = &self.train;
        if !(t.c.is_finite() && t.c > 0.0) {
            return Err(PipelineError::invalid_param("train.C", t.c, "> 0"));
        }
        if t.max_iter == 0 {
            return Err(PipelineError::invalid_param("train.max_iter", t.max_iter, "> 0"));
        }

        if self.eval.thresholds == 0 {
            return Err(PipelineError::invalid_param(
                "eval.thresholds",
                self.eval.thresholds,
                ">= 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
data:
  n_samples: 200
  n_features: 10
  n_informative: 5
  class_sep: 2.0
  random_state: 42
  test_size: 0.25
train:
  C: 1.0
  max_iter: 100
  solver: lbfgs
eval:
  thresholds: 25
";

    #[test]
    fn test_parse_full() {
        let p = PipelineParams::from_yaml_str(FULL).expect("valid params");
        assert_eq!(p.data.n_samples, 200);
        assert_eq!(p.data.random_state, 42);
        assert!((p.train.c - 1.0).abs() < f64::EPSILON);
        assert_eq!(p.train.solver, Solver::Lbfgs);
        assert_eq!(p.eval.thresholds, 25);
    }

    #[test]
    fn test_eval_section_optional() {
        let without_eval = FULL.split("eval:").next().expect("prefix");
        let p = PipelineParams::from_yaml_str(without_eval).expect("valid params");
        assert_eq!(p.eval.thresholds, DEFAULT_THRESHOLDS);
    }

    #[test]
    fn test_eval_thresholds_optional() {
        let yaml = FULL.replace("eval:\n  thresholds: 25\n", "eval: {}\n");
        let p = PipelineParams::from_yaml_str(&yaml).expect("valid params");
        assert_eq!(p.eval.thresholds, DEFAULT_THRESHOLDS);
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = FULL.replace("  class_sep: 2.0\n", "");
        let err = PipelineParams::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
        assert!(err.to_string().contains("class_sep"));
    }

    #[test]
    fn test_unknown_solver_rejected() {
        let yaml = FULL.replace("solver: lbfgs", "solver: sag");
        let err = PipelineParams::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
    }

    #[test]
    fn test_newton_cholesky_solver() {
        let yaml = FULL.replace("solver: lbfgs", "solver: newton-cholesky");
        let p = PipelineParams::from_yaml_str(&yaml).expect("valid params");
        assert_eq!(p.train.solver, Solver::NewtonCholesky);
    }

    #[test]
    fn test_invalid_test_size() {
        let yaml = FULL.replace("test_size: 0.25", "test_size: 1.5");
        let err = PipelineParams::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("data.test_size"));
    }

    #[test]
    fn test_invalid_c() {
        let yaml = FULL.replace("C: 1.0", "C: 0.0");
        let err = PipelineParams::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("train.C"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = PipelineParams::from_file("/nonexistent/params.yaml").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
    }

    #[test]
    fn test_n_redundant() {
        let mut p = PipelineParams::from_yaml_str(FULL).expect("valid params");
        assert_eq!(p.data.n_redundant(), 0);
        p.data.n_features = 20;
        assert_eq!(p.data.n_redundant(), 10);
        p.data.n_informative = 20;
        assert_eq!(p.data.n_redundant(), 0);
    }
}
