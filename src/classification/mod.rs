//! L2-regularized logistic regression for binary labels.
//!
//! [`LogisticRegression::fit`] minimizes
//!
//! ```text
//! (1/2C)·‖w‖² + Σᵢ log(1 + exp(-sᵢ·(w·xᵢ + b))),   sᵢ = 2yᵢ - 1
//! ```
//!
//! divided by the number of rows, with either L-BFGS or damped Newton.
//! The intercept is not penalized.
//!
//! # Example
//!
//! ```
//! use binclf::classification::{LogisticRegression, Solver};
//! use binclf::primitives::Matrix;
//!
//! let x = Matrix::from_vec(6, 1, vec![-3.0, -2.0, -0.5, 0.5, 2.0, 3.0])
//!     .expect("Matrix dimensions match data length");
//! let y = vec![0, 0, 1, 0, 1, 1];
//!
//! let mut model = LogisticRegression::new()
//!     .with_c(1.0)
//!     .with_max_iter(100)
//!     .with_solver(Solver::Lbfgs);
//! model.fit(&x, &y).expect("both classes present");
//! assert!(model.converged());
//!
//! let p = model.predict_proba(&x).expect("fitted");
//! assert!(p[0] < 0.5 && p[5] > 0.5);
//! ```

use crate::error::{PipelineError, Result};
use crate::optim::{DampedNewton, Optimizer, LBFGS};
use crate::primitives::{Matrix, Vector};
use crate::traits::ProbabilisticClassifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default gradient max-norm tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

const LBFGS_HISTORY: usize = 10;

/// Optimizer used by [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    /// Limited-memory BFGS with Wolfe line search
    #[default]
    Lbfgs,
    /// Damped Newton on the exact Hessian
    NewtonCholesky,
}

impl Solver {
    /// Name as written in parameter files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lbfgs => "lbfgs",
            Self::NewtonCholesky => "newton-cholesky",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logistic Regression classifier for binary classification.
///
/// Hyperparameters and fit diagnostics are serialized with the weights, so
/// a stored model reproduces its predictions and records how it was fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Weights; `None` until fitted
    coefficients: Option<Vector<f64>>,
    intercept: f64,
    /// Inverse regularization strength
    c: f64,
    max_iter: usize,
    solver: Solver,
    tol: f64,
    n_iter: usize,
    converged: bool,
}

impl LogisticRegression {
    /// `C = 1`, 100 iterations, L-BFGS, tolerance 1e-4.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            c: 1.0,
            max_iter: 100,
            solver: Solver::Lbfgs,
            tol: DEFAULT_TOLERANCE,
            n_iter: 0,
            converged: false,
        }
    }

    /// Sets the inverse regularization strength.
    #[must_use]
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the optimizer.
    #[must_use]
    pub fn with_solver(mut self, solver: Solver) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn validate_hyperparameters(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(PipelineError::invalid_param("C", self.c, "> 0"));
        }
        if self.max_iter == 0 {
            return Err(PipelineError::invalid_param("max_iter", 0, "> 0"));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(PipelineError::invalid_param("tol", self.tol, "> 0"));
        }
        Ok(())
    }

    /// Fits the model to training data.
    ///
    /// Running out of iterations is not an error: the last iterate is kept,
    /// [`converged`](Self::converged) returns `false` and a warning is logged.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Configuration`] for `C <= 0`, `max_iter == 0` or a
    ///   non-positive tolerance
    /// - [`PipelineError::EmptyInput`] for zero rows
    /// - [`PipelineError::DimensionMismatch`] if `y` and `x` disagree on rows
    /// - [`PipelineError::InvalidLabel`] for a label outside {0, 1}
    /// - [`PipelineError::DegenerateInput`] if every label is the same
    pub fn fit(&mut self, x: &Matrix<f64>, y: &[usize]) -> Result<()> {
        self.validate_hyperparameters()?;

        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(PipelineError::empty_input("training data"));
        }
        if n_samples != y.len() {
            return Err(PipelineError::dimension_mismatch("labels", n_samples, y.len()));
        }
        if let Some((row, &label)) = y.iter().enumerate().find(|(_, &l)| l > 1) {
            return Err(PipelineError::InvalidLabel { row, label });
        }
        let positives = y.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == n_samples {
            return Err(PipelineError::DegenerateInput {
                reason: format!(
                    "all {n_samples} training labels are {}; need both classes",
                    usize::from(positives > 0)
                ),
            });
        }

        let objective = Objective::new(x, y, self.c);
        let x0 = Vector::zeros(n_features + 1);
        let result = match self.solver {
            Solver::Lbfgs => LBFGS::new(self.max_iter, self.tol, LBFGS_HISTORY).minimize(
                |theta: &Vector<f64>| objective.value(theta),
                |theta: &Vector<f64>| objective.gradient(theta),
                x0,
            ),
            Solver::NewtonCholesky => DampedNewton::new(self.max_iter, self.tol)
                .minimize_with_hessian(
                    |theta: &Vector<f64>| objective.value(theta),
                    |theta: &Vector<f64>| objective.gradient(theta),
                    |theta: &Vector<f64>| objective.hessian(theta),
                    x0,
                ),
        };

        let mut theta = result.solution.into_vec();
        let intercept = theta.pop().unwrap_or(0.0);
        self.coefficients = Some(Vector::from_vec(theta));
        self.intercept = intercept;
        self.n_iter = result.iterations;
        self.converged = result.status.is_converged();

        if self.converged {
            tracing::debug!(
                solver = %self.solver,
                n_iter = self.n_iter,
                objective = result.objective_value,
                gradient_norm = result.gradient_norm,
                "logistic regression converged"
            );
        } else {
            tracing::warn!(
                solver = %self.solver,
                n_iter = self.n_iter,
                max_iter = self.max_iter,
                status = ?result.status,
                gradient_norm = result.gradient_norm,
                tol = self.tol,
                "logistic regression did not converge; increase max_iter or scale the data"
            );
        }
        Ok(())
    }

    fn fitted_coefficients(&self) -> Result<&Vector<f64>> {
        self.coefficients.as_ref().ok_or(PipelineError::NotFitted)
    }

    /// Linear scores `w·xᵢ + b`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotFitted`] before `fit`; dimension mismatch if the
    /// column count differs from training.
    pub fn decision_function(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let coef = self.fitted_coefficients()?;
        if x.n_cols() != coef.len() {
            return Err(PipelineError::dimension_mismatch(
                "n_features",
                coef.len(),
                x.n_cols(),
            ));
        }
        let scores = (0..x.n_rows())
            .map(|row| dot(x.row_slice(row), coef.as_slice()) + self.intercept)
            .collect();
        Ok(Vector::from_vec(scores))
    }

    /// Probability of class 1 for each row.
    ///
    /// # Errors
    ///
    /// Same as [`decision_function`](Self::decision_function).
    pub fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let scores = self.decision_function(x)?;
        Ok(Vector::from_vec(scores.iter().map(sigmoid).collect()))
    }

    /// Hard labels at probability 0.5.
    ///
    /// # Errors
    ///
    /// Same as [`decision_function`](Self::decision_function).
    pub fn predict(&self, x: &Matrix<f64>) -> Result<Vec<usize>> {
        Ok(self
            .predict_proba(x)?
            .iter()
            .map(|p| usize::from(p >= 0.5))
            .collect())
    }

    /// Fitted weights, `None` before `fit`.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f64>> {
        self.coefficients.as_ref()
    }

    /// Fitted intercept (0 before `fit`).
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Inverse regularization strength.
    #[must_use]
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Iteration cap.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Optimizer.
    #[must_use]
    pub fn solver(&self) -> Solver {
        self.solver
    }

    /// Convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Iterations the last fit ran.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Whether the last fit met the tolerance.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// True once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        LogisticRegression::predict_proba(self, x)
    }
}

/// Mean penalized log-loss over `[w, b]`.
struct Objective<'a> {
    x: &'a Matrix<f64>,
    /// Labels as ±1
    signs: Vec<f64>,
    c: f64,
    inv_n: f64,
}

impl<'a> Objective<'a> {
    fn new(x: &'a Matrix<f64>, y: &[usize], c: f64) -> Self {
        Self {
            x,
            signs: y.iter().map(|&l| if l == 1 { 1.0 } else { -1.0 }).collect(),
            c,
            inv_n: 1.0 / y.len() as f64,
        }
    }

    fn n_features(&self) -> usize {
        self.x.n_cols()
    }

    fn margin(&self, theta: &Vector<f64>, row: usize) -> f64 {
        let f = self.n_features();
        dot(self.x.row_slice(row), &theta.as_slice()[..f]) + theta[f]
    }

    fn value(&self, theta: &Vector<f64>) -> f64 {
        let f = self.n_features();
        let w = &theta.as_slice()[..f];
        let penalty = w.iter().map(|v| v * v).sum::<f64>() / (2.0 * self.c);
        let loss: f64 = self
            .signs
            .iter()
            .enumerate()
            .map(|(i, &s)| softplus(-s * self.margin(theta, i)))
            .sum();
        (penalty + loss) * self.inv_n
    }

    fn gradient(&self, theta: &Vector<f64>) -> Vector<f64> {
        let f = self.n_features();
        let mut grad = Vector::zeros(f + 1);
        for (i, &s) in self.signs.iter().enumerate() {
            // d/dz log(1 + e^{-sz}) = -s·σ(-sz)
            let r = -s * sigmoid(-s * self.margin(theta, i));
            for (j, &xij) in self.x.row_slice(i).iter().enumerate() {
                grad[j] += r * xij;
            }
            grad[f] += r;
        }
        for j in 0..f {
            grad[j] += theta[j] / self.c;
        }
        grad.scale(self.inv_n)
    }

    fn hessian(&self, theta: &Vector<f64>) -> Matrix<f64> {
        let f = self.n_features();
        let dim = f + 1;
        let mut h = Matrix::zeros(dim, dim);
        let mut row_aug = vec![1.0; dim];
        for i in 0..self.signs.len() {
            let p = sigmoid(self.margin(theta, i));
            let weight = p * (1.0 - p);
            row_aug[..f].copy_from_slice(self.x.row_slice(i));
            for a in 0..dim {
                let wa = weight * row_aug[a];
                for b in a..dim {
                    h.set(a, b, h.get(a, b) + wa * row_aug[b]);
                }
            }
        }
        for a in 0..dim {
            if a < f {
                h.set(a, a, h.get(a, a) + 1.0 / self.c);
            }
            for b in a..dim {
                let v = h.get(a, b) * self.inv_n;
                h.set(a, b, v);
                h.set(b, a, v);
            }
        }
        h
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// σ(z) = 1 / (1 + e^(-z)), without overflow for large |z|.
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + e^t), without overflow for large t.
pub(crate) fn softplus(t: f64) -> f64 {
    t.max(0.0) + (-t.abs()).exp().ln_1p()
}


#[cfg(test)]
#[path = "tests_logreg_contract.rs"]
mod tests_logreg_contract;
