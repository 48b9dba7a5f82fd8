//! Batch optimizers for smooth unconstrained objectives.
//!
//! # Available Optimizers
//!
//! - [`LBFGS`] - Limited-memory BFGS with a Wolfe line search
//! - [`DampedNewton`] - Newton steps on an explicit Hessian, regularized
//!   Cholesky solves and Armijo backtracking
//!
//! ## Line Search Strategies
//! - [`BacktrackingLineSearch`] - Armijo condition (sufficient decrease)
//! - [`WolfeLineSearch`] - Armijo + curvature conditions
//!
//! Convergence is declared when the max-abs gradient entry drops to the
//! tolerance or below.
//!
//! ```
//! use binclf::optim::{ConvergenceStatus, Optimizer, LBFGS};
//! use binclf::primitives::Vector;
//!
//! let mut optimizer = LBFGS::new(100, 1e-8, 10);
//!
//! let objective = |x: &Vector<f64>| (x[0] - 5.0).powi(2) + (x[1] - 3.0).powi(2);
//! let gradient = |x: &Vector<f64>| {
//!     Vector::from_slice(&[2.0 * (x[0] - 5.0), 2.0 * (x[1] - 3.0)])
//! };
//!
//! let result = optimizer.minimize(objective, gradient, Vector::zeros(2));
//!
//! assert_eq!(result.status, ConvergenceStatus::Converged);
//! assert!((result.solution[0] - 5.0).abs() < 1e-6);
//! assert!((result.solution[1] - 3.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::primitives::{Matrix, Vector};

mod lbfgs;
mod line_search;
mod newton;

pub use lbfgs::LBFGS;
pub use line_search::{BacktrackingLineSearch, LineSearch, WolfeLineSearch};
pub use newton::DampedNewton;

/// Steps shorter than this count as no progress.
pub(crate) const MIN_STEP: f64 = 1e-12;

/// Result of an optimization procedure.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final iterate
    pub solution: Vector<f64>,
    /// Objective at the final iterate
    pub objective_value: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// Convergence status
    pub status: ConvergenceStatus,
    /// Max-abs gradient entry at the final iterate
    pub gradient_norm: f64,
    /// Total elapsed time
    pub elapsed_time: std::time::Duration,
}

/// Convergence status of an optimization procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Gradient max-norm reached the tolerance
    Converged,
    /// Reached maximum iteration limit
    MaxIterations,
    /// Line search could not make progress
    Stalled,
    /// Objective became NaN or infinite
    NumericalError,
}

impl ConvergenceStatus {
    /// True only for [`ConvergenceStatus::Converged`].
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Self::Converged
    }
}

/// Batch minimizer over a full-data objective.
pub trait Optimizer {
    /// Minimizes `objective` starting from `x0`.
    ///
    /// Never panics on a bad objective: NaN/Inf values end the run with
    /// [`ConvergenceStatus::NumericalError`] and the last finite iterate.
    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f64>) -> OptimizationResult
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>;

    /// Clears any state carried between runs.
    fn reset(&mut self);
}

/// Solves `Ax = b` by Cholesky, adding `λI` when `A` is not positive definite.
///
/// λ starts at `initial_lambda` and grows ×10 per attempt.
///
/// # Errors
///
/// Returns an error if no λ up to 1e6 (or `max_attempts`) makes the system
/// solvable.
///
/// # Example
///
/// ```
/// use binclf::optim::safe_cholesky_solve;
/// use binclf::primitives::{Matrix, Vector};
///
/// // Singular
/// let a = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 0.0]).expect("valid dimensions");
/// let b = Vector::from_slice(&[1.0, 1.0]);
///
/// let x = safe_cholesky_solve(&a, &b, 1e-8, 10).expect("solvable with regularization");
/// assert_eq!(x.len(), 2);
/// ```
pub fn safe_cholesky_solve(
    a: &Matrix<f64>,
    b: &Vector<f64>,
    initial_lambda: f64,
    max_attempts: usize,
) -> Result<Vector<f64>, &'static str> {
    if let Ok(x) = a.cholesky_solve(b) {
        return Ok(x);
    }

    let mut lambda = initial_lambda;
    for _ in 0..max_attempts {
        let mut a_reg = a.clone();
        for i in 0..a.n_rows().min(a.n_cols()) {
            a_reg.set(i, i, a.get(i, i) + lambda);
        }
        if let Ok(x) = a_reg.cholesky_solve(b) {
            return Ok(x);
        }

        lambda *= 10.0;
        if lambda > 1e6 {
            return Err(
                "Cholesky solve failed: matrix too ill-conditioned even with regularization",
            );
        }
    }

    Err("Cholesky solve failed after maximum regularization attempts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_cholesky_positive_definite() {
        let a = Matrix::from_vec(2, 2, vec![4.0, 1.0, 1.0, 3.0]).expect("2x2");
        let b = Vector::from_slice(&[1.0, 2.0]);
        let x = safe_cholesky_solve(&a, &b, 1e-8, 10).expect("SPD system");
        // 4x + y = 1, x + 3y = 2 -> x = 1/11, y = 7/11
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_safe_cholesky_indefinite_regularized() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, -1e-3]).expect("2x2");
        let b = Vector::from_slice(&[1.0, 1.0]);
        let x = safe_cholesky_solve(&a, &b, 1e-8, 10).expect("regularized");
        assert!(x.is_finite());
    }

    #[test]
    fn test_safe_cholesky_gives_up() {
        let a = Matrix::from_vec(1, 1, vec![-1e9]).expect("1x1");
        let b = Vector::from_slice(&[1.0]);
        assert!(safe_cholesky_solve(&a, &b, 1e-8, 20).is_err());
    }

    #[test]
    fn test_status_is_converged() {
        assert!(ConvergenceStatus::Converged.is_converged());
        assert!(!ConvergenceStatus::MaxIterations.is_converged());
        assert!(!ConvergenceStatus::Stalled.is_converged());
    }
}
