//! Damped Newton's method.

use crate::primitives::{Matrix, Vector};

use super::line_search::{BacktrackingLineSearch, LineSearch};
use super::{safe_cholesky_solve, ConvergenceStatus, OptimizationResult, MIN_STEP};

/// Newton's method with regularized Cholesky solves and Armijo backtracking.
///
/// Each iteration solves `H d = -g`. If `H` is not positive definite,
/// [`safe_cholesky_solve`] adds a growing ridge; if that fails too, the step
/// falls back to steepest descent. The step length comes from a
/// [`BacktrackingLineSearch`], so every accepted step decreases the
/// objective. The caller supplies the exact Hessian.
///
/// # Example
///
/// ```
/// use binclf::optim::{ConvergenceStatus, DampedNewton};
/// use binclf::primitives::{Matrix, Vector};
///
/// let mut optimizer = DampedNewton::new(50, 1e-10);
///
/// let f = |x: &Vector<f64>| x[0] * x[0] + 2.0 * x[1] * x[1];
/// let grad = |x: &Vector<f64>| Vector::from_slice(&[2.0 * x[0], 4.0 * x[1]]);
/// let hess = |_: &Vector<f64>| Matrix::from_vec(2, 2, vec![2.0, 0.0, 0.0, 4.0]).expect("2x2");
///
/// let result = optimizer.minimize_with_hessian(f, grad, hess, Vector::from_slice(&[5.0, 3.0]));
/// assert_eq!(result.status, ConvergenceStatus::Converged);
/// assert!(result.iterations <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct DampedNewton {
    pub(crate) max_iter: usize,
    pub(crate) tol: f64,
    line_search: BacktrackingLineSearch,
}

impl DampedNewton {
    /// Creates a damped Newton optimizer.
    #[must_use]
    pub fn new(max_iter: usize, tol: f64) -> Self {
        Self {
            max_iter,
            tol,
            line_search: BacktrackingLineSearch::default(),
        }
    }

    /// Minimizes with an explicit Hessian.
    pub fn minimize_with_hessian<F, G, H>(
        &mut self,
        objective: F,
        gradient: G,
        hessian: H,
        x0: Vector<f64>,
    ) -> OptimizationResult
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>,
        H: Fn(&Vector<f64>) -> Matrix<f64>,
    {
        let start_time = std::time::Instant::now();

        let mut x = x0;
        let mut fx = objective(&x);
        let mut grad = gradient(&x);

        let finish = |x: Vector<f64>, fx: f64, grad: &Vector<f64>, iterations, status| {
            OptimizationResult {
                solution: x,
                objective_value: fx,
                iterations,
                status,
                gradient_norm: grad.norm_inf(),
                elapsed_time: start_time.elapsed(),
            }
        };

        if !fx.is_finite() || !grad.is_finite() {
            return finish(x, fx, &grad, 0, ConvergenceStatus::NumericalError);
        }

        for iter in 0..self.max_iter {
            if grad.norm_inf() <= self.tol {
                return finish(x, fx, &grad, iter, ConvergenceStatus::Converged);
            }

            let neg_grad = grad.scale(-1.0);
            let d = match safe_cholesky_solve(&hessian(&x), &neg_grad, 1e-8, 10) {
                Ok(d) if d.is_finite() && grad.dot(&d) < 0.0 => d,
                _ => neg_grad,
            };

            let alpha = self.line_search.search(&objective, &gradient, &x, &d);
            if alpha < MIN_STEP {
                return finish(x, fx, &grad, iter, ConvergenceStatus::Stalled);
            }

            let x_new = x.axpy(alpha, &d);
            let fx_new = objective(&x_new);
            let grad_new = gradient(&x_new);
            if !fx_new.is_finite() || !grad_new.is_finite() {
                return finish(x, fx, &grad, iter, ConvergenceStatus::NumericalError);
            }

            x = x_new;
            fx = fx_new;
            grad = grad_new;
        }

        if grad.norm_inf() <= self.tol {
            return finish(x, fx, &grad, self.max_iter, ConvergenceStatus::Converged);
        }
        finish(x, fx, &grad, self.max_iter, ConvergenceStatus::MaxIterations)
    }
}
