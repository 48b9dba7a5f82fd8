//! Limited-memory BFGS (L-BFGS) optimizer.

use std::collections::VecDeque;

use crate::primitives::Vector;

use super::line_search::{LineSearch, WolfeLineSearch};
use super::{ConvergenceStatus, OptimizationResult, Optimizer, MIN_STEP};

/// Limited-memory BFGS (L-BFGS) optimizer.
///
/// Approximates the inverse Hessian from the last `m` position/gradient
/// difference pairs.
///
/// # Algorithm
///
/// 1. Compute gradient `g_k` = ∇`f(x_k)`
/// 2. Two-loop recursion gives `d_k` ≈ -H⁻¹ `g_k`
/// 3. Find step size `α_k` via Wolfe line search
/// 4. Update: x_{k+1} = `x_k` + `α_k` * `d_k`
/// 5. Store the pair (s, y) if `yᵀs > 0`
///
/// # Example
///
/// ```
/// use binclf::optim::{ConvergenceStatus, Optimizer, LBFGS};
/// use binclf::primitives::Vector;
///
/// let mut optimizer = LBFGS::new(500, 1e-6, 10);
///
/// let f = |x: &Vector<f64>| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
/// let grad = |x: &Vector<f64>| {
///     Vector::from_slice(&[
///         -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0] * x[0]),
///         200.0 * (x[1] - x[0] * x[0]),
///     ])
/// };
///
/// let result = optimizer.minimize(f, grad, Vector::zeros(2));
/// assert_eq!(result.status, ConvergenceStatus::Converged);
/// ```
#[derive(Debug, Clone)]
pub struct LBFGS {
    pub(crate) max_iter: usize,
    pub(crate) tol: f64,
    pub(crate) m: usize,
    line_search: WolfeLineSearch,
    /// `s_k` = x_{k+1} - `x_k`
    pub(crate) s_history: VecDeque<Vector<f64>>,
    /// `y_k` = g_{k+1} - `g_k`
    pub(crate) y_history: VecDeque<Vector<f64>>,
}

impl LBFGS {
    /// Creates an L-BFGS optimizer with iteration cap `max_iter`, gradient
    /// max-norm tolerance `tol` and history size `m`.
    #[must_use]
    pub fn new(max_iter: usize, tol: f64, m: usize) -> Self {
        Self {
            max_iter,
            tol,
            m,
            line_search: WolfeLineSearch::default(),
            s_history: VecDeque::with_capacity(m),
            y_history: VecDeque::with_capacity(m),
        }
    }

    /// Two-loop recursion: returns `-H⁻¹ grad` under the current history.
    fn compute_direction(&self, grad: &Vector<f64>) -> Vector<f64> {
        let k = self.s_history.len();
        let mut q = grad.scale(-1.0);
        if k == 0 {
            return q;
        }

        let mut alpha = vec![0.0; k];
        let rho: Vec<f64> = self
            .s_history
            .iter()
            .zip(&self.y_history)
            .map(|(s, y)| 1.0 / y.dot(s))
            .collect();

        for i in (0..k).rev() {
            alpha[i] = rho[i] * self.s_history[i].dot(&q);
            q = q.axpy(-alpha[i], &self.y_history[i]);
        }

        let (s_last, y_last) = (&self.s_history[k - 1], &self.y_history[k - 1]);
        let gamma = s_last.dot(y_last) / y_last.dot(y_last);
        let mut r = q.scale(gamma);

        for i in 0..k {
            let beta = rho[i] * self.y_history[i].dot(&r);
            r = r.axpy(alpha[i] - beta, &self.s_history[i]);
        }

        r
    }

    fn push_pair(&mut self, s: Vector<f64>, y: Vector<f64>) {
        if self.s_history.len() == self.m {
            self.s_history.pop_front();
            self.y_history.pop_front();
        }
        self.s_history.push_back(s);
        self.y_history.push_back(y);
    }
}

impl Optimizer for LBFGS {
    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f64>) -> OptimizationResult
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>,
    {
        let start_time = std::time::Instant::now();
        self.reset();

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

            let mut d = self.compute_direction(&grad);
            if grad.dot(&d) >= 0.0 {
                // Stale curvature pairs; restart from steepest descent.
                self.reset();
                d = grad.scale(-1.0);
            }

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

            let s_k = x_new.axpy(-1.0, &x);
            let y_k = grad_new.axpy(-1.0, &grad);
            if y_k.dot(&s_k) > 1e-10 {
                self.push_pair(s_k, y_k);
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

    fn reset(&mut self) {
        self.s_history.clear();
        self.y_history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rosenbrock(x: &Vector<f64>) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }

    fn rosenbrock_grad(x: &Vector<f64>) -> Vector<f64> {
        Vector::from_slice(&[
            -2.0 * (1.0 - x[0]) - 400.0 * x[0] * (x[1] - x[0] * x[0]),
            200.0 * (x[1] - x[0] * x[0]),
        ])
    }

    #[test]
    fn test_lbfgs_quadratic() {
        let mut optimizer = LBFGS::new(100, 1e-8, 10);
        let f = |x: &Vector<f64>| (x[0] - 5.0).powi(2);
        let grad = |x: &Vector<f64>| Vector::from_slice(&[2.0 * (x[0] - 5.0)]);

        let result = optimizer.minimize(f, grad, Vector::from_slice(&[0.0]));

        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert!((result.solution[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_lbfgs_rosenbrock() {
        let mut optimizer = LBFGS::new(1000, 1e-6, 10);
        let result = optimizer.minimize(rosenbrock, rosenbrock_grad, Vector::zeros(2));

        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert!((result.solution[0] - 1.0).abs() < 1e-4);
        assert!((result.solution[1] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_lbfgs_already_converged() {
        let mut optimizer = LBFGS::new(100, 1e-5, 10);
        let f = |x: &Vector<f64>| x[0] * x[0];
        let grad = |x: &Vector<f64>| Vector::from_slice(&[2.0 * x[0]]);

        let result = optimizer.minimize(f, grad, Vector::from_slice(&[0.0]));

        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_lbfgs_max_iterations() {
        let mut optimizer = LBFGS::new(2, 1e-12, 10);
        let result = optimizer.minimize(rosenbrock, rosenbrock_grad, Vector::from_slice(&[-1.2, 1.0]));

        assert_eq!(result.status, ConvergenceStatus::MaxIterations);
        assert_eq!(result.iterations, 2);
        assert!(result.objective_value < rosenbrock(&Vector::from_slice(&[-1.2, 1.0])));
    }

    #[test]
    fn test_lbfgs_numerical_error_at_start() {
        let mut optimizer = LBFGS::new(10, 1e-5, 5);
        let f = |_: &Vector<f64>| f64::NAN;
        let grad = |_: &Vector<f64>| Vector::from_slice(&[1.0]);

        let result = optimizer.minimize(f, grad, Vector::from_slice(&[1.0]));
        assert_eq!(result.status, ConvergenceStatus::NumericalError);
    }

    #[test]
    fn test_lbfgs_history_capped() {
        let mut optimizer = LBFGS::new(50, 1e-10, 2);
        let f = |x: &Vector<f64>| {
            (x[0] - 1.0).powi(2) + 2.0 * (x[1] - 2.0).powi(2) + 3.0 * (x[2] - 3.0).powi(2)
        };
        let grad = |x: &Vector<f64>| {
            Vector::from_slice(&[2.0 * (x[0] - 1.0), 4.0 * (x[1] - 2.0), 6.0 * (x[2] - 3.0)])
        };

        let result = optimizer.minimize(f, grad, Vector::from_slice(&[10.0, -5.0, 8.0]));

        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert!((result.solution[2] - 3.0).abs() < 1e-8);
        assert!(optimizer.s_history.len() <= 2);
    }

    #[test]
    fn test_lbfgs_compute_direction_no_history() {
        let optimizer = LBFGS::new(100, 1e-5, 5);
        let d = optimizer.compute_direction(&Vector::from_slice(&[3.0, -4.0]));
        assert_eq!(d.as_slice(), &[-3.0, 4.0]);
    }

    #[test]
    fn test_lbfgs_reset_clears_history() {
        let mut optimizer = LBFGS::new(100, 1e-10, 5);
        let f = |x: &Vector<f64>| x[0] * x[0] + 10.0 * x[1] * x[1];
        let grad = |x: &Vector<f64>| Vector::from_slice(&[2.0 * x[0], 20.0 * x[1]]);

        let _ = optimizer.minimize(f, grad, Vector::from_slice(&[5.0, 1.0]));
        assert!(!optimizer.s_history.is_empty());

        optimizer.reset();
        assert!(optimizer.s_history.is_empty());
        assert!(optimizer.y_history.is_empty());
    }
}

#[cfg(test)]
#[path = "tests_lbfgs_contract.rs"]
mod tests_lbfgs_contract;
