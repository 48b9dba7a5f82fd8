//! Step-length selection along a descent direction.

use crate::primitives::Vector;

/// Strategy for choosing a step length.
///
/// Given `f`, its gradient, a point `x` and a descent direction `d`
/// (`∇f(x)·d < 0`), returns `α >= 0` such that `x + α·d` satisfies the
/// strategy's decrease conditions. A return of `0.0` (or anything below the
/// optimizer's minimum step) means no acceptable step was found.
///
/// ```
/// use binclf::optim::{BacktrackingLineSearch, LineSearch};
/// use binclf::primitives::Vector;
///
/// let ls = BacktrackingLineSearch::default();
/// let f = |x: &Vector<f64>| x[0] * x[0];
/// let grad = |x: &Vector<f64>| Vector::from_slice(&[2.0 * x[0]]);
///
/// let x = Vector::from_slice(&[1.0]);
/// let d = Vector::from_slice(&[-2.0]);
/// assert!(ls.search(&f, &grad, &x, &d) > 0.0);
/// ```
pub trait LineSearch {
    /// Finds a step size along `d` from `x`.
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f64>, d: &Vector<f64>) -> f64
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>;
}

/// Backtracking line search with the Armijo condition.
///
/// Starts at α = 1 and shrinks by `rho` until
///
/// ```text
/// f(x + α*d) ≤ f(x) + c₁*α*∇f(x)ᵀd
/// ```
#[derive(Debug, Clone)]
pub struct BacktrackingLineSearch {
    pub(crate) c1: f64,
    pub(crate) rho: f64,
    pub(crate) max_iter: usize,
}

impl BacktrackingLineSearch {
    /// Creates a backtracking search with Armijo constant `c1`, shrink
    /// factor `rho` and at most `max_iter` trial steps.
    #[must_use]
    pub fn new(c1: f64, rho: f64, max_iter: usize) -> Self {
        Self { c1, rho, max_iter }
    }
}

impl Default for BacktrackingLineSearch {
    /// c1=1e-4, rho=0.5, `max_iter=50`
    fn default() -> Self {
        Self::new(1e-4, 0.5, 50)
    }
}

impl LineSearch for BacktrackingLineSearch {
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f64>, d: &Vector<f64>) -> f64
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>,
    {
        let fx = f(x);
        let dir_deriv = grad(x).dot(d);

        let mut alpha = 1.0;
        for _ in 0..self.max_iter {
            let fx_new = f(&x.axpy(alpha, d));
            if fx_new.is_finite() && fx_new <= fx + self.c1 * alpha * dir_deriv {
                return alpha;
            }
            alpha *= self.rho;
        }
        0.0
    }
}

/// Line search enforcing the weak Wolfe conditions by bisection.
///
/// ```text
/// Armijo:    f(x + α*d) ≤ f(x) + c₁*α*∇f(x)ᵀd
/// Curvature: |∇f(x + α*d)ᵀd| ≤ c₂*|∇f(x)ᵀd|
/// ```
///
/// The bracket `[lo, hi]` shrinks on every trial; α doubles while no upper
/// bound is known. If the trial budget runs out, the last step that
/// satisfied Armijo is returned (0.0 if none did).
#[derive(Debug, Clone)]
pub struct WolfeLineSearch {
    pub(crate) c1: f64,
    pub(crate) c2: f64,
    pub(crate) max_iter: usize,
}

impl WolfeLineSearch {
    /// Creates a Wolfe line search.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < c1 < c2 < 1`.
    #[must_use]
    pub fn new(c1: f64, c2: f64, max_iter: usize) -> Self {
        assert!(
            c1 < c2 && c1 > 0.0 && c2 < 1.0,
            "Wolfe conditions require 0 < c1 < c2 < 1"
        );
        Self { c1, c2, max_iter }
    }
}

impl Default for WolfeLineSearch {
    /// c1=1e-4, c2=0.9, `max_iter=50`
    fn default() -> Self {
        Self::new(1e-4, 0.9, 50)
    }
}

impl LineSearch for WolfeLineSearch {
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f64>, d: &Vector<f64>) -> f64
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>,
    {
        let fx = f(x);
        let dir_deriv = grad(x).dot(d);

        let mut alpha = 1.0;
        let mut alpha_lo = 0.0;
        let mut alpha_hi = f64::INFINITY;
        // Last step that satisfied Armijo.
        let mut accepted = 0.0;

        for _ in 0..self.max_iter {
            let x_new = x.axpy(alpha, d);
            let fx_new = f(&x_new);

            if !fx_new.is_finite() || fx_new > fx + self.c1 * alpha * dir_deriv {
                alpha_hi = alpha;
                alpha = 0.5 * (alpha_lo + alpha_hi);
                continue;
            }
            accepted = alpha;

            let dir_deriv_new = grad(&x_new).dot(d);
            if dir_deriv_new.abs() <= self.c2 * dir_deriv.abs() {
                return alpha;
            }

            if dir_deriv_new > 0.0 {
                alpha_hi = alpha;
            } else {
                alpha_lo = alpha;
            }

            alpha = if alpha_hi.is_finite() {
                0.5 * (alpha_lo + alpha_hi)
            } else {
                2.0 * alpha
            };
        }

        accepted
    }
}
