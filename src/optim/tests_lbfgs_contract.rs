// =========================================================================
// L-BFGS contract: descent, finiteness and convex-minimizer recovery.
//
// References:
//   - Nocedal (1980) "Updating Quasi-Newton Matrices with Limited Storage"
// =========================================================================

use super::*;
use proptest::prelude::*;

/// Separable convex quadratic Σ wᵢ (xᵢ - cᵢ)².
fn weighted_quadratic(
    weights: Vec<f64>,
    centre: Vec<f64>,
) -> (
    impl Fn(&Vector<f64>) -> f64,
    impl Fn(&Vector<f64>) -> Vector<f64>,
) {
    let (w1, c1) = (weights.clone(), centre.clone());
    let f = move |x: &Vector<f64>| {
        (0..x.len())
            .map(|i| w1[i] * (x[i] - c1[i]).powi(2))
            .sum::<f64>()
    };
    let g = move |x: &Vector<f64>| {
        Vector::from_vec(
            (0..x.len())
                .map(|i| 2.0 * weights[i] * (x[i] - centre[i]))
                .collect(),
        )
    };
    (f, g)
}

#[test]
fn objective_never_increases() {
    let (f, g) = weighted_quadratic(vec![1.0, 50.0], vec![2.0, -1.0]);
    let x0 = Vector::from_slice(&[-4.0, 6.0]);
    let initial = f(&x0);

    let result = LBFGS::new(100, 1e-8, 10).minimize(&f, &g, x0);
    assert!(result.objective_value <= initial);
    assert!(result.solution.is_finite());
}

#[test]
fn gradient_norm_reported_at_solution() {
    let (f, g) = weighted_quadratic(vec![3.0], vec![1.5]);
    let result = LBFGS::new(100, 1e-9, 5).minimize(&f, &g, Vector::from_slice(&[10.0]));
    assert!((result.gradient_norm - g(&result.solution).norm_inf()).abs() < 1e-15);
    assert!(result.gradient_norm <= 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn recovers_minimizer_of_convex_quadratic(
        weights in proptest::collection::vec(0.1..20.0f64, 1..6),
        seed_centre in proptest::collection::vec(-10.0..10.0f64, 6),
    ) {
        let n = weights.len();
        let centre: Vec<f64> = seed_centre[..n].to_vec();
        let (f, g) = weighted_quadratic(weights, centre.clone());

        let result = LBFGS::new(200, 1e-8, 10).minimize(&f, &g, Vector::zeros(n));

        prop_assert_eq!(result.status, ConvergenceStatus::Converged);
        for (i, c) in centre.iter().enumerate() {
            prop_assert!((result.solution[i] - c).abs() < 1e-6);
        }
    }
}
