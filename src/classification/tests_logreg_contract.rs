// =========================================================================
// LogisticRegression contract: bounded probabilities, consistent labels,
// deterministic fits.
//
// References:
//   - Bishop (2006) "Pattern Recognition and Machine Learning" ch. 4.3
// =========================================================================

use super::*;
use proptest::prelude::*;

fn fitted(solver: Solver) -> (LogisticRegression, Matrix<f64>) {
    let x = Matrix::from_vec(
        8,
        2,
        vec![
            0.0, 0.0, 0.5, 0.5, 1.0, 0.0, 2.5, 2.0, //
            5.0, 5.0, 5.5, 5.5, 6.0, 5.0, 2.0, 3.0,
        ],
    )
    .expect("valid");
    let y = vec![0_usize, 0, 0, 0, 1, 1, 1, 1];
    let mut lr = LogisticRegression::new().with_solver(solver);
    lr.fit(&x, &y).expect("fit");
    (lr, x)
}

#[test]
fn prediction_count_matches_rows() {
    let (lr, x) = fitted(Solver::Lbfgs);
    assert_eq!(lr.predict(&x).expect("fitted").len(), 8);
}

#[test]
fn refit_is_bit_identical() {
    let (a, _) = fitted(Solver::Lbfgs);
    let (b, _) = fitted(Solver::Lbfgs);
    assert_eq!(a, b);

    let (c, _) = fitted(Solver::NewtonCholesky);
    let (d, _) = fitted(Solver::NewtonCholesky);
    assert_eq!(c, d);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn probabilities_bounded_and_labels_consistent(
        a in -1e3..1e3f64,
        b in -1e3..1e3f64,
    ) {
        for solver in [Solver::Lbfgs, Solver::NewtonCholesky] {
            let (lr, _) = fitted(solver);
            let probe = Matrix::from_vec(1, 2, vec![a, b]).expect("1x2");
            let p = lr.predict_proba(&probe).expect("fitted")[0];
            let z = lr.decision_function(&probe).expect("fitted")[0];
            let label = lr.predict(&probe).expect("fitted")[0];

            prop_assert!((0.0..=1.0).contains(&p));
            prop_assert_eq!(label, usize::from(p >= 0.5));
            if z > 1e-9 {
                prop_assert_eq!(label, 1);
            }
            if z < -1e-9 {
                prop_assert_eq!(label, 0);
            }
        }
    }
}
