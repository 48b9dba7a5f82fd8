// =========================================================================
// Linear algebra contract: the operations the optimizers depend on.
//
// References:
//   - Golub & Van Loan (2013) "Matrix Computations" ch. 4.2
// =========================================================================

use super::*;
use proptest::prelude::*;

/// `BᵀB + I` is symmetric positive definite for any square `B`.
fn spd_from(n: usize, entries: &[f64]) -> Matrix<f64> {
    let mut a = Matrix::eye(n);
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += entries[k * n + i] * entries[k * n + j];
            }
            a.set(i, j, a.get(i, j) + sum);
        }
    }
    a
}

#[test]
fn identity_matmul_is_noop() {
    let a = Matrix::from_vec(2, 3, vec![1.0, -2.0, 3.0, 0.5, 4.0, -1.5]).expect("valid");
    let c = a.matmul(&Matrix::eye(3)).expect("compatible dims");
    assert_eq!(c, a);
}

#[test]
fn cholesky_rejects_indefinite_and_non_square() {
    let indefinite = Matrix::from_vec(2, 2, vec![1.0, 2.0, 2.0, 1.0]).expect("valid");
    let b = Vector::from_slice(&[1.0, 1.0]);
    assert!(indefinite.cholesky_solve(&b).is_err());

    let wide = Matrix::from_vec(2, 3, vec![1.0; 6]).expect("valid");
    assert!(wide.cholesky_solve(&b).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn cauchy_schwarz(
        pairs in prop::collection::vec((-1e3..1e3f64, -1e3..1e3f64), 1..20),
    ) {
        let (u, v): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let (u, v) = (Vector::from_vec(u), Vector::from_vec(v));
        let bound = u.norm() * v.norm();
        prop_assert!(u.dot(&v).abs() <= bound * (1.0 + 1e-12) + 1e-12);
    }

    #[test]
    fn cholesky_solution_has_small_residual(
        n in 1usize..6,
        seed_entries in prop::collection::vec(-2.0..2.0f64, 36),
        rhs in prop::collection::vec(-10.0..10.0f64, 6),
    ) {
        let a = spd_from(n, &seed_entries[..n * n]);
        let b = Vector::from_slice(&rhs[..n]);
        let x = a.cholesky_solve(&b).expect("SPD by construction");
        let ax = a.matvec(&x).expect("square");
        for i in 0..n {
            prop_assert!((ax[i] - b[i]).abs() < 1e-8, "row {}: {} vs {}", i, ax[i], b[i]);
        }
    }

    #[test]
    fn matvec_is_linear(
        entries in prop::collection::vec(-5.0..5.0f64, 6),
        x in prop::collection::vec(-5.0..5.0f64, 3),
        y in prop::collection::vec(-5.0..5.0f64, 3),
        alpha in -3.0..3.0f64,
    ) {
        let a = Matrix::from_vec(2, 3, entries).expect("2x3");
        let (x, y) = (Vector::from_vec(x), Vector::from_vec(y));
        let lhs = a.matvec(&x.axpy(alpha, &y)).expect("dims");
        let rhs = a.matvec(&x).expect("dims").axpy(alpha, &a.matvec(&y).expect("dims"));
        for i in 0..2 {
            prop_assert!((lhs[i] - rhs[i]).abs() < 1e-9);
        }
    }
}
