pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_eye() {
    let m = Matrix::eye(3);
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(2, 2) - 1.0).abs() < 1e-12);
    assert!(m.get(0, 1).abs() < 1e-12);
}

#[test]
fn test_row_and_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
    assert_eq!(m.column(1).as_slice(), &[2.0, 5.0]);
}

#[test]
fn test_select_rows_keeps_order() {
    let m = Matrix::from_vec(3, 2, vec![0.0_f64, 0.5, 1.0, 1.5, 2.0, 2.5])
        .expect("test data has correct dimensions: 3*2=6 elements");
    let picked = m.select_rows(&[2, 0]);
    assert_eq!(picked.shape(), (2, 2));
    assert_eq!(picked.as_slice(), &[2.0, 2.5, 0.0, 0.5]);
}

#[test]
fn test_permute_columns() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    let p = m.permute_columns(&[2, 0, 1]);
    assert_eq!(p.as_slice(), &[3.0, 1.0, 2.0, 6.0, 4.0, 5.0]);
}

#[test]
fn test_matmul() {
    let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("2x2");
    let b = Matrix::from_vec(2, 1, vec![1.0, -1.0]).expect("2x1");
    let c = a.matmul(&b).expect("inner dimensions match");
    assert_eq!(c.shape(), (2, 1));
    assert_eq!(c.as_slice(), &[-1.0, -1.0]);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_matvec() {
    let a = Matrix::from_vec(2, 2, vec![2.0, 0.0, 1.0, 3.0]).expect("2x2");
    let x = Vector::from_slice(&[1.0, 2.0]);
    let y = a.matvec(&x).expect("dimensions match");
    assert_eq!(y.as_slice(), &[2.0, 7.0]);
}

#[test]
fn test_cholesky_solve() {
    // A = [[4, 2], [2, 3]], b = [2, 1] -> x = [0.5, 0.0]
    let a = Matrix::from_vec(2, 2, vec![4.0, 2.0, 2.0, 3.0]).expect("2x2");
    let b = Vector::from_slice(&[2.0, 1.0]);
    let x = a.cholesky_solve(&b).expect("positive definite");
    assert!((x[0] - 0.5).abs() < 1e-12);
    assert!(x[1].abs() < 1e-12);
}

#[test]
fn test_cholesky_not_positive_definite() {
    let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 2.0, 1.0]).expect("2x2");
    let b = Vector::from_slice(&[1.0, 1.0]);
    assert!(a.cholesky_solve(&b).is_err());
}
