// =========================================================================
// make_classification contract: reproducibility, layout and validation.
// =========================================================================

use super::*;

fn scenario() -> ClassificationParams {
    ClassificationParams::new(200, 10)
        .with_n_informative(5)
        .with_n_redundant(0)
        .with_class_sep(2.0)
        .with_random_state(42)
}

#[test]
fn same_seed_gives_bit_identical_dataset() {
    let a = make_classification(&scenario()).expect("valid parameters");
    let b = make_classification(&scenario()).expect("valid parameters");

    let bits = |ds: &Dataset| -> Vec<u64> {
        ds.features().as_slice().iter().map(|v| v.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.labels(), b.labels());
}

#[test]
fn different_seed_gives_different_dataset() {
    let a = make_classification(&scenario()).expect("valid parameters");
    let b = make_classification(&scenario().with_random_state(43)).expect("valid parameters");
    assert_ne!(a.features().as_slice(), b.features().as_slice());
}

#[test]
fn shape_and_both_classes_present() {
    let ds = make_classification(&scenario()).expect("valid parameters");
    assert_eq!(ds.shape(), (200, 10));
    let [neg, pos] = ds.class_counts();
    assert!(neg > 80 && pos > 80, "class balance off: {neg}/{pos}");
    assert!(ds.features().as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn unshuffled_clusters_alternate_labels() {
    let params = ClassificationParams::new(40, 4)
        .with_n_informative(2)
        .with_n_redundant(0)
        .with_flip_y(0.0)
        .with_shuffle(false)
        .with_random_state(3);
    let ds = make_classification(&params).expect("valid parameters");

    // 4 clusters of 10 rows: labels 0, 1, 0, 1.
    let expected: Vec<usize> = (0..40).map(|i| (i / 10) % 2).collect();
    assert_eq!(ds.labels(), expected.as_slice());
}

#[test]
fn uneven_cluster_sizes_distribute_remainder() {
    assert_eq!(cluster_sizes(10, 4), vec![3, 3, 2, 2]);
    assert_eq!(cluster_sizes(8, 4), vec![2, 2, 2, 2]);
}

#[test]
fn redundant_column_is_linear_in_informative() {
    let params = ClassificationParams::new(60, 3)
        .with_n_informative(2)
        .with_n_redundant(1)
        .with_shuffle(false)
        .with_random_state(11);
    let ds = make_classification(&params).expect("valid parameters");
    let x = ds.features();

    // Least squares of column 2 on columns 0 and 1 via normal equations.
    let (mut a00, mut a01, mut a11, mut b0, mut b1) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for r in 0..x.n_rows() {
        let (u, v, w) = (x.get(r, 0), x.get(r, 1), x.get(r, 2));
        a00 += u * u;
        a01 += u * v;
        a11 += v * v;
        b0 += u * w;
        b1 += v * w;
    }
    let gram = Matrix::from_vec(2, 2, vec![a00, a01, a01, a11]).expect("2x2");
    let rhs = crate::primitives::Vector::from_slice(&[b0, b1]);
    let coef = gram.cholesky_solve(&rhs).expect("informative columns independent");

    for r in 0..x.n_rows() {
        let fitted = coef[0] * x.get(r, 0) + coef[1] * x.get(r, 1);
        assert!((fitted - x.get(r, 2)).abs() < 1e-9);
    }
}

#[test]
fn hypercube_vertices_are_distinct() {
    let mut rng = StdRng::seed_from_u64(0);
    let vertices = hypercube(8, 3, &mut rng);
    assert_eq!(vertices.len(), 8);
    for (i, a) in vertices.iter().enumerate() {
        assert!(a.iter().all(|&c| c == 0.0 || c == 1.0));
        for b in &vertices[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn hypercube_beyond_exact_dims() {
    let mut rng = StdRng::seed_from_u64(0);
    let vertices = hypercube(4, 33, &mut rng);
    assert!(vertices.iter().all(|v| v.len() == 33));
}

#[test]
fn rejects_too_few_informative_for_clusters() {
    let params = ClassificationParams::new(100, 5)
        .with_n_informative(1)
        .with_n_redundant(0);
    let err = make_classification(&params).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration { .. }));
}

#[test]
fn rejects_too_many_structured_columns() {
    let params = ClassificationParams::new(100, 4)
        .with_n_informative(3)
        .with_n_redundant(2);
    assert!(make_classification(&params).is_err());
}

#[test]
fn rejects_bad_flip_and_sep() {
    let base = ClassificationParams::new(100, 4).with_n_redundant(0);
    assert!(make_classification(&base.clone().with_flip_y(1.5)).is_err());
    assert!(make_classification(&base.with_class_sep(0.0)).is_err());
}

#[test]
fn standard_normal_moments() {
    let mut rng = StdRng::seed_from_u64(5);
    let draws: Vec<f64> = (0..20_000).map(|_| standard_normal(&mut rng)).collect();
    let mean = draws.iter().sum::<f64>() / draws.len() as f64;
    let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / draws.len() as f64;
    assert!(mean.abs() < 0.05, "mean {mean}");
    assert!((var - 1.0).abs() < 0.05, "variance {var}");
}

mod generator_proptest {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn generated_shape_matches_request(
            n_samples in 8..=120usize,
            n_informative in 2..=5usize,
            extra in 0..=6usize,
            seed in 0..1000u64,
        ) {
            let n_features = n_informative + extra;
            let params = ClassificationParams::new(n_samples, n_features)
                .with_n_informative(n_informative)
                .with_n_redundant(extra / 2)
                .with_random_state(seed);
            let ds = make_classification(&params).expect("valid parameters");
            prop_assert_eq!(ds.shape(), (n_samples, n_features));
            prop_assert!(ds.labels().iter().all(|&l| l <= 1));
        }
    }
}
