// =========================================================================
// StratifiedSplit contract: agreement, stratification and failure modes.
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn balanced(n: usize) -> Vec<usize> {
    (0..n).map(|i| i % 2).collect()
}

#[test]
fn scenario_split_sizes() {
    let split = StratifiedSplit::new(0.25)
        .with_random_state(42)
        .split(&balanced(200))
        .expect("balanced labels");
    assert_eq!(split.train.len(), 150);
    assert_eq!(split.test.len(), 50);
}

#[test]
fn same_inputs_give_identical_split() {
    let labels = balanced(97);
    let splitter = StratifiedSplit::new(0.3).with_random_state(7);
    let a = splitter.split(&labels).expect("valid");
    let b = splitter.split(&labels).expect("valid");
    assert_eq!(a, b);
}

#[test]
fn different_seed_changes_split() {
    let labels = balanced(100);
    let a = StratifiedSplit::new(0.25).with_random_state(1).split(&labels).expect("valid");
    let b = StratifiedSplit::new(0.25).with_random_state(2).split(&labels).expect("valid");
    assert_ne!(a.test, b.test);
}

#[test]
fn sides_are_disjoint_and_cover_all_rows() {
    let labels = balanced(41);
    let split = StratifiedSplit::new(0.2).split(&labels).expect("valid");
    let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..41).collect::<Vec<_>>());
}

#[test]
fn imbalanced_classes_keep_proportions() {
    // 80 negatives, 20 positives.
    let labels: Vec<usize> = (0..100).map(|i| usize::from(i >= 80)).collect();
    let split = StratifiedSplit::new(0.25).with_random_state(3).split(&labels).expect("valid");
    let test_pos = split.test.iter().filter(|&&i| labels[i] == 1).count();
    assert_eq!(split.test.len(), 25);
    assert_eq!(test_pos, 5);
}

#[test]
fn test_count_is_plain_ceil_of_product() {
    // Exact products stay put.
    let split = StratifiedSplit::new(0.1).split(&balanced(30)).expect("valid");
    assert_eq!(split.test.len(), 3);
    // 0.07 * 100 = 7.000000000000001 and 0.14 * 50 likewise round up.
    let split = StratifiedSplit::new(0.07).split(&balanced(100)).expect("valid");
    assert_eq!((split.test.len(), split.train.len()), (8, 92));
    let split = StratifiedSplit::new(0.14).split(&balanced(50)).expect("valid");
    assert_eq!(split.test.len(), 8);
}

#[test]
fn quotas_use_largest_remainder() {
    // n_test = 5 over classes of 5 and 5: exact 2.5 each, tie to lower label.
    assert_eq!(allocate_quotas(5, 10, &[(0, 5), (1, 5)]), vec![3, 2]);
    // n_test = 3 over 7 and 3: exact 2.1 and 0.9, remainder to label 1.
    assert_eq!(allocate_quotas(3, 10, &[(0, 7), (1, 3)]), vec![2, 1]);
}

#[test]
fn single_class_is_insufficient() {
    let err = StratifiedSplit::new(0.25).split(&[1; 10]).unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientData { .. }));
}

#[test]
fn singleton_class_is_insufficient() {
    let mut labels = vec![0; 10];
    labels[4] = 1;
    let err = StratifiedSplit::new(0.25).split(&labels).unwrap_err();
    assert!(err.to_string().contains("class 1 has 1 member"));
}

#[test]
fn too_small_test_side_is_insufficient() {
    // ceil(0.05 * 10) = 1 test row for 2 classes.
    let err = StratifiedSplit::new(0.05).split(&balanced(10)).unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientData { .. }));
}

#[test]
fn invalid_test_size_is_configuration_error() {
    for bad in [0.0, 1.0, -0.5, f64::NAN] {
        let err = StratifiedSplit::new(bad).split(&balanced(10)).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }), "{bad}");
    }
}

#[test]
fn empty_labels_rejected() {
    let err = StratifiedSplit::new(0.25).split(&[]).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput { .. }));
}

fn tiny_dataset() -> Dataset {
    let x = Matrix::from_vec(8, 1, (0..8).map(f64::from).collect()).expect("8x1");
    Dataset::new(x, balanced(8)).expect("binary labels")
}

#[test]
fn fingerprint_is_stable_and_hex() {
    let ds = tiny_dataset();
    let splitter = StratifiedSplit::new(0.5).with_random_state(9);
    let split = splitter.split(ds.labels()).expect("valid");
    let a = split_fingerprint(&ds, &splitter, &split);
    let b = split_fingerprint(&ds, &splitter, &split);
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn fingerprint_detects_changed_feature() {
    let ds = tiny_dataset();
    let splitter = StratifiedSplit::new(0.5).with_random_state(9);
    let split = splitter.split(ds.labels()).expect("valid");
    let before = split_fingerprint(&ds, &splitter, &split);

    let mut x = ds.features().clone();
    x.set(3, 0, 3.5);
    let edited = Dataset::new(x, ds.labels().to_vec()).expect("binary labels");
    assert_ne!(before, split_fingerprint(&edited, &splitter, &split));
}

#[test]
fn fingerprint_detects_changed_seed() {
    let ds = tiny_dataset();
    let a = StratifiedSplit::new(0.5).with_random_state(1);
    let b = StratifiedSplit::new(0.5).with_random_state(2);
    let sa = a.split(ds.labels()).expect("valid");
    let sb = b.split(ds.labels()).expect("valid");
    assert_ne!(split_fingerprint(&ds, &a, &sa), split_fingerprint(&ds, &b, &sb));
}

mod split_proptest {
    use super::*;
    use proptest::prelude::*;

    fn labels_strategy() -> impl Strategy<Value = Vec<usize>> {
        (4..=60usize, 4..=60usize).prop_flat_map(|(n0, n1)| {
            let labels: Vec<usize> = std::iter::repeat(0)
                .take(n0)
                .chain(std::iter::repeat(1).take(n1))
                .collect();
            Just(labels).prop_shuffle()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn per_class_share_tracks_test_size(
            labels in labels_strategy(),
            test_size in 0.2..0.5f64,
            seed in 0..10_000u64,
        ) {
            let split = StratifiedSplit::new(test_size)
                .with_random_state(seed)
                .split(&labels)
                .expect("two classes with >= 4 rows each");
            for class in 0..2 {
                let n_c = labels.iter().filter(|&&l| l == class).count();
                let in_test = split.test.iter().filter(|&&i| labels[i] == class).count();
                let share = in_test as f64 / n_c as f64;
                prop_assert!((share - test_size).abs() <= 2.0 / n_c as f64 + 1e-9);
            }
        }

        #[test]
        fn repeated_split_agrees(labels in labels_strategy(), seed in 0..10_000u64) {
            let splitter = StratifiedSplit::new(0.25).with_random_state(seed);
            prop_assert_eq!(
                splitter.split(&labels).expect("valid"),
                splitter.split(&labels).expect("valid")
            );
        }
    }
}
