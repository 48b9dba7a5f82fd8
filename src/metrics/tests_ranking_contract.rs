// =========================================================================
// Ranking contract: AUC bounds, tie handling, ROC sweep shape.
//
// References:
//   - Hanley & McNeil (1982) "The meaning and use of the area under a ROC curve"
//   - Fawcett (2006) "An introduction to ROC analysis"
// =========================================================================

use super::*;
use proptest::prelude::*;

fn trapezoid_area(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
        .sum()
}

fn both_classes(labels: &[usize]) -> bool {
    labels.contains(&0) && labels.contains(&1)
}

#[test]
fn perfect_ranking_scores_one() {
    let auc = roc_auc(&[0.1, 0.2, 0.8, 0.9], &[0, 0, 1, 1]).expect("both classes");
    assert!((auc - 1.0).abs() < 1e-12);
}

#[test]
fn reversed_ranking_scores_zero() {
    let auc = roc_auc(&[0.9, 0.8, 0.2, 0.1], &[0, 0, 1, 1]).expect("both classes");
    assert!(auc.abs() < 1e-12);
}

#[test]
fn all_ties_score_one_half() {
    let auc = roc_auc(&[0.5; 6], &[0, 1, 0, 1, 1, 0]).expect("both classes");
    assert!((auc - 0.5).abs() < 1e-12);
}

#[test]
fn partial_ties_use_average_rank() {
    // One positive ties one negative: half credit for that pair.
    let auc = roc_auc(&[0.2, 0.5, 0.5, 0.9], &[0, 0, 1, 1]).expect("both classes");
    assert!((auc - 0.875).abs() < 1e-12);
}

#[test]
fn single_class_is_insufficient() {
    let err = roc_auc(&[0.1, 0.9], &[1, 1]).unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientData { .. }));
    let err = roc_curve(&[0.1, 0.9], &[0, 0]).unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientData { .. }));
}

#[test]
fn empty_and_mismatched_inputs() {
    assert!(matches!(
        roc_auc(&[], &[]),
        Err(PipelineError::EmptyInput { .. })
    ));
    assert!(matches!(
        roc_auc(&[0.1], &[0, 1]),
        Err(PipelineError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        RocTable::sweep(&[0.1], &[0, 1], 5),
        Err(PipelineError::DimensionMismatch { .. })
    ));
}

#[test]
fn linspace_endpoints() {
    assert!(linspace(0.0, 1.0, 0).is_empty());
    assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
    assert_eq!(linspace(0.0, 1.0, 2), vec![0.0, 1.0]);
    let grid = linspace(0.0, 1.0, 50);
    assert_eq!(grid.len(), 50);
    assert_eq!(grid[0], 0.0);
    assert_eq!(grid[49], 1.0);
    assert!(grid.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn sweep_rejects_zero_thresholds() {
    let err = RocTable::sweep(&[0.1, 0.9], &[0, 1], 0).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration { .. }));
}

#[test]
fn sweep_single_threshold_predicts_everything_positive() {
    let roc = RocTable::sweep(&[0.1, 0.9, 0.4], &[0, 1, 0], 1).expect("valid");
    assert_eq!(roc.len(), 1);
    assert_eq!(
        roc.points()[0],
        RocPoint {
            threshold: 0.0,
            tpr: 1.0,
            fpr: 1.0
        }
    );
}

#[test]
fn sweep_without_positives_keeps_tpr_zero() {
    let roc = RocTable::sweep(&[0.1, 0.7], &[0, 0], 3).expect("valid");
    assert!(roc.points().iter().all(|p| p.tpr == 0.0));
    assert_eq!(roc.points()[0].fpr, 1.0);
}

#[test]
fn exact_curve_runs_corner_to_corner() {
    let curve = roc_curve(&[0.3, 0.6, 0.6, 0.9, 0.1], &[0, 1, 0, 1, 0]).expect("valid");
    let first = curve.first().expect("non-empty");
    let last = curve.last().expect("non-empty");
    assert_eq!((first.fpr, first.tpr), (0.0, 0.0));
    assert_eq!((last.fpr, last.tpr), (1.0, 1.0));
    // 4 distinct scores plus the origin.
    assert_eq!(curve.len(), 5);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn auc_bounded_and_equals_trapezoid(
        rows in prop::collection::vec((0u8..=20, 0usize..=1), 2..60),
    ) {
        let scores: Vec<f64> = rows.iter().map(|&(s, _)| f64::from(s) / 20.0).collect();
        let labels: Vec<usize> = rows.iter().map(|&(_, l)| l).collect();
        prop_assume!(both_classes(&labels));

        let auc = roc_auc(&scores, &labels).expect("both classes");
        prop_assert!((0.0..=1.0).contains(&auc));

        let curve = roc_curve(&scores, &labels).expect("both classes");
        prop_assert!((auc - trapezoid_area(&curve)).abs() < 1e-9);
    }

    #[test]
    fn flipping_labels_complements_auc(
        rows in prop::collection::vec((0.0..1.0f64, 0usize..=1), 2..60),
    ) {
        let scores: Vec<f64> = rows.iter().map(|&(s, _)| s).collect();
        let labels: Vec<usize> = rows.iter().map(|&(_, l)| l).collect();
        prop_assume!(both_classes(&labels));
        let flipped: Vec<usize> = labels.iter().map(|&l| 1 - l).collect();

        let a = roc_auc(&scores, &labels).expect("both classes");
        let b = roc_auc(&scores, &flipped).expect("both classes");
        prop_assert!((a + b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sweep_is_monotone_with_fixed_endpoints(
        rows in prop::collection::vec((0.0..=1.0f64, 0usize..=1), 1..80),
        n in 2usize..120,
    ) {
        let scores: Vec<f64> = rows.iter().map(|&(s, _)| s).collect();
        let labels: Vec<usize> = rows.iter().map(|&(_, l)| l).collect();
        let roc = RocTable::sweep(&scores, &labels, n).expect("valid");
        let pts = roc.points();

        prop_assert_eq!(pts.len(), n);
        prop_assert_eq!(pts[0].threshold, 0.0);
        prop_assert_eq!(pts[n - 1].threshold, 1.0);
        for w in pts.windows(2) {
            prop_assert!(w[0].threshold < w[1].threshold);
            prop_assert!(w[1].tpr <= w[0].tpr);
            prop_assert!(w[1].fpr <= w[0].fpr);
        }
        for p in pts {
            prop_assert!((0.0..=1.0).contains(&p.tpr));
            prop_assert!((0.0..=1.0).contains(&p.fpr));
        }
        // Threshold 0 predicts every row positive.
        if labels.contains(&1) {
            prop_assert_eq!(pts[0].tpr, 1.0);
        }
        if labels.contains(&0) {
            prop_assert_eq!(pts[0].fpr, 1.0);
        }
    }
}
