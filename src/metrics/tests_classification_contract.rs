// =========================================================================
// Binary metrics contract: every score lies in [0, 1], zero denominators
// give 0.0, and F1 never exceeds the larger of precision and recall.
//
// References:
//   - Sokolova & Lapalme (2009) "A systematic analysis of performance measures"
// =========================================================================

use super::*;
use proptest::prelude::*;

fn label_pairs() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec((0usize..=1, 0usize..=1), 1..100)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

#[test]
fn perfect_prediction_scores_one() {
    let y = [0, 1, 1, 0, 1];
    assert_eq!(accuracy(&y, &y), 1.0);
    assert_eq!(precision(&y, &y), 1.0);
    assert_eq!(recall(&y, &y), 1.0);
    assert_eq!(f1_score(&y, &y), 1.0);
}

#[test]
fn inverted_prediction_scores_zero() {
    let y_true = [0, 1, 1, 0];
    let y_pred = [1, 0, 0, 1];
    assert_eq!(accuracy(&y_pred, &y_true), 0.0);
    assert_eq!(precision(&y_pred, &y_true), 0.0);
    assert_eq!(recall(&y_pred, &y_true), 0.0);
    assert_eq!(f1_score(&y_pred, &y_true), 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn metrics_bounded((y_pred, y_true) in label_pairs()) {
        let c = ConfusionCounts::from_labels(&y_pred, &y_true);
        prop_assert_eq!(c.total(), y_true.len());
        for m in [c.accuracy(), c.precision(), c.recall(), c.f1(), c.tpr(), c.fpr()] {
            prop_assert!((0.0..=1.0).contains(&m), "metric {} out of range", m);
        }
    }

    #[test]
    fn f1_between_min_and_max((y_pred, y_true) in label_pairs()) {
        let c = ConfusionCounts::from_labels(&y_pred, &y_true);
        let (p, r, f) = (c.precision(), c.recall(), c.f1());
        prop_assert!(f <= p.max(r) + 1e-12);
        prop_assert!(f + 1e-12 >= p.min(r));
    }

    #[test]
    fn threshold_counts_match_label_counts(
        rows in prop::collection::vec((0.0..=1.0f64, 0usize..=1), 1..100),
        threshold in 0.0..=1.0f64,
    ) {
        let scores: Vec<f64> = rows.iter().map(|&(s, _)| s).collect();
        let y_true: Vec<usize> = rows.iter().map(|&(_, l)| l).collect();
        let y_pred: Vec<usize> = scores.iter().map(|&s| usize::from(s >= threshold)).collect();
        prop_assert_eq!(
            ConfusionCounts::at_threshold(&scores, &y_true, threshold),
            ConfusionCounts::from_labels(&y_pred, &y_true)
        );
    }
}
