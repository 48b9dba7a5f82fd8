//! Binary classification metrics.
//!
//! Class 1 is the positive class. Ratios with a zero denominator are 0.0
//! rather than NaN.

/// Counts of the four outcomes of a binary prediction.
///
/// # Examples
///
/// ```
/// use binclf::metrics::classification::ConfusionCounts;
///
/// let y_true = [1, 1, 0, 0, 1];
/// let y_pred = [1, 0, 0, 1, 1];
/// let c = ConfusionCounts::from_labels(&y_pred, &y_true);
/// assert_eq!((c.tp, c.fp, c.tn, c.fn_), (2, 1, 1, 1));
/// assert!((c.precision() - 2.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    /// Predicted 1, actually 1
    pub tp: usize,
    /// Predicted 1, actually 0
    pub fp: usize,
    /// Predicted 0, actually 0
    pub tn: usize,
    /// Predicted 0, actually 1
    pub fn_: usize,
}

impl ConfusionCounts {
    /// Tallies predicted against true labels.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    #[must_use]
    pub fn from_labels(y_pred: &[usize], y_true: &[usize]) -> Self {
        assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
        let mut counts = Self::default();
        for (&p, &t) in y_pred.iter().zip(y_true) {
            counts.record(p == 1, t == 1);
        }
        counts
    }

    /// Tallies `score >= threshold` as a positive prediction.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    #[must_use]
    pub fn at_threshold(scores: &[f64], y_true: &[usize], threshold: f64) -> Self {
        assert_eq!(scores.len(), y_true.len(), "Vectors must have same length");
        let mut counts = Self::default();
        for (&s, &t) in scores.iter().zip(y_true) {
            counts.record(s >= threshold, t == 1);
        }
        counts
    }

    fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.tp += 1,
            (true, false) => self.fp += 1,
            (false, false) => self.tn += 1,
            (false, true) => self.fn_ += 1,
        }
    }

    /// Actual positives.
    #[must_use]
    pub fn positives(&self) -> usize {
        self.tp + self.fn_
    }

    /// Actual negatives.
    #[must_use]
    pub fn negatives(&self) -> usize {
        self.fp + self.tn
    }

    /// All rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.positives() + self.negatives()
    }

    /// (TP + TN) / total.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    /// TP / (TP + FP).
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// TP / (TP + FN).
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.positives())
    }

    /// 2·TP / (2·TP + FP + FN), the harmonic mean of precision and recall.
    #[must_use]
    pub fn f1(&self) -> f64 {
        ratio(2 * self.tp, 2 * self.tp + self.fp + self.fn_)
    }

    /// TP / max(1, P).
    #[must_use]
    pub fn tpr(&self) -> f64 {
        self.tp as f64 / self.positives().max(1) as f64
    }

    /// FP / max(1, N).
    #[must_use]
    pub fn fpr(&self) -> f64 {
        self.fp as f64 / self.negatives().max(1) as f64
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Fraction of matching labels.
///
/// # Panics
///
/// Panics if the slices have different lengths.
///
/// # Examples
///
/// ```
/// use binclf::metrics::classification::accuracy;
///
/// assert!((accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]) - 0.75).abs() < 1e-12);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ConfusionCounts::from_labels(y_pred, y_true).accuracy()
}

/// Precision of the positive class; 0.0 when nothing is predicted positive.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn precision(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ConfusionCounts::from_labels(y_pred, y_true).precision()
}

/// Recall of the positive class; 0.0 when there are no positives.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn recall(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ConfusionCounts::from_labels(y_pred, y_true).recall()
}

/// F1 of the positive class; 0.0 when precision and recall are both
/// undefined or zero.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn f1_score(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ConfusionCounts::from_labels(y_pred, y_true).f1()
}

#[cfg(test)]
#[path = "tests_classification_contract.rs"]
mod tests_classification_contract;
