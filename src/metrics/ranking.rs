//! Score-ranking metrics: ROC AUC and ROC curves.
//!
//! Scores are probabilities of class 1; higher means more confident
//! positive. Ties are handled by average ranks, so the AUC equals the
//! trapezoidal area under the exact ROC curve.

use super::classification::ConfusionCounts;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// One ROC operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// Scores at or above this are predicted positive
    pub threshold: f64,
    /// True positive rate
    pub tpr: f64,
    /// False positive rate
    pub fpr: f64,
}

/// ROC operating points over an ascending threshold grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RocTable {
    points: Vec<RocPoint>,
}

impl RocTable {
    /// Sweeps `linspace(0, 1, n_thresholds)`.
    ///
    /// At each threshold `t`, rows with `score >= t` are predicted positive
    /// and the point records `(t, TP / max(1, P), FP / max(1, N))`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Configuration`] for `n_thresholds == 0`
    /// - [`PipelineError::DimensionMismatch`] if lengths differ
    ///
    /// # Examples
    ///
    /// ```
    /// use binclf::metrics::ranking::RocTable;
    ///
    /// let roc = RocTable::sweep(&[0.1, 0.4, 0.35, 0.8], &[0, 0, 1, 1], 3).expect("valid");
    /// let t: Vec<f64> = roc.points().iter().map(|p| p.threshold).collect();
    /// assert_eq!(t, vec![0.0, 0.5, 1.0]);
    /// assert_eq!(roc.points()[0].tpr, 1.0);
    /// assert_eq!(roc.points()[2].fpr, 0.0);
    /// ```
    pub fn sweep(scores: &[f64], y_true: &[usize], n_thresholds: usize) -> Result<Self> {
        if n_thresholds == 0 {
            return Err(PipelineError::invalid_param("thresholds", 0, ">= 1"));
        }
        check_lengths(scores, y_true)?;
        let points = linspace(0.0, 1.0, n_thresholds)
            .into_iter()
            .map(|threshold| {
                let counts = ConfusionCounts::at_threshold(scores, y_true, threshold);
                RocPoint {
                    threshold,
                    tpr: counts.tpr(),
                    fpr: counts.fpr(),
                }
            })
            .collect();
        Ok(Self { points })
    }

    /// Wraps existing points.
    #[must_use]
    pub fn from_points(points: Vec<RocPoint>) -> Self {
        Self { points }
    }

    /// Points in threshold order.
    #[must_use]
    pub fn points(&self) -> &[RocPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
///
/// `n == 1` gives `[start]`; the last value is exactly `stop`.
#[must_use]
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Area under the ROC curve via the Mann-Whitney U statistic.
///
/// `AUC = (R₊ - P(P+1)/2) / (P·N)` where `R₊` is the sum of the
/// (average, 1-based) ranks of the positive scores.
///
/// # Errors
///
/// - [`PipelineError::EmptyInput`] for no rows
/// - [`PipelineError::DimensionMismatch`] if lengths differ
/// - [`PipelineError::InsufficientData`] if either class is absent
///
/// # Examples
///
/// ```
/// use binclf::metrics::ranking::roc_auc;
///
/// let auc = roc_auc(&[0.1, 0.4, 0.35, 0.8], &[0, 0, 1, 1]).expect("both classes");
/// assert!((auc - 0.75).abs() < 1e-12);
/// ```
pub fn roc_auc(scores: &[f64], y_true: &[usize]) -> Result<f64> {
    check_lengths(scores, y_true)?;
    if scores.is_empty() {
        return Err(PipelineError::empty_input("scores for ROC AUC"));
    }
    let n_pos = y_true.iter().filter(|&&l| l == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(PipelineError::insufficient(format!(
            "ROC AUC is undefined with {n_pos} positive and {n_neg} negative rows"
        )));
    }

    let ranks = average_ranks(scores);
    let pos_rank_sum: f64 = ranks
        .iter()
        .zip(y_true)
        .filter(|(_, &l)| l == 1)
        .map(|(r, _)| r)
        .sum();
    let (p, n) = (n_pos as f64, n_neg as f64);
    Ok((pos_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// Exact ROC curve: one point per distinct score, thresholds descending,
/// starting from `(threshold = +inf, tpr = 0, fpr = 0)`.
///
/// # Errors
///
/// Same as [`roc_auc`].
pub fn roc_curve(scores: &[f64], y_true: &[usize]) -> Result<Vec<RocPoint>> {
    check_lengths(scores, y_true)?;
    if scores.is_empty() {
        return Err(PipelineError::empty_input("scores for ROC curve"));
    }
    let n_pos = y_true.iter().filter(|&&l| l == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(PipelineError::insufficient(format!(
            "ROC curve is undefined with {n_pos} positive and {n_neg} negative rows"
        )));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = vec![RocPoint {
        threshold: f64::INFINITY,
        tpr: 0.0,
        fpr: 0.0,
    }];
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold,
            tpr: tp as f64 / n_pos as f64,
            fpr: fp as f64 / n_neg as f64,
        });
    }
    Ok(points)
}

/// 1-based ranks in ascending score order; tied scores share the mean of
/// the ranks they span.
fn average_ranks(scores: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let mean_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = mean_rank;
        }
        start = end;
    }
    ranks
}

fn check_lengths(scores: &[f64], y_true: &[usize]) -> Result<()> {
    if scores.len() != y_true.len() {
        return Err(PipelineError::dimension_mismatch(
            "labels",
            scores.len(),
            y_true.len(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests_ranking_contract.rs"]
mod tests_ranking_contract;
