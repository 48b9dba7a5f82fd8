//! Labeled tabular dataset.
//!
//! A [`Dataset`] is an `n_samples × n_features` feature matrix plus one
//! binary label per row. Feature columns are named positionally
//! (`f0..f{F-1}`) and the label column is always last.

use crate::error::{PipelineError, Result};
use crate::primitives::Matrix;

/// Name of the label column in tabular artifacts.
pub const LABEL_COLUMN: &str = "label";

/// Positional feature column name.
#[must_use]
pub fn feature_name(index: usize) -> String {
    format!("f{index}")
}

/// Binary-labeled dataset with a stable row and column order.
///
/// # Examples
///
/// ```
/// use binclf::data::Dataset;
/// use binclf::primitives::Matrix;
///
/// let x = Matrix::from_vec(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).expect("3x2");
/// let ds = Dataset::new(x, vec![0, 1, 1]).expect("labels are binary");
/// assert_eq!(ds.shape(), (3, 2));
/// assert_eq!(ds.class_counts(), [1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Matrix<f64>,
    labels: Vec<usize>,
}

impl Dataset {
    /// Creates a dataset, checking row counts and label values.
    ///
    /// # Errors
    ///
    /// Returns an error if the label count differs from the row count or a
    /// label is not 0 or 1.
    pub fn new(features: Matrix<f64>, labels: Vec<usize>) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(PipelineError::dimension_mismatch(
                "labels",
                features.n_rows(),
                labels.len(),
            ));
        }
        if let Some((row, &label)) = labels.iter().enumerate().find(|(_, &l)| l > 1) {
            return Err(PipelineError::InvalidLabel { row, label });
        }
        Ok(Self { features, labels })
    }

    /// Returns (`n_samples`, `n_features`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.features.shape()
    }

    /// Number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.n_cols()
    }

    /// Feature matrix.
    #[must_use]
    pub fn features(&self) -> &Matrix<f64> {
        &self.features
    }

    /// Labels, one per row.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Header of the tabular form: feature names then the label column.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        (0..self.n_features())
            .map(feature_name)
            .chain(std::iter::once(LABEL_COLUMN.to_string()))
            .collect()
    }

    /// Row counts for label 0 and label 1.
    #[must_use]
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        [self.labels.len() - positives, positives]
    }

    /// Subset with the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Splits into owned features and labels.
    #[must_use]
    pub fn into_parts(self) -> (Matrix<f64>, Vec<usize>) {
        (self.features, self.labels)
    }
}
