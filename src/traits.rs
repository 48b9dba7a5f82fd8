//! Capabilities shared by fitted models.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// A fitted binary classifier that scores rows with P(label = 1).
///
/// Consumers such as [`crate::metrics::Evaluator`] depend only on this
/// trait, never on a concrete model type.
///
/// # Examples
///
/// ```
/// use binclf::error::Result;
/// use binclf::primitives::{Matrix, Vector};
/// use binclf::traits::ProbabilisticClassifier;
///
/// /// Scores every row by its first feature.
/// struct FirstColumn;
///
/// impl ProbabilisticClassifier for FirstColumn {
///     fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
///         Ok(x.column(0))
///     }
/// }
///
/// let x = Matrix::from_vec(3, 1, vec![0.2, 0.5, 0.9]).expect("3x1");
/// assert_eq!(FirstColumn.predict_proba(&x).expect("scores").as_slice(), &[0.2, 0.5, 0.9]);
/// ```
pub trait ProbabilisticClassifier {
    /// Probability of class 1 for each row of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot score `x` (unfitted, wrong
    /// width).
    fn predict_proba(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;
}
