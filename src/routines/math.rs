//! Mathematical utility functions for dense vectors and matrices
//!
//! This module provides the row/column reductions and normalizations used by the basis
//! construction and the topic recovery, together with stable implementations of common
//! numerical operations.

use crate::error::{AnchorError, Result};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Dimension, Ix1, Ix2};
use ndarray_stats::QuantileExt;

/// Compute the log-sum-exp of a vector in a numerically stable way.
///
/// The log-sum-exp is defined as: `log(sum(exp(x_i)))` for all elements `x_i`.
///
/// This implementation uses the "shift by max" trick to avoid overflow:
/// `logsumexp(x) = max(x) + log(sum(exp(x_i - max(x))))`
///
/// # Returns
/// The log-sum-exp of the values. Returns `f64::NEG_INFINITY` if the vector is empty or all
/// values are `-inf`, and `NaN` if any value is `NaN`.
///
/// # Example
/// ```
/// use anchorcore::routines::math::logsumexp;
/// let log_probs = ndarray::array![-1.0, -2.0, -3.0];
/// let result = logsumexp(&log_probs);
/// assert!((result - (-0.5924)).abs() < 1e-4);
/// ```
#[inline]
pub fn logsumexp<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    if values.has_nan() {
        return f64::NAN;
    }

    let max_val = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if max_val.is_infinite() {
        // Either every value is -inf, or at least one is +inf
        max_val
    } else {
        max_val + values.iter().map(|&x| (x - max_val).exp()).sum::<f64>().ln()
    }
}

/// Sum of each row of a matrix
pub fn row_sums<S>(matrix: &ArrayBase<S, Ix2>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    matrix.sum_axis(Axis(1))
}

/// Sum of each column of a matrix
pub fn col_sums<S>(matrix: &ArrayBase<S, Ix2>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    matrix.sum_axis(Axis(0))
}

/// Divide each row of `matrix` by its own sum, so every row sums to one.
///
/// Fails with [AnchorError::DegenerateRow] on the first row whose sum is zero or not finite.
/// The matrix is left untouched in that case.
pub fn row_normalize(matrix: &mut Array2<f64>) -> Result<()> {
    let sums = row_sums(&*matrix);
    if let Some(row) = sums.iter().position(|&s| s == 0.0 || !s.is_finite()) {
        return Err(AnchorError::DegenerateRow(row));
    }
    for (mut row, sum) in matrix.axis_iter_mut(Axis(0)).zip(sums.iter()) {
        row /= *sum;
    }
    Ok(())
}

/// Divide each column of `matrix` by its own sum, so every column sums to one.
///
/// Fails with [AnchorError::DegenerateColumn] on the first column whose sum is zero or not finite.
pub fn col_normalize(matrix: &mut Array2<f64>) -> Result<()> {
    let sums = col_sums(&*matrix);
    if let Some(col) = sums.iter().position(|&s| s == 0.0 || !s.is_finite()) {
        return Err(AnchorError::DegenerateColumn(col));
    }
    for (mut col, sum) in matrix.axis_iter_mut(Axis(1)).zip(sums.iter()) {
        col /= *sum;
    }
    Ok(())
}

/// Element checks shared by vectors and matrices.
///
/// The shape is carried by the array type, so the same calls work on an `Array1` or an `Array2`
/// without inspecting the contents.
pub trait ArrayCheck {
    /// True if any entry is `NaN`
    fn has_nan(&self) -> bool;
    /// Smallest entry, or `None` if the array is empty or contains `NaN`
    fn min_value(&self) -> Option<f64>;
    /// Largest entry, or `None` if the array is empty or contains `NaN`
    fn max_value(&self) -> Option<f64>;
}

impl<S, D> ArrayCheck for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn has_nan(&self) -> bool {
        self.iter().any(|x| x.is_nan())
    }

    fn min_value(&self) -> Option<f64> {
        self.min().ok().copied()
    }

    fn max_value(&self) -> Option<f64> {
        self.max().ok().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_logsumexp_basic() {
        let values = array![-1.0, -2.0, -3.0];
        let result = logsumexp(&values);
        // log(exp(-1) + exp(-2) + exp(-3)) ≈ -0.5924
        let expected = ((-1.0_f64).exp() + (-2.0_f64).exp() + (-3.0_f64).exp()).ln();
        assert!((result - expected).abs() < 1e-10);
        assert!((result - (-0.5924)).abs() < 1e-4);
    }

    #[test]
    fn test_logsumexp_empty() {
        let values: Array1<f64> = Array1::zeros(0);
        let result = logsumexp(&values);
        assert!(result.is_infinite() && result.is_sign_negative());
    }

    #[test]
    fn test_logsumexp_with_neg_inf() {
        // logsumexp([-inf, 0]) = log(0 + 1) = 0
        let values = array![f64::NEG_INFINITY, 0.0];
        assert!(logsumexp(&values).abs() < 1e-10);

        let all = array![f64::NEG_INFINITY, f64::NEG_INFINITY];
        assert_eq!(logsumexp(&all), f64::NEG_INFINITY);
    }

    #[test]
    fn test_logsumexp_large_values() {
        let values = array![1000.0, 1001.0, 1002.0];
        let expected = 1002.0 + ((-2.0_f64).exp() + (-1.0_f64).exp() + 1.0).ln();
        assert!((logsumexp(&values) - expected).abs() < 1e-10);

        let values = array![-1000.0, -1001.0, -1002.0];
        let expected = -1000.0 + (1.0 + (-1.0_f64).exp() + (-2.0_f64).exp()).ln();
        assert!((logsumexp(&values) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_logsumexp_nan() {
        let values = array![0.0, f64::NAN];
        assert!(logsumexp(&values).is_nan());
    }

    #[test]
    fn test_row_and_col_sums() {
        let m = array![[1.0, 2.0], [3.0, 4.0], [0.0, 1.0]];
        assert_eq!(row_sums(&m), array![3.0, 7.0, 1.0]);
        assert_eq!(col_sums(&m), array![4.0, 7.0]);
    }

    #[test]
    fn test_row_normalize() {
        let mut m = array![[1.0, 3.0], [2.0, 2.0]];
        row_normalize(&mut m).unwrap();
        assert_eq!(m, array![[0.25, 0.75], [0.5, 0.5]]);
    }

    #[test]
    fn test_row_normalize_degenerate() {
        let mut m = array![[1.0, 3.0], [0.0, 0.0]];
        assert_eq!(row_normalize(&mut m), Err(AnchorError::DegenerateRow(1)));
        // Untouched on failure
        assert_eq!(m, array![[1.0, 3.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_col_normalize() {
        let mut m = array![[1.0, 0.0], [3.0, 2.0]];
        col_normalize(&mut m).unwrap();
        assert_eq!(m, array![[0.25, 0.0], [0.75, 1.0]]);

        let mut zero = array![[1.0, 0.0], [3.0, 0.0]];
        assert_eq!(col_normalize(&mut zero), Err(AnchorError::DegenerateColumn(1)));
    }

    #[test]
    fn test_array_check_vector_and_matrix() {
        let v = array![3.0, -1.0, 2.0];
        assert!(!v.has_nan());
        assert_eq!(v.min_value(), Some(-1.0));
        assert_eq!(v.max_value(), Some(3.0));

        let m = array![[0.5, 4.0], [-2.0, 1.0]];
        assert!(!m.has_nan());
        assert_eq!(m.min_value(), Some(-2.0));
        assert_eq!(m.max_value(), Some(4.0));

        let with_nan = array![[0.5, f64::NAN]];
        assert!(with_nan.has_nan());
        assert_eq!(with_nan.min_value(), None);
    }
}
