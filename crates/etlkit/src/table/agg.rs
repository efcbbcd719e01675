/* -----------------------------------------------------------------------------
Reduction functions over Option-wrapped column data, as used by group_by
----------------------------------------------------------------------------- */

// dependencies
use std::iter::Sum;

/// The `Agg` struct provides reductions over `Option<T>` column values.
///
/// Missing (None) values are removed before reducing, equivalent to using
/// `na.rm = TRUE` in R. Each function documents what it reports when no
/// non-missing values remain.
pub struct Agg {}
impl Agg {
    /// Remove missing values in preparation for aggregation.
    pub fn na_rm<T: Copy>(x: &[Option<T>]) -> Vec<T> {
        x.iter().filter_map(|&x| x).collect()
    }
    /// Return the sum of the non-missing values; an empty or all-missing
    /// input sums to zero.
    pub fn sum<T: Copy + Sum>(x: &[Option<T>]) -> T {
        Agg::na_rm(x).into_iter().sum::<T>()
    }
    /// Like `sum`, for i64 input, returning None when the sum overflows.
    pub fn checked_sum_i64(x: &[Option<i64>]) -> Option<i64> {
        Agg::na_rm(x).into_iter().try_fold(0i64, i64::checked_add)
    }
    /// Return the mean of the non-missing values, or None if there are none.
    pub fn mean<T: Copy + Into<f64>>(x: &[Option<T>]) -> Option<f64> {
        let na_rm = Agg::na_rm(x);
        if na_rm.is_empty() { return None; }
        let n = na_rm.len() as f64;
        Some(na_rm.into_iter().map(Into::into).sum::<f64>() / n)
    }
    /// Like `mean`, for i64 input, which has no lossless `Into<f64>`.
    pub fn mean_i64(x: &[Option<i64>]) -> Option<f64> {
        let na_rm = Agg::na_rm(x);
        if na_rm.is_empty() { return None; }
        let n = na_rm.len() as f64;
        Some(na_rm.into_iter().map(|v| v as f64).sum::<f64>() / n)
    }
}
