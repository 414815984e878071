//! Eigenvalue aggregation across partitions.
//!
//! The two solvers deliberately use different conventions and they must not
//! be unified silently:
//!
//! - the recursive solver normalizes eigenvalues by n in its exact base case,
//!   so partition vectors are already size-comparable and combine with an
//!   unweighted mean;
//! - the flat solver normalizes each partition's eigenvalues by the row count
//!   of the matrix it actually solved and combines them with a size-weighted
//!   mean, weights being the rows each partition contributes to the output.

/// Unweighted element-wise mean of equal-length eigenvalue vectors.
pub(crate) fn mean_eigen(vectors: &[Vec<f64>]) -> Vec<f64> {
    debug_assert!(!vectors.is_empty());
    let r = vectors[0].len();
    let mut out = vec![0.0; r];
    for v in vectors {
        debug_assert_eq!(v.len(), r);
        for (acc, &value) in out.iter_mut().zip(v.iter()) {
            *acc += value;
        }
    }
    for acc in &mut out {
        *acc /= vectors.len() as f64;
    }
    out
}

/// Size-weighted element-wise mean: `sum(w_j * v_j) / sum(w_j)`.
pub(crate) fn weighted_mean_eigen(vectors: &[Vec<f64>], weights: &[usize]) -> Vec<f64> {
    debug_assert_eq!(vectors.len(), weights.len());
    debug_assert!(!vectors.is_empty());
    let r = vectors[0].len();
    let total: usize = weights.iter().sum();
    let mut out = vec![0.0; r];
    for (v, &w) in vectors.iter().zip(weights.iter()) {
        debug_assert_eq!(v.len(), r);
        for (acc, &value) in out.iter_mut().zip(v.iter()) {
            *acc += w as f64 * value;
        }
    }
    for acc in &mut out {
        *acc /= total as f64;
    }
    out
}
