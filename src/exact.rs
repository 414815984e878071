//! Classical (exact) MDS on a small point matrix.
//!
//! # Algorithm
//!
//! 1. Pairwise squared Euclidean distances D² between the rows of `x`
//! 2. Double centering: `B = -1/2 · J · D² · J` with `J = I - 11ᵀ/n`
//! 3. Symmetric eigendecomposition of B (nalgebra, eigenpairs sorted ↓)
//! 4. Coordinates = `V_r · sqrt(Λ_r)`, negative eigenvalues clamped to zero
//!
//! The eigendecomposition is O(n³), so this solver is only invoked on
//! partitions the planner has already capped at the configured size limit.
//! Distance-matrix rows are computed in parallel with rayon.

use log::{debug, trace};
use rayon::prelude::*;
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use nalgebra as na;

use crate::matrix::sym_eigen_desc;
use crate::{MdsError, MdsResult, Result};

/// Classical MDS of `x` (n rows of observations) into rank `r`.
///
/// Returns an n×r configuration and the top-r eigenvalues of the
/// double-centered squared-distance matrix, sorted descending. Eigenvalues
/// below zero (non-Euclidean noise) are clamped to zero, matching the
/// coordinates, which only use the non-negative spectrum.
///
/// # Errors
///
/// - `InvalidConfiguration` if `r == 0`, `n < 2` or `r > n - 1`
/// - `Numerical` if the input contains non-finite values or the
///   eigendecomposition does not converge
pub fn exact_mds(x: &DenseMatrix<f64>, r: usize) -> Result<MdsResult> {
    let (n, k) = x.shape();
    if r == 0 {
        return Err(MdsError::InvalidConfiguration(
            "target rank r must be >= 1".into(),
        ));
    }
    if n < 2 {
        return Err(MdsError::InvalidConfiguration(format!(
            "classical MDS needs at least 2 rows, got {}",
            n
        )));
    }
    if r > n - 1 {
        return Err(MdsError::InvalidConfiguration(format!(
            "target rank r={} out of range for {} rows (max {})",
            r,
            n,
            n - 1
        )));
    }
    trace!("exact_mds: n={}, k={}, r={}", n, k, r);

    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| x.get_row(i).iterator(0).copied().collect())
        .collect();
    if rows.iter().flatten().any(|v| !v.is_finite()) {
        return Err(MdsError::Numerical(
            "input matrix contains non-finite values".into(),
        ));
    }

    // Squared distances, one row per rayon task.
    let d2: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let ri = &rows[i];
            (0..n)
                .map(|j| {
                    let rj = &rows[j];
                    ri.iter()
                        .zip(rj.iter())
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum()
                })
                .collect()
        })
        .collect();

    // Double centering. D² is symmetric, so row means equal column means.
    let row_means: Vec<f64> = d2.iter().map(|row| row.iter().sum::<f64>() / n as f64).collect();
    let grand_mean = row_means.iter().sum::<f64>() / n as f64;

    let mut b = na::DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            b[(i, j)] = -0.5 * (d2[i][j] - row_means[i] - row_means[j] + grand_mean);
        }
    }

    let (values, vectors) = sym_eigen_desc(b)?;
    debug!(
        "exact_mds: n={}, leading eigenvalues {:?}",
        n,
        &values[..r.min(4)]
    );

    let eigen: Vec<f64> = values[..r].iter().map(|&v| v.max(0.0)).collect();
    let coords: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..r)
                .map(|c| vectors[(i, c)] * eigen[c].sqrt())
                .collect()
        })
        .collect();

    Ok(MdsResult {
        points: DenseMatrix::from_2d_vec(&coords).unwrap(),
        eigen,
    })
}
