//! Dense row-major matrix helpers shared by the MDS solvers.
//!
//! Partitioned MDS shuffles rows between matrices constantly: partitions are
//! extracted by index, per-partition results are stacked back together, and
//! the stacked result is reordered to the original row identity. These
//! helpers keep that bookkeeping in one place, together with the small
//! symmetric eigendecomposition used for principal-axis canonicalization
//! (nalgebra on an r×r problem; r is tiny).

use log::trace;
use nalgebra as na;
use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::{MdsError, Result};

/// Extract the given rows of `x`, in the given order, into a new matrix.
pub(crate) fn take_rows(x: &DenseMatrix<f64>, indices: &[usize]) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = indices
        .iter()
        .map(|&i| x.get_row(i).iterator(0).copied().collect())
        .collect();
    DenseMatrix::from_2d_vec(&rows).unwrap()
}

/// Stack matrices vertically. All blocks must share a column count.
pub(crate) fn vstack(blocks: &[DenseMatrix<f64>]) -> DenseMatrix<f64> {
    let ncols = blocks[0].shape().1;
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(blocks.iter().map(|b| b.shape().0).sum());
    for block in blocks {
        debug_assert_eq!(block.shape().1, ncols);
        for i in 0..block.shape().0 {
            rows.push(block.get_row(i).iterator(0).copied().collect());
        }
    }
    DenseMatrix::from_2d_vec(&rows).unwrap()
}

/// Undo a partition permutation: row j of `stacked` becomes row
/// `row_identity[j]` of the output. `row_identity` must be a permutation of
/// `0..stacked.nrows()`.
pub(crate) fn restore_row_order(
    stacked: &DenseMatrix<f64>,
    row_identity: &[usize],
) -> DenseMatrix<f64> {
    let (n, k) = stacked.shape();
    debug_assert_eq!(n, row_identity.len());
    let mut rows = vec![vec![0.0; k]; n];
    for (j, &orig) in row_identity.iter().enumerate() {
        rows[orig] = stacked.get_row(j).iterator(0).copied().collect();
    }
    DenseMatrix::from_2d_vec(&rows).unwrap()
}

/// Copy a `DenseMatrix` into a nalgebra matrix for the small dense kernels.
pub(crate) fn to_na(x: &DenseMatrix<f64>) -> na::DMatrix<f64> {
    let (n, k) = x.shape();
    let mut buf = Vec::with_capacity(n * k);
    for i in 0..n {
        buf.extend(x.get_row(i).iterator(0).copied());
    }
    na::DMatrix::from_row_slice(n, k, &buf)
}

/// Copy a nalgebra matrix back into the crate's row-major container.
pub(crate) fn from_na(m: &na::DMatrix<f64>) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = (0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m[(i, j)]).collect())
        .collect();
    DenseMatrix::from_2d_vec(&rows).unwrap()
}

/// Symmetric eigendecomposition with eigenpairs sorted descending by
/// eigenvalue. Returns `(values, vectors)` with eigenvectors in columns.
pub(crate) fn sym_eigen_desc(m: na::DMatrix<f64>) -> Result<(Vec<f64>, na::DMatrix<f64>)> {
    let dim = m.nrows();
    let se = na::SymmetricEigen::try_new(m, 1.0e-12, 0).ok_or_else(|| {
        MdsError::Numerical("symmetric eigendecomposition did not converge".into())
    })?;

    let mut order: Vec<usize> = (0..dim).collect();
    order.sort_unstable_by(|&a, &b| {
        se.eigenvalues[b]
            .partial_cmp(&se.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let values: Vec<f64> = order.iter().map(|&i| se.eigenvalues[i]).collect();
    let mut vectors = na::DMatrix::<f64>::zeros(dim, dim);
    for (new_c, &old_c) in order.iter().enumerate() {
        vectors.set_column(new_c, &se.eigenvectors.column(old_c));
    }
    Ok((values, vectors))
}

/// Rotate a configuration onto its own principal axes: right-multiply by the
/// eigenvectors of its covariance matrix (descending eigenvalue order).
/// Pairwise distances are unchanged; only the orientation is canonicalized.
pub(crate) fn rotate_to_principal_axes(points: &DenseMatrix<f64>) -> Result<DenseMatrix<f64>> {
    let (n, r) = points.shape();
    if n < 2 {
        return Ok(points.clone());
    }
    trace!("Rotating {}x{} configuration onto principal axes", n, r);

    let p = to_na(points);
    let means = p.row_mean();
    let mut centered = p.clone();
    for mut row in centered.row_iter_mut() {
        row -= &means;
    }
    let cov = centered.transpose() * &centered / (n as f64 - 1.0);

    let (_values, vectors) = sym_eigen_desc(cov)?;
    Ok(from_na(&(p * vectors)))
}
