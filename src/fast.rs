//! Fast MDS: the recursive partition/solve/align/combine algorithm.
//!
//! # Algorithm
//!
//! 1. Partition the rows with the recursive sizing policy
//! 2. Solve each partition by recursion (exact classical MDS once a
//!    partition is small enough)
//! 3. Sample `s_points` anchor rows per partition, stack them and solve the
//!    anchor matrix exactly once; this is the reference frame
//! 4. Procrustes-align every partition's configuration onto its block of the
//!    anchor solution (rotation/reflection/scale, no translation)
//! 5. Concatenate, restore the original row order, rotate onto principal
//!    axes, and average the per-partition eigenvalues
//!
//! Recursion depth is O(log_{l/s} n) because partition sizes shrink toward l
//! at every level, so plain language-level recursion is safe.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::aggregate::mean_eigen;
use crate::anchors::build_anchor_set;
use crate::exact::exact_mds;
use crate::matrix::{restore_row_order, rotate_to_principal_axes, take_rows, vstack};
use crate::partition::recursive_partitions;
use crate::procrustes::procrustes_align;
use crate::{branch_seed, validate_mds_params, MdsResult, Result};

use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;

/// Fast MDS of `x` into rank `r`, with a root seed drawn from the thread RNG.
///
/// See [`fast_mds_seeded`] for the parameters and contract.
pub fn fast_mds(
    x: &DenseMatrix<f64>,
    l: usize,
    s_points: usize,
    r: usize,
    n_cores: usize,
) -> Result<MdsResult> {
    fast_mds_seeded(x, l, s_points, r, n_cores, rand::random())
}

/// Fast MDS of `x` into rank `r`, reproducible for a fixed `seed`.
///
/// # Parameters
///
/// * `x` - n×k observation matrix; row order is preserved end-to-end
/// * `l` - largest size the exact solver should handle; partitions are kept
///   at or below it
/// * `s_points` - anchor rows sampled per partition for alignment
///   (`s_points ≈ 5 * r` is a reasonable choice)
/// * `r` - target rank (output dimensions)
/// * `n_cores` - parallelism width for the per-partition solves. The same
///   width is forwarded unchanged into recursive calls, so deep recursions
///   can request more parallel tasks than cores; rayon's work-stealing pool
///   bounds the actual thread count
/// * `seed` - root seed; every partition permutation and anchor draw uses a
///   generator derived from it, so results are reproducible at any
///   `n_cores`
///
/// # Returns
///
/// `points` with exactly n rows (input row order) and r columns, rotated
/// onto its own principal axes, and `eigen` with r entries approximating the
/// top-r eigenvalues of the full double-centered squared-distance matrix,
/// normalized per observation (divided by the partition size at the exact
/// base case).
///
/// # Errors
///
/// `InvalidConfiguration` for out-of-range parameters or undersized anchor
/// samples; `Numerical` if any exact solve fails. Any partition failure
/// aborts the whole computation; no partial result is returned.
pub fn fast_mds_seeded(
    x: &DenseMatrix<f64>,
    l: usize,
    s_points: usize,
    r: usize,
    n_cores: usize,
    seed: u64,
) -> Result<MdsResult> {
    validate_mds_params(l, s_points, r, n_cores)?;
    let (n, k) = x.shape();
    info!(
        "fast_mds: n={}, k={}, l={}, s_points={}, r={}, n_cores={}",
        n, k, l, s_points, r, n_cores
    );
    let start = Instant::now();
    let out = fast_mds_recursive(x, l, s_points, r, n_cores, seed)?;
    info!("fast_mds finished in {:?}", start.elapsed());
    Ok(out)
}

fn fast_mds_recursive(
    x: &DenseMatrix<f64>,
    l: usize,
    s_points: usize,
    r: usize,
    n_cores: usize,
    seed: u64,
) -> Result<MdsResult> {
    let n = x.shape().0;

    // Small enough for the exact solver, too small relative to the anchor
    // count, or too small to support a meaningful alignment at rank r.
    if n <= l || n <= s_points || (n * s_points) / l <= r {
        return exact_normalized(x, r);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(branch_seed(seed, 0));
    let partitions = recursive_partitions(n, l, s_points, r, &mut rng);
    let p = partitions.len();
    if p <= 1 {
        // Degenerate fallback: no valid split exists, solve directly rather
        // than produce undersized, numerically unstable partitions.
        return exact_normalized(x, r);
    }
    debug!("fast_mds: n={} -> {} partitions", n, p);

    let solve_one = |(i, idx): (usize, &Vec<usize>)| -> Result<MdsResult> {
        let xi = take_rows(x, idx);
        fast_mds_recursive(&xi, l, s_points, r, n_cores, branch_seed(seed, 1 + i as u64))
    };
    let solved: Vec<MdsResult> = if n_cores > 1 {
        partitions
            .par_iter()
            .enumerate()
            .map(solve_one)
            .collect::<Result<Vec<_>>>()?
    } else {
        partitions
            .iter()
            .enumerate()
            .map(solve_one)
            .collect::<Result<Vec<_>>>()?
    };

    // One exact solve over the stacked anchor rows gives the reference frame.
    let anchors = build_anchor_set(x, &partitions, s_points, branch_seed(seed, p as u64 + 1))?;
    let reference = exact_mds(&anchors.matrix, r)?;

    let mut aligned = Vec::with_capacity(p);
    for (i, sub) in solved.iter().enumerate() {
        let source = take_rows(&sub.points, &anchors.samples[i]);
        let span: Vec<usize> = anchors.spans[i].clone().collect();
        let target = take_rows(&reference.points, &span);
        aligned.push(procrustes_align(&source, &target, &sub.points, false)?);
    }

    let stacked = vstack(&aligned);
    let row_identity: Vec<usize> = partitions.concat();
    let points = restore_row_order(&stacked, &row_identity);
    let points = rotate_to_principal_axes(&points)?;

    let eigen_vectors: Vec<Vec<f64>> = solved.into_iter().map(|m| m.eigen).collect();
    let eigen = mean_eigen(&eigen_vectors);

    Ok(MdsResult { points, eigen })
}

/// Exact base case: classical MDS with eigenvalues divided by n, which makes
/// them averageable across partitions of different sizes.
fn exact_normalized(x: &DenseMatrix<f64>, r: usize) -> Result<MdsResult> {
    let n = x.shape().0;
    let mut mds = exact_mds(x, r)?;
    for v in &mut mds.eigen {
        *v /= n as f64;
    }
    Ok(mds)
}
