//! Divide-and-Conquer MDS: the single-level sibling of Fast MDS.
//!
//! # Algorithm
//!
//! 1. Partition the rows with the flat sizing policy: first partition of
//!    size l, later partitions of size l − c
//! 2. Prepend the same c-row sample of the first partition to every later
//!    partition and solve every partition exactly; the first partition's own
//!    solution doubles as the alignment reference, so no separate anchor
//!    solve is needed
//! 3. Procrustes-align every later partition onto the reference through the
//!    c shared rows (no translation), then drop the shared rows
//! 4. Concatenate, restore the original row order, rotate onto principal
//!    axes, and size-weight-average the per-partition eigenvalues
//!
//! Unlike the recursive solver, eigenvalue aggregation here is size-weighted;
//! the two conventions are intentionally distinct (see `aggregate`).

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::aggregate::weighted_mean_eigen;
use crate::exact::exact_mds;
use crate::matrix::{restore_row_order, rotate_to_principal_axes, take_rows, vstack};
use crate::partition::flat_partitions;
use crate::procrustes::procrustes_align;
use crate::{branch_seed, validate_mds_params, MdsResult, Result};

/// Divide-and-Conquer MDS of `x` into rank `r`, with a root seed drawn from
/// the thread RNG.
///
/// See [`divide_conquer_mds_seeded`] for the parameters and contract.
pub fn divide_conquer_mds(
    x: &DenseMatrix<f64>,
    l: usize,
    c_points: usize,
    r: usize,
    n_cores: usize,
) -> Result<MdsResult> {
    divide_conquer_mds_seeded(x, l, c_points, r, n_cores, rand::random())
}

/// Divide-and-Conquer MDS of `x` into rank `r`, reproducible for a fixed
/// `seed`.
///
/// # Parameters
///
/// * `x` - n×k observation matrix; row order is preserved end-to-end
/// * `l` - size at which every partition is solved exactly: the first
///   partition has l rows, later ones have `l - c_points` rows plus the
///   c shared rows
/// * `c_points` - rows of the first partition shared with every later
///   partition for alignment (`c_points ≈ 5 * r` is a reasonable choice);
///   must be smaller than `l`
/// * `r` - target rank (output dimensions)
/// * `n_cores` - parallelism width for the independent exact solves
/// * `seed` - root seed for the partition permutation and the shared sample
///
/// # Returns
///
/// `points` with exactly n rows (input row order) and r columns, rotated
/// onto its own principal axes, and `eigen` with r entries: the size-weighted
/// mean of the per-partition eigenvalues, each normalized by the rows its
/// exact solve actually contained.
///
/// # Errors
///
/// `InvalidConfiguration` for out-of-range parameters (including
/// `c_points >= l`); `Numerical` if any exact solve fails. Fail-fast: any
/// partition failure aborts the whole computation.
pub fn divide_conquer_mds_seeded(
    x: &DenseMatrix<f64>,
    l: usize,
    c_points: usize,
    r: usize,
    n_cores: usize,
    seed: u64,
) -> Result<MdsResult> {
    validate_mds_params(l, c_points, r, n_cores)?;
    let (n, k) = x.shape();
    info!(
        "divide_conquer_mds: n={}, k={}, l={}, c_points={}, r={}, n_cores={}",
        n, k, l, c_points, r, n_cores
    );
    let start = Instant::now();

    if n <= l {
        let mut mds = exact_mds(x, r)?;
        for v in &mut mds.eigen {
            *v /= n as f64;
        }
        info!("divide_conquer_mds finished in {:?} (exact)", start.elapsed());
        return Ok(mds);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(branch_seed(seed, 0));
    let plan = flat_partitions(n, l, c_points, r, &mut rng)?;
    let p = plan.partitions.len();
    if p <= 1 {
        // The remainder merge can collapse the plan to one partition.
        let mut mds = exact_mds(x, r)?;
        for v in &mut mds.eigen {
            *v /= n as f64;
        }
        return Ok(mds);
    }
    debug!("divide_conquer_mds: n={} -> {} partitions", n, p);

    // Global row indices of the c shared rows inside the first partition.
    let shared_global: Vec<usize> = plan
        .shared_sample
        .iter()
        .map(|&j| plan.partitions[0][j])
        .collect();

    let solve_one = |i: usize| -> Result<MdsResult> {
        let indices: Vec<usize> = if i == 0 {
            plan.partitions[0].clone()
        } else {
            shared_global
                .iter()
                .chain(plan.partitions[i].iter())
                .copied()
                .collect()
        };
        let xi = take_rows(x, &indices);
        let mut mds = exact_mds(&xi, r)?;
        // Normalize by the solved row count so partitions of different sizes
        // stay comparable under the weighted mean.
        let m = indices.len() as f64;
        for v in &mut mds.eigen {
            *v /= m;
        }
        Ok(mds)
    };
    let solved: Vec<MdsResult> = if n_cores > 1 {
        (0..p)
            .into_par_iter()
            .map(solve_one)
            .collect::<Result<Vec<_>>>()?
    } else {
        (0..p).map(solve_one).collect::<Result<Vec<_>>>()?
    };

    // The first partition's configuration at the shared rows is the
    // alignment reference.
    let reference = take_rows(&solved[0].points, &plan.shared_sample);
    let shared_positions: Vec<usize> = (0..c_points).collect();

    let mut blocks = Vec::with_capacity(p);
    blocks.push(solved[0].points.clone());
    for (i, sub) in solved.iter().enumerate().skip(1) {
        let source = take_rows(&sub.points, &shared_positions);
        let aligned = procrustes_align(&source, &reference, &sub.points, false)?;
        // Drop the c prepended shared rows; they already live in partition 1.
        let tail: Vec<usize> = (c_points..aligned.shape().0).collect();
        blocks.push(take_rows(&aligned, &tail));
    }

    let stacked = vstack(&blocks);
    let row_identity: Vec<usize> = plan.partitions.concat();
    let points = restore_row_order(&stacked, &row_identity);
    let points = rotate_to_principal_axes(&points)?;

    let eigen_vectors: Vec<Vec<f64>> = solved.into_iter().map(|m| m.eigen).collect();
    let weights: Vec<usize> = plan.partitions.iter().map(|part| part.len()).collect();
    let eigen = weighted_mean_eigen(&eigen_vectors, &weights);

    info!("divide_conquer_mds finished in {:?}", start.elapsed());
    Ok(MdsResult { points, eigen })
}
