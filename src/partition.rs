//! Partition-sizing policies for the two MDS algorithms.
//!
//! Both policies slice a random permutation of the row range into contiguous
//! groups, so partitions are disjoint and cover every row exactly once.
//!
//! - **Recursive policy** (Fast MDS): starts from `p = l / s` partitions and
//!   decrements p until every partition reaches the minimum size
//!   `max(r + 2, s)`. The loop may degenerate to a single full-range
//!   partition; that is the recursion's base-case trigger, not an error.
//! - **Flat policy** (Divide-and-Conquer MDS): first partition of size l,
//!   later partitions of size `l - c` so that each, once the c shared rows
//!   from the first partition are prepended, is solved at size l. The same
//!   c-row sample of the first partition is reused for every partition.

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::anchors::sample_without_replacement;
use crate::{MdsError, Result};

/// Index sets produced by the flat policy.
#[derive(Clone, Debug)]
pub(crate) struct FlatPlan {
    /// Disjoint row-index groups; their union is `0..n` exactly once.
    /// `partitions[0]` has size l and doubles as the alignment reference.
    pub partitions: Vec<Vec<usize>>,
    /// Local positions into `partitions[0]` of the c shared rows prepended to
    /// every later partition's solve.
    pub shared_sample: Vec<usize>,
}

/// Uniform random permutation of `0..n`.
fn permutation(n: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..n).collect();
    idx.shuffle(rng);
    idx
}

/// Size-reduction policy of the recursive planner.
///
/// Starting from `p0` partitions of `n` rows, decrements the partition count
/// while all of the following hold:
///
/// 1. `p >= 1`
/// 2. `size < min_size` or `last_size < min_size`, where `size = n / p` and
///    `last_size = n - (p - 1) * size` (the last partition absorbs the
///    remainder)
/// 3. `last_size > 0`
///
/// Returns the final partition count; `p <= 1` means no valid multi-partition
/// split exists and the caller must fall back to direct exact solving.
pub(crate) fn reduce_partition_count(n: usize, p0: usize, min_size: usize) -> usize {
    let mut p = p0;
    while p >= 1 {
        let size = n / p;
        let last_size = n - (p - 1) * size;
        let undersized = size < min_size || last_size < min_size;
        if !(undersized && last_size > 0) {
            break;
        }
        p -= 1;
    }
    trace!(
        "reduce_partition_count: n={}, p0={}, min_size={} -> p={}",
        n,
        p0,
        min_size,
        p
    );
    p
}

/// Recursive policy: partition `0..n` for Fast MDS.
///
/// Returns a single full-range partition (in natural order, no permutation)
/// when no valid multi-partition split exists.
pub(crate) fn recursive_partitions(
    n: usize,
    l: usize,
    s_points: usize,
    r: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Vec<usize>> {
    let p0 = l / s_points;
    let min_size = (r + 2).max(s_points);
    let p = reduce_partition_count(n, p0, min_size);

    if p <= 1 {
        debug!(
            "recursive_partitions: degenerate fallback to a single partition (n={})",
            n
        );
        return vec![(0..n).collect()];
    }

    let size = n / p;
    let perm = permutation(n, rng);
    let mut partitions: Vec<Vec<usize>> = (0..p - 1)
        .map(|i| perm[i * size..(i + 1) * size].to_vec())
        .collect();
    partitions.push(perm[(p - 1) * size..].to_vec());

    debug!(
        "recursive_partitions: n={} split into {} partitions of size {} (last {})",
        n,
        p,
        size,
        partitions[p - 1].len()
    );
    partitions
}

/// Flat policy: partition `0..n` for Divide-and-Conquer MDS.
///
/// Requires `n > l` (smaller inputs are solved exactly by the caller) and
/// `l > c_points`. The last partition absorbs the permutation remainder; if
/// that remainder falls below `max(r + 2, c_points)` it is merged into the
/// previous partition so every solve stays numerically adequate.
pub(crate) fn flat_partitions(
    n: usize,
    l: usize,
    c_points: usize,
    r: usize,
    rng: &mut ChaCha8Rng,
) -> Result<FlatPlan> {
    if c_points >= l {
        return Err(MdsError::InvalidConfiguration(format!(
            "shared sample size c_points={} must be smaller than partition size limit l={}",
            c_points, l
        )));
    }
    debug_assert!(n > l);

    let tail = l - c_points;
    let p = 1 + (n - l).div_ceil(tail);
    let perm = permutation(n, rng);

    let mut partitions: Vec<Vec<usize>> = Vec::with_capacity(p);
    partitions.push(perm[..l].to_vec());
    let mut offset = l;
    while offset < n {
        let end = (offset + tail).min(n);
        partitions.push(perm[offset..end].to_vec());
        offset = end;
    }
    debug_assert_eq!(partitions.len(), p);

    // A short remainder cannot support the alignment; fold it into the
    // previous partition.
    let min_size = (r + 2).max(c_points);
    if partitions.len() >= 2 && partitions[p - 1].len() < min_size {
        let short = partitions.pop().unwrap();
        debug!(
            "flat_partitions: merging short last partition ({} rows) into the previous one",
            short.len()
        );
        partitions.last_mut().unwrap().extend(short);
    }

    let shared_sample = sample_without_replacement(l, c_points, rng)?;

    debug!(
        "flat_partitions: n={} split into {} partitions (first {}, tail size {})",
        n,
        partitions.len(),
        l,
        tail
    );
    Ok(FlatPlan {
        partitions,
        shared_sample,
    })
}
