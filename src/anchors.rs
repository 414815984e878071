//! Anchor-point selection for cross-partition alignment.
//!
//! Every partition contributes a fixed number of anchor rows, drawn uniformly
//! without replacement from its own index set with an independent per-partition
//! generator. The anchors are extracted from the *original* input matrix and
//! stacked partition-by-partition into one matrix small enough for a single
//! exact solve; the solved anchor configuration becomes the reference frame
//! every partition is rigidly aligned onto.

use std::ops::Range;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::matrix::{take_rows, vstack};
use crate::{branch_seed, MdsError, Result};

/// Anchor rows sampled from each partition, with the bookkeeping needed to
/// map between a partition's local rows and its block inside the stacked
/// anchor matrix.
#[derive(Debug)]
pub(crate) struct AnchorSet {
    /// Anchor rows from the original input, one contiguous block per
    /// partition, `anchor_count` rows each.
    pub matrix: DenseMatrix<f64>,
    /// Row span each partition occupies inside `matrix`.
    pub spans: Vec<Range<usize>>,
    /// Local positions (into each partition's index set) of the sampled rows.
    pub samples: Vec<Vec<usize>>,
}

/// Draw `count` distinct positions from `0..len`, uniformly at random.
pub(crate) fn sample_without_replacement(
    len: usize,
    count: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<usize>> {
    if count > len {
        return Err(MdsError::InvalidConfiguration(format!(
            "cannot sample {} points from a partition of {} rows",
            count, len
        )));
    }
    let mut positions: Vec<usize> = (0..len).collect();
    positions.shuffle(rng);
    positions.truncate(count);
    Ok(positions)
}

/// Sample `anchor_count` rows from every partition and stack them, in
/// partition order, into one anchor matrix. Each partition's draw uses its
/// own generator derived from `seed`, so draws are independent across
/// parallel branches yet reproducible.
pub(crate) fn build_anchor_set(
    x: &DenseMatrix<f64>,
    partitions: &[Vec<usize>],
    anchor_count: usize,
    seed: u64,
) -> Result<AnchorSet> {
    let mut samples = Vec::with_capacity(partitions.len());
    let mut spans = Vec::with_capacity(partitions.len());
    let mut blocks = Vec::with_capacity(partitions.len());

    for (i, part) in partitions.iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(branch_seed(seed, i as u64));
        let local = sample_without_replacement(part.len(), anchor_count, &mut rng)?;
        let global: Vec<usize> = local.iter().map(|&j| part[j]).collect();
        trace!(
            "anchor sample for partition {}: {} of {} rows",
            i,
            anchor_count,
            part.len()
        );

        spans.push(i * anchor_count..(i + 1) * anchor_count);
        blocks.push(take_rows(x, &global));
        samples.push(local);
    }

    let matrix = vstack(&blocks);
    debug!(
        "built anchor set: {} partitions x {} anchors = {} rows",
        partitions.len(),
        anchor_count,
        partitions.len() * anchor_count
    );
    Ok(AnchorSet {
        matrix,
        spans,
        samples,
    })
}
