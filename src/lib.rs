//! # bigmds: scalable approximate Multidimensional Scaling
//!
//! Classical MDS recovers an r-dimensional point configuration whose pairwise
//! Euclidean distances approximate those of the input, via an
//! eigendecomposition of the n×n double-centered squared-distance matrix.
//! That decomposition is infeasible once n grows past a few thousand rows.
//!
//! This crate scales MDS to arbitrary n with two partition/solve/align/combine
//! algorithms that only ever eigendecompose small matrices:
//!
//! - [`fast_mds`] (Fast MDS): recursively splits the rows into partitions,
//!   solves each partition by calling itself (bottoming out in classical MDS),
//!   then stitches the partial configurations into one coordinate frame using
//!   a shared set of anchor points and a Procrustes rigid alignment.
//! - [`divide_conquer_mds`] (Divide-and-Conquer MDS): a single-level sibling.
//!   The first partition doubles as the alignment reference; every later
//!   partition is solved together with a fixed sample of the first partition's
//!   rows and aligned onto the reference through those shared rows.
//!
//! Both return an [`MdsResult`]: an n×r configuration in the *input row order*
//! plus the top-r eigenvalue approximations (sorted descending). The final
//! configuration is rotated onto its own principal axes, so repeated or
//! recursive composition does not accumulate orientation drift.
//!
//! # Building blocks
//!
//! - [`exact::exact_mds`]: classical MDS on a small point matrix.
//! - [`procrustes::procrustes_align`]: rigid (rotation/reflection + scale,
//!   optionally translation) least-squares alignment of configurations.
//! - `partition`: sizing policies deciding how many partitions to form and
//!   how large each must be to stay numerically adequate.
//!
//! # Determinism
//!
//! All randomness (partition permutations, anchor sampling) flows from an
//! explicit root seed through per-branch `ChaCha8Rng` generators, so the
//! `*_seeded` entry points are reproducible for any parallelism width.
//! The unseeded entry points draw a fresh root seed from the thread RNG.
//!
//! # Example
//!
//! ```
//! use smartcore::linalg::basic::matrix::DenseMatrix;
//! use bigmds::fast_mds_seeded;
//!
//! // 40 points on a noisy line in 3-D; small enough for the exact base case.
//! let rows: Vec<Vec<f64>> = (0..40)
//!     .map(|i| {
//!         let t = i as f64;
//!         vec![t, 0.5 * t + (i % 3) as f64 * 0.01, 0.1 * t]
//!     })
//!     .collect();
//! let x = DenseMatrix::from_2d_vec(&rows).unwrap();
//!
//! let mds = fast_mds_seeded(&x, 100, 10, 2, 1, 42).unwrap();
//! assert_eq!(mds.eigen.len(), 2);
//! // First principal direction dominates.
//! assert!(mds.eigen[0] > mds.eigen[1]);
//! ```

mod aggregate;
mod anchors;
pub mod divide;
pub mod exact;
pub mod fast;
mod matrix;
mod partition;
pub mod procrustes;

#[cfg(test)]
mod tests;

pub use divide::{divide_conquer_mds, divide_conquer_mds_seeded};
pub use exact::exact_mds;
pub use fast::{fast_mds, fast_mds_seeded};
pub use procrustes::procrustes_align;

use smartcore::linalg::basic::matrix::DenseMatrix;

// ============================================================================
// Result Types
// ============================================================================

/// Output of an MDS computation.
#[derive(Clone, Debug)]
pub struct MdsResult {
    /// Point configuration, one row per input row (input row order), r columns.
    pub points: DenseMatrix<f64>,
    /// Approximated top-r eigenvalues of the double-centered squared-distance
    /// matrix, sorted descending.
    pub eigen: Vec<f64>,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Clone, Debug)]
pub enum MdsError {
    /// Parameters that cannot yield a valid computation (undersized samples,
    /// zero partition capacity, rank out of range).
    InvalidConfiguration(String),
    /// Eigendecomposition or SVD failure, or non-finite input data.
    Numerical(String),
    /// Mismatched matrix shapes between configurations to be aligned.
    Dimension(String),
}

impl std::fmt::Display for MdsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MdsError::InvalidConfiguration(e) => write!(f, "Invalid configuration: {}", e),
            MdsError::Numerical(e) => write!(f, "Numerical error: {}", e),
            MdsError::Dimension(e) => write!(f, "Dimension mismatch: {}", e),
        }
    }
}

impl std::error::Error for MdsError {}

pub type Result<T> = std::result::Result<T, MdsError>;

// ============================================================================
// Shared helpers
// ============================================================================

/// Derive a child seed for an independent random branch (partition index,
/// anchor draw) from a parent seed. Splitmix-style mix so sibling branches
/// get decorrelated streams.
pub(crate) fn branch_seed(seed: u64, branch: u64) -> u64 {
    let mut z = seed
        .wrapping_add(branch.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Validate the parameters shared by both public algorithms.
pub(crate) fn validate_mds_params(
    l: usize,
    sample_points: usize,
    r: usize,
    n_cores: usize,
) -> Result<()> {
    if l == 0 {
        return Err(MdsError::InvalidConfiguration(
            "partition size limit l must be > 0".into(),
        ));
    }
    if sample_points == 0 {
        return Err(MdsError::InvalidConfiguration(
            "anchor/shared sample size must be > 0".into(),
        ));
    }
    if r == 0 {
        return Err(MdsError::InvalidConfiguration(
            "target rank r must be >= 1".into(),
        ));
    }
    if n_cores == 0 {
        return Err(MdsError::InvalidConfiguration(
            "n_cores must be >= 1".into(),
        ));
    }
    Ok(())
}
