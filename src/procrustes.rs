//! Procrustes-type rigid alignment between point configurations.
//!
//! Given two configurations of the same anchor points, finds the
//! least-squares rotation/reflection and uniform scale (optionally a
//! translation) mapping the source anchors onto the target anchors, and
//! applies that transform to a full source configuration. The fit reduces to
//! an SVD of the r×r anchor cross-covariance, so cost is independent of the
//! configuration size.

use log::trace;
use nalgebra as na;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::matrix::{from_na, to_na};
use crate::{MdsError, Result};

/// Align `full_source` onto the frame of `target_anchors`.
///
/// `source_anchors` and `target_anchors` are two configurations of the same
/// s points (same rows, same order). The transform that best superimposes
/// the source anchors onto the target anchors in the least-squares sense is
/// computed and applied to `full_source`. With `translate = false` the
/// transform is rotation/reflection and scale only; the translation component
/// is fixed at zero.
///
/// # Errors
///
/// - `Dimension` if the anchor configurations differ in shape, or
///   `full_source` has a different column count
/// - `Numerical` if the anchor cross-covariance SVD fails or the source
///   anchors are degenerate (zero spread)
pub fn procrustes_align(
    source_anchors: &DenseMatrix<f64>,
    target_anchors: &DenseMatrix<f64>,
    full_source: &DenseMatrix<f64>,
    translate: bool,
) -> Result<DenseMatrix<f64>> {
    let (s, r) = source_anchors.shape();
    if target_anchors.shape() != (s, r) {
        return Err(MdsError::Dimension(format!(
            "anchor configurations differ in shape: {:?} vs {:?}",
            source_anchors.shape(),
            target_anchors.shape()
        )));
    }
    if full_source.shape().1 != r {
        return Err(MdsError::Dimension(format!(
            "configuration to transform has {} columns, anchors have {}",
            full_source.shape().1,
            r
        )));
    }
    trace!(
        "procrustes_align: {} anchors, rank {}, {} rows to transform, translate={}",
        s,
        r,
        full_source.shape().0,
        translate
    );

    let x = to_na(source_anchors);
    let y = to_na(target_anchors);
    let full = to_na(full_source);

    // Center the anchors only when a translation component is fitted.
    let (xc, yc, x_mean, y_mean) = if translate {
        let xm = x.row_mean();
        let ym = y.row_mean();
        let mut xc = x.clone();
        for mut row in xc.row_iter_mut() {
            row -= &xm;
        }
        let mut yc = y.clone();
        for mut row in yc.row_iter_mut() {
            row -= &ym;
        }
        (xc, yc, xm, ym)
    } else {
        let zero = na::RowDVector::<f64>::zeros(r);
        (x.clone(), y.clone(), zero.clone(), zero)
    };

    // Rotation minimizing ||Xc R - Yc||_F: SVD of M = Xcᵀ Yc, R = U Vᵀ.
    let m = xc.transpose() * &yc;
    let svd = na::SVD::new(m, true, true);
    let u = svd
        .u
        .ok_or_else(|| MdsError::Numerical("SVD did not produce U".into()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| MdsError::Numerical("SVD did not produce Vᵀ".into()))?;
    let rotation = u * v_t;

    // Uniform scale: trace(Σ) / ||Xc||²_F.
    let norm_sq = xc.iter().map(|v| v * v).sum::<f64>();
    if norm_sq == 0.0 {
        return Err(MdsError::Numerical(
            "source anchors have zero spread, scale is undefined".into(),
        ));
    }
    let scale = svd.singular_values.iter().sum::<f64>() / norm_sq;

    let transformed = if translate {
        let mut centered = full;
        for mut row in centered.row_iter_mut() {
            row -= &x_mean;
        }
        let mut out = centered * &rotation * scale;
        for mut row in out.row_iter_mut() {
            row += &y_mean;
        }
        out
    } else {
        full * &rotation * scale
    };

    Ok(from_na(&transformed))
}
