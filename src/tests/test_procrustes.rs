use approx::assert_relative_eq;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::procrustes::procrustes_align;
use crate::tests::init;
use crate::tests::test_data::make_scaled_gaussian;
use crate::MdsError;

/// Rotate a 2-column configuration by `theta`, then scale and translate it.
fn transform(x: &DenseMatrix<f64>, theta: f64, scale: f64, shift: (f64, f64)) -> DenseMatrix<f64> {
    let (n, _) = x.shape();
    let (sin, cos) = theta.sin_cos();
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let a = *x.get((i, 0));
            let b = *x.get((i, 1));
            vec![
                scale * (a * cos - b * sin) + shift.0,
                scale * (a * sin + b * cos) + shift.1,
            ]
        })
        .collect();
    DenseMatrix::from_2d_vec(&rows).unwrap()
}

fn assert_matrices_close(a: &DenseMatrix<f64>, b: &DenseMatrix<f64>, tol: f64) {
    assert_eq!(a.shape(), b.shape());
    let (n, k) = a.shape();
    for i in 0..n {
        for j in 0..k {
            assert_relative_eq!(*a.get((i, j)), *b.get((i, j)), epsilon = tol, max_relative = tol);
        }
    }
}

#[test]
fn recovers_pure_rotation() {
    init();
    let x = make_scaled_gaussian(30, &[4.0, 1.0], 5);
    let y = transform(&x, 0.7, 1.0, (0.0, 0.0));

    let aligned = procrustes_align(&x, &y, &x, false).unwrap();
    assert_matrices_close(&aligned, &y, 1e-9);
}

#[test]
fn recovers_rotation_with_scale() {
    init();
    let x = make_scaled_gaussian(30, &[4.0, 1.0], 9);
    let y = transform(&x, -1.2, 3.0, (0.0, 0.0));

    let aligned = procrustes_align(&x, &y, &x, false).unwrap();
    assert_matrices_close(&aligned, &y, 1e-9);
}

#[test]
fn translation_recovered_only_when_requested() {
    init();
    let x = make_scaled_gaussian(30, &[4.0, 1.0], 13);
    let y = transform(&x, 0.4, 2.0, (10.0, -3.0));

    let with_translation = procrustes_align(&x, &y, &x, true).unwrap();
    assert_matrices_close(&with_translation, &y, 1e-9);

    // Without a translation component the shifted target cannot be matched.
    let without = procrustes_align(&x, &y, &x, false).unwrap();
    let (n, _) = without.shape();
    let residual: f64 = (0..n)
        .map(|i| {
            let da = *without.get((i, 0)) - *y.get((i, 0));
            let db = *without.get((i, 1)) - *y.get((i, 1));
            da * da + db * db
        })
        .sum();
    assert!(residual > 1.0);
}

#[test]
fn transform_applies_to_full_configuration() {
    init();
    // Fit on the anchors, apply to a larger configuration.
    let full = make_scaled_gaussian(50, &[4.0, 1.0], 23);
    let anchors_idx: Vec<usize> = (0..10).collect();
    let anchors = crate::matrix::take_rows(&full, &anchors_idx);
    let full_target = transform(&full, 0.9, 1.5, (0.0, 0.0));
    let anchor_target = crate::matrix::take_rows(&full_target, &anchors_idx);

    let aligned = procrustes_align(&anchors, &anchor_target, &full, false).unwrap();
    assert_matrices_close(&aligned, &full_target, 1e-8);
}

#[test]
fn rejects_mismatched_shapes() {
    let a = make_scaled_gaussian(10, &[1.0, 1.0], 1);
    let b = make_scaled_gaussian(12, &[1.0, 1.0], 2);
    assert!(matches!(
        procrustes_align(&a, &b, &a, false),
        Err(MdsError::Dimension(_))
    ));

    let c = make_scaled_gaussian(10, &[1.0, 1.0, 1.0], 3);
    assert!(matches!(
        procrustes_align(&a, &a, &c, false),
        Err(MdsError::Dimension(_))
    ));
}
