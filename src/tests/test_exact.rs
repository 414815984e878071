use approx::assert_relative_eq;
use log::info;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::exact::exact_mds;
use crate::tests::init;
use crate::tests::test_data::{make_planar, make_scaled_gaussian, row_distance, sample_pairs};
use crate::MdsError;

#[test]
fn output_shapes() {
    init();
    let x = make_scaled_gaussian(40, &[4.0, 1.0, 1.0], 11);
    let mds = exact_mds(&x, 2).unwrap();

    assert_eq!(mds.points.shape(), (40, 2));
    assert_eq!(mds.eigen.len(), 2);
}

#[test]
fn eigenvalues_sorted_descending_and_nonnegative() {
    init();
    let x = make_scaled_gaussian(60, &[9.0, 4.0, 1.0, 1.0], 3);
    let mds = exact_mds(&x, 4).unwrap();

    for w in mds.eigen.windows(2) {
        assert!(w[0] >= w[1]);
    }
    assert!(mds.eigen.iter().all(|&v| v >= 0.0));
}

#[test]
fn collinear_points_have_one_dominant_eigenvalue() {
    init();
    let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    let mds = exact_mds(&x, 2).unwrap();

    assert!(mds.eigen[0] > 1.0);
    assert_relative_eq!(mds.eigen[1], 0.0, epsilon = 1e-6);
}

#[test]
fn reconstructs_planar_distances() {
    init();
    let x = make_planar(80, 21);
    let mds = exact_mds(&x, 2).unwrap();

    for (i, j) in sample_pairs(80, 40) {
        assert_relative_eq!(
            row_distance(&x, i, j),
            row_distance(&mds.points, i, j),
            max_relative = 1e-8
        );
    }
}

#[test]
fn eigenvalues_track_column_variances() {
    init();
    let n = 400;
    let x = make_scaled_gaussian(n, &[9.0, 4.0], 17);
    let mds = exact_mds(&x, 2).unwrap();

    // Classical MDS eigenvalues of Euclidean-embedded data approximate
    // n * column variance for independent columns.
    let per_point: Vec<f64> = mds.eigen.iter().map(|v| v / n as f64).collect();
    info!("per-point eigenvalues: {:?}", per_point);
    assert_relative_eq!(per_point[0], 9.0, max_relative = 0.25);
    assert_relative_eq!(per_point[1], 4.0, max_relative = 0.25);
}

#[test]
fn rejects_invalid_rank() {
    let x = make_scaled_gaussian(10, &[1.0], 1);
    assert!(matches!(
        exact_mds(&x, 0),
        Err(MdsError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        exact_mds(&x, 10),
        Err(MdsError::InvalidConfiguration(_))
    ));
}

#[test]
fn rejects_non_finite_input() {
    let x = DenseMatrix::from_2d_vec(&vec![vec![0.0, 1.0], vec![f64::NAN, 2.0]]).unwrap();
    assert!(matches!(exact_mds(&x, 1), Err(MdsError::Numerical(_))));
}
