use approx::assert_relative_eq;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::matrix::{restore_row_order, rotate_to_principal_axes, take_rows, vstack};
use crate::tests::init;
use crate::tests::test_data::{make_planar, row_distance};

#[test]
fn take_rows_selects_in_given_order() {
    let x = DenseMatrix::from_2d_vec(&vec![
        vec![0.0, 0.1],
        vec![1.0, 1.1],
        vec![2.0, 2.1],
        vec![3.0, 3.1],
    ])
    .unwrap();

    let sub = take_rows(&x, &[3, 1]);
    assert_eq!(sub.shape(), (2, 2));
    assert_eq!(*sub.get((0, 0)), 3.0);
    assert_eq!(*sub.get((0, 1)), 3.1);
    assert_eq!(*sub.get((1, 0)), 1.0);
}

#[test]
fn vstack_concatenates_blocks() {
    let a = DenseMatrix::from_2d_vec(&vec![vec![1.0, 2.0]]).unwrap();
    let b = DenseMatrix::from_2d_vec(&vec![vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();

    let stacked = vstack(&[a, b]);
    assert_eq!(stacked.shape(), (3, 2));
    assert_eq!(*stacked.get((0, 0)), 1.0);
    assert_eq!(*stacked.get((1, 0)), 3.0);
    assert_eq!(*stacked.get((2, 1)), 6.0);
}

#[test]
fn restore_row_order_inverts_partition_concatenation() {
    // Rows stacked in partition order [2, 0, 3, 1].
    let stacked = DenseMatrix::from_2d_vec(&vec![
        vec![2.0],
        vec![0.0],
        vec![3.0],
        vec![1.0],
    ])
    .unwrap();

    let restored = restore_row_order(&stacked, &[2, 0, 3, 1]);
    for i in 0..4 {
        assert_eq!(*restored.get((i, 0)), i as f64);
    }
}

#[test]
fn principal_axis_rotation_preserves_distances() {
    init();
    let x = make_planar(60, 7);
    let rotated = rotate_to_principal_axes(&x).unwrap();

    assert_eq!(rotated.shape(), x.shape());
    for &(i, j) in &[(0usize, 1usize), (5, 40), (12, 59), (30, 31)] {
        assert_relative_eq!(
            row_distance(&x, i, j),
            row_distance(&rotated, i, j),
            max_relative = 1e-9
        );
    }
}

#[test]
fn principal_axis_rotation_orders_variance_descending() {
    init();
    // Dominant variance deliberately on the second column.
    let rows: Vec<Vec<f64>> = (0..50)
        .map(|i| {
            let t = i as f64 - 25.0;
            vec![0.01 * t, t]
        })
        .collect();
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    let rotated = rotate_to_principal_axes(&x).unwrap();

    let var = |col: usize| -> f64 {
        let mean: f64 = (0..50).map(|i| *rotated.get((i, col))).sum::<f64>() / 50.0;
        (0..50)
            .map(|i| {
                let d = *rotated.get((i, col)) - mean;
                d * d
            })
            .sum::<f64>()
            / 49.0
    };
    assert!(var(0) > var(1));
}
