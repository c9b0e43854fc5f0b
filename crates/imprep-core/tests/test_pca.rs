use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use imprep_core::error::ImprepError;
use imprep_core::pca::{PcaBasis, PcaTarget};

fn random_rows(n: usize, dim: usize, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n, dim), |_| rng.gen_range(0.0..1.0))
}

/// Rows spanned by two fixed directions plus a constant offset.
fn rank_two_rows(n: usize, dim: usize) -> Array2<f32> {
    let a = Array1::from_shape_fn(dim, |i| (i as f32 * 0.3).sin());
    let b = Array1::from_shape_fn(dim, |i| (i as f32 * 0.7).cos());
    let mut rng = StdRng::seed_from_u64(99);
    let mut out = Array2::<f32>::zeros((n, dim));
    for mut row in out.rows_mut() {
        let s: f32 = rng.gen_range(-2.0..2.0);
        let t: f32 = rng.gen_range(-1.0..1.0);
        row.assign(&(&a * s + &b * t + 0.5));
    }
    out
}

fn max_reconstruction_error(basis: &PcaBasis, data: &Array2<f32>) -> f32 {
    data.rows()
        .into_iter()
        .map(|row| {
            let coeffs = basis.project(&row).unwrap();
            let back = basis.back_project(&coeffs.view()).unwrap();
            (&back - &row).iter().fold(0.0f32, |m, d| m.max(d.abs()))
        })
        .fold(0.0, f32::max)
}

// ---------------------------------------------------------------------------
// Axis ordering
// ---------------------------------------------------------------------------

#[test]
fn test_axis_aligned_spread_orders_components() {
    let data = ndarray::array![
        [1.0f32, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 5.0, 0.0],
        [0.0, -5.0, 0.0],
        [0.0, 0.0, 3.0],
        [0.0, 0.0, -3.0],
    ];
    let basis = PcaBasis::fit(&data.view(), PcaTarget::Components(0)).unwrap();
    assert_eq!(basis.n_components(), 3);
    assert_abs_diff_eq!(basis.eigenvalues[0], 50.0 / 6.0, epsilon = 1e-4);
    assert_abs_diff_eq!(basis.eigenvalues[1], 18.0 / 6.0, epsilon = 1e-4);
    assert_abs_diff_eq!(basis.eigenvalues[2], 2.0 / 6.0, epsilon = 1e-4);
    assert_abs_diff_eq!(basis.eigenvectors[[0, 1]].abs(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(basis.eigenvectors[[1, 2]].abs(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(basis.eigenvectors[[2, 0]].abs(), 1.0, epsilon = 1e-5);
}

#[test]
fn test_identical_rows_fit_on_both_paths() {
    let rows = vec![vec![10.0f32; 16]; 2];
    let basis = PcaBasis::fit_rows(&rows, PcaTarget::Components(5)).unwrap();
    assert_eq!(basis.n_components(), 2);
    let coeffs = basis.project(&Array1::from_vec(rows[0].clone()).view()).unwrap();
    assert!(coeffs.iter().all(|c| c.abs() < 1e-6));
    let rebuilt = basis.back_project(&coeffs.view()).unwrap();
    assert!(rebuilt.iter().all(|v| (v - 10.0).abs() < 1e-5));

    let tall = PcaBasis::fit_rows(&vec![vec![10.0f32; 2]; 4], PcaTarget::Components(5)).unwrap();
    assert_eq!(tall.n_components(), 2);
    assert!(tall.eigenvalues.iter().all(|v| v.abs() < 1e-6));
}

// ---------------------------------------------------------------------------
// Basis fitting
// ---------------------------------------------------------------------------

#[test]
fn test_full_basis_reconstructs_more_samples_than_dims() {
    let data = random_rows(60, 8, 1);
    let basis = PcaBasis::fit(&data.view(), PcaTarget::Components(0)).unwrap();
    assert_eq!(basis.n_components(), 8);
    assert!(max_reconstruction_error(&basis, &data) < 1e-4);
}

#[test]
fn test_full_basis_reconstructs_fewer_samples_than_dims() {
    let data = random_rows(12, 300, 2);
    let basis = PcaBasis::fit(&data.view(), PcaTarget::RetainedVariance(1.0)).unwrap();
    assert!(basis.n_components() <= 12);
    assert_eq!(basis.dim(), 300);
    assert!(max_reconstruction_error(&basis, &data) < 1e-3);
}

#[test]
fn test_eigenvalues_are_descending_and_vectors_orthonormal() {
    let data = random_rows(40, 6, 3);
    let basis = PcaBasis::fit(&data.view(), PcaTarget::Components(0)).unwrap();

    for pair in basis.eigenvalues.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    let gram = basis.eigenvectors.dot(&basis.eigenvectors.t());
    for ((i, j), &v) in gram.indexed_iter() {
        let expected = if i == j { 1.0 } else { 0.0 };
        assert_abs_diff_eq!(v, expected, epsilon = 1e-4);
    }
}

#[test]
fn test_variance_target_finds_low_rank() {
    let data = rank_two_rows(50, 20);
    let basis = PcaBasis::fit(&data.view(), PcaTarget::RetainedVariance(0.99)).unwrap();
    assert!(basis.n_components() <= 2, "got {}", basis.n_components());
    assert!(max_reconstruction_error(&basis, &data) < 1e-3);
}

#[test]
fn test_component_count_is_capped() {
    let data = random_rows(10, 4, 4);
    let basis = PcaBasis::fit(&data.view(), PcaTarget::Components(100)).unwrap();
    assert_eq!(basis.n_components(), 4);

    let basis = PcaBasis::fit(&data.view(), PcaTarget::Components(2)).unwrap();
    assert_eq!(basis.n_components(), 2);
    assert_eq!(basis.eigenvectors.dim(), (2, 4));
}

#[test]
fn test_default_target_is_hundred_components() {
    assert_eq!(PcaTarget::default(), PcaTarget::Components(100));
}

#[test]
fn test_invalid_variance_rejected() {
    let data = random_rows(5, 3, 5);
    for bad in [0.0, -0.5, 1.01] {
        assert!(matches!(
            PcaBasis::fit(&data.view(), PcaTarget::RetainedVariance(bad)),
            Err(ImprepError::InvalidInput(_))
        ));
    }
}

#[test]
fn test_project_checks_dimension() {
    let data = random_rows(10, 4, 6);
    let basis = PcaBasis::fit(&data.view(), PcaTarget::Components(0)).unwrap();
    let wrong = Array1::<f32>::zeros(5);
    assert!(matches!(
        basis.project(&wrong.view()),
        Err(ImprepError::DimensionMismatch { expected: 4, actual: 5 })
    ));
}

#[test]
fn test_fit_rows_matches_fit() {
    let data = random_rows(15, 5, 7);
    let rows: Vec<Vec<f32>> = data.rows().into_iter().map(|r| r.to_vec()).collect();
    let a = PcaBasis::fit(&data.view(), PcaTarget::Components(3)).unwrap();
    let b = PcaBasis::fit_rows(&rows, PcaTarget::Components(3)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_empty_input_rejected() {
    let rows: Vec<Vec<f32>> = Vec::new();
    assert!(PcaBasis::fit_rows(&rows, PcaTarget::Components(1)).is_err());
}
