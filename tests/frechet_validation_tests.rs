use approx::assert_relative_eq;
use frechet::core::{DistributionDistance, Error, Gaussian, Operand, ResiduePolicy, Result};
use frechet::linalg::{Convergence, DenmanBeavers, EigenSqrt};
use frechet::{frechet_distance, FrechetDistance};
use ndarray::{arr1, arr2, Array1, Array2, Axis};
use ndarray_linalg::{Eigh, UPLO};
use rand::prelude::*;
use rand_distr::StandardNormal;

// =========================================================================
// TEST 1: Univariate Gaussians against the closed form
// =========================================================================

#[test]
fn test_univariate_equal_gaussians() {
    let mu = arr1(&[0.0]);
    let sigma = arr2(&[[1.0]]);

    let d = frechet_distance((&mu, &sigma), (&mu, &sigma)).unwrap();
    assert_relative_eq!(d, 0.0, epsilon = 1e-10);
}

#[test]
fn test_univariate_shifted_mean() {
    let sigma = arr2(&[[1.0]]);

    let d = frechet_distance((&arr1(&[0.0]), &sigma), (&arr1(&[3.0]), &sigma)).unwrap();
    assert_relative_eq!(d, 3.0, epsilon = 1e-10);
}

#[test]
fn test_univariate_different_spread() {
    // (μ1, σ1) = (1, 2), (μ2, σ2) = (-2, 6): sqrt(9 + 16) = 5
    let x = Gaussian::new(arr1(&[1.0]), arr2(&[[4.0]])).unwrap();
    let y = Gaussian::new(arr1(&[-2.0]), arr2(&[[36.0]])).unwrap();

    let d = FrechetDistance::new().distance(&x, &y).unwrap();
    assert_relative_eq!(d, 5.0, epsilon = 1e-10);
}

// =========================================================================
// TEST 2: Known multivariate cases
// =========================================================================

#[test]
fn test_two_dimensional_shifted_standard_normals() {
    let sigma = Array2::eye(2);
    let d = frechet_distance((&arr1(&[0.0, 0.0]), &sigma), (&arr1(&[1.0, 1.0]), &sigma)).unwrap();

    assert_relative_eq!(d, 1.41421356, epsilon = 1e-8);
}

#[test]
fn test_commuting_diagonal_covariances() {
    // Diagonal covariances commute: d² = ||Δμ||² + Σ (√a_i - √b_i)²
    let a = arr1(&[1.0, 4.0, 9.0]);
    let b = arr1(&[4.0, 4.0, 1.0]);
    let x = Gaussian::diagonal(arr1(&[0.0, 1.0, 2.0]), &a).unwrap();
    let y = Gaussian::diagonal(arr1(&[1.0, 1.0, 0.0]), &b).unwrap();

    let expected_sq = 1.0 + 0.0 + 4.0 + (1.0 + 0.0 + 4.0);
    let d2 = FrechetDistance::new().distance_squared(&x, &y).unwrap();
    assert_relative_eq!(d2, expected_sq, epsilon = 1e-10);
}

#[test]
fn test_isotropic_scaling() {
    // N(0, s² I) vs N(0, t² I) in d dims: d · (s - t)²
    let x = Gaussian::isotropic(Array1::zeros(4), 9.0).unwrap();
    let y = Gaussian::isotropic(Array1::zeros(4), 1.0).unwrap();

    let d = FrechetDistance::new().distance(&x, &y).unwrap();
    assert_relative_eq!(d, (4.0f64 * 4.0).sqrt(), epsilon = 1e-10);
}

#[test]
fn test_correlated_covariances_match_both_strategies() {
    let x = Gaussian::new(
        arr1(&[0.5, -1.0]),
        arr2(&[[2.0, 0.8], [0.8, 1.0]]),
    )
    .unwrap();
    let y = Gaussian::new(
        arr1(&[0.0, 0.0]),
        arr2(&[[1.0, -0.4], [-0.4, 3.0]]),
    )
    .unwrap();

    let eig = FrechetDistance::new().with_sqrt(EigenSqrt::new().with_residual_tol(1e-9).unwrap());
    let db = FrechetDistance::new().with_sqrt(
        DenmanBeavers::new()
            .with_convergence(Convergence {
                max_iterations: 50,
                tol: 1e-14,
            })
            .unwrap(),
    );

    let d_eig = eig.distance(&x, &y).unwrap();
    let d_db = db.distance(&x, &y).unwrap();

    assert_relative_eq!(d_eig, d_db, epsilon = 1e-8);
    assert!(d_eig > 0.0);
}

// =========================================================================
// TEST 3: Metric properties on a fixed family
// =========================================================================

fn family() -> Vec<Gaussian> {
    vec![
        Gaussian::standard(3).unwrap(),
        Gaussian::isotropic(arr1(&[1.0, 0.0, -1.0]), 2.0).unwrap(),
        Gaussian::diagonal(arr1(&[0.0, 2.0, 0.0]), &arr1(&[0.5, 1.0, 4.0])).unwrap(),
        Gaussian::new(
            arr1(&[-1.0, 0.5, 0.5]),
            arr2(&[[2.0, 0.3, 0.1], [0.3, 1.5, 0.2], [0.1, 0.2, 1.0]]),
        )
        .unwrap(),
    ]
}

#[test]
fn test_identity_symmetry_non_negativity() {
    let calc = FrechetDistance::new();
    let gs = family();

    for a in &gs {
        assert_relative_eq!(calc.distance(a, a).unwrap(), 0.0, epsilon = 1e-6);
        for b in &gs {
            let dab = calc.distance(a, b).unwrap();
            let dba = calc.distance(b, a).unwrap();
            assert!(dab >= 0.0);
            assert_relative_eq!(dab, dba, epsilon = 1e-8);
        }
    }
}

// =========================================================================
// TEST 4: Error surfaces
// =========================================================================

#[test]
fn test_dimension_mismatch_between_means() {
    let err = frechet_distance(
        (&arr1(&[0.0, 0.0]), &Array2::eye(2)),
        (&arr1(&[0.0, 0.0, 0.0]), &Array2::eye(3)),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::DimensionMismatch {
            operand: Operand::OtherGaussian,
            expected: 2,
            got: 3
        }
    ));
    assert!(err.to_string().contains("second gaussian"));
}

#[test]
fn test_dimension_mismatch_inside_gaussian() {
    let result: Result<Gaussian> = Gaussian::try_from((arr1(&[0.0f64, 0.0]), Array2::<f64>::eye(3)));
    assert!(matches!(
        result,
        Err(Error::DimensionMismatch {
            operand: Operand::CovarianceRows,
            expected: 2,
            got: 3
        })
    ));
}

#[test]
fn test_non_convergence_is_surfaced_not_nan() {
    let x = Gaussian::new(arr1(&[0.0, 0.0]), arr2(&[[0.0, 1.0], [0.0, 0.0]])).unwrap();
    let y = Gaussian::standard(2).unwrap();

    let eig = FrechetDistance::new().distance(&x, &y);
    assert!(matches!(eig, Err(Error::NonConvergence(_))));

    let db = FrechetDistance::new()
        .with_sqrt(DenmanBeavers::new())
        .distance(&x, &y);
    assert!(matches!(db, Err(Error::NonConvergence(_))));
}

#[test]
fn test_complex_result_is_surfaced() {
    let x = Gaussian::new(arr1(&[0.0]), arr2(&[[-1.0]])).unwrap();
    let y = Gaussian::new(arr1(&[0.0]), arr2(&[[1.0]])).unwrap();

    let err = FrechetDistance::new().distance(&x, &y).unwrap_err();
    assert!(matches!(err, Error::NegativeOrComplexResult { .. }));
}

#[test]
fn test_custom_residue_policy_is_used() {
    // d² = -1 + 4 - 2·2i = 3 - 4i
    let x = Gaussian::new(arr1(&[0.0]), arr2(&[[-1.0]])).unwrap();
    let y = Gaussian::new(arr1(&[0.0]), arr2(&[[4.0]])).unwrap();

    assert!(matches!(
        FrechetDistance::new().distance(&x, &y),
        Err(Error::NegativeOrComplexResult { .. })
    ));

    let lenient = ResiduePolicy::new(10.0, 10.0).unwrap();
    let d = FrechetDistance::new()
        .with_residue_policy(lenient)
        .distance(&x, &y)
        .unwrap();
    assert_relative_eq!(d, 3.0f64.sqrt(), epsilon = 1e-10);
}

#[test]
fn test_singular_covariance_with_shared_support() {
    // Rank-deficient but identical covariances: product is diagonalizable
    let sigma = arr2(&[[1.0, 0.0], [0.0, 0.0]]);
    let x = Gaussian::new(arr1(&[0.0, 0.0]), sigma.clone()).unwrap();
    let y = Gaussian::new(arr1(&[0.0, 2.0]), sigma).unwrap();

    let d = FrechetDistance::new().distance(&x, &y).unwrap();
    assert_relative_eq!(d, 2.0, epsilon = 1e-8);
}

// =========================================================================
// TEST 5: Rank-deficient sample covariances (n < d)
// =========================================================================

/// Sample mean and covariance of `n` standard normal draws in `d` dimensions
fn sample_moments(d: usize, n: usize, seed: u64) -> (Array1<f64>, Array2<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = Array2::from_shape_fn((n, d), |_| rng.sample::<f64, _>(StandardNormal));
    let mean = x.mean_axis(Axis(0)).unwrap();
    let centered = &x - &mean;
    let covariance = centered.t().dot(&centered) / (n - 1) as f64;
    (mean, covariance)
}

#[test]
fn test_rank_deficient_identity_free_function() {
    for &(d, n) in &[(16, 4), (32, 10), (64, 20)] {
        let (mu, sigma) = sample_moments(d, n, 100 + d as u64);
        let dist = frechet_distance((&mu, &sigma), (&mu, &sigma)).unwrap();
        assert!(dist < 1e-4, "d = {}, n = {}: d(G, G) = {}", d, n, dist);
    }
}

#[test]
fn test_rank_deficient_symmetry_free_function() {
    let (mu_x, sigma_x) = sample_moments(64, 20, 1);
    let (mu_y, sigma_y) = sample_moments(64, 20, 2);

    let dxy = frechet_distance((&mu_x, &sigma_x), (&mu_y, &sigma_y)).unwrap();
    let dyx = frechet_distance((&mu_y, &sigma_y), (&mu_x, &sigma_x)).unwrap();

    assert!(dxy > 0.0);
    assert_relative_eq!(dxy, dyx, max_relative = 1e-8);
}

#[test]
fn test_rank_deficient_gaussians() {
    let calc = FrechetDistance::new();
    let (mu_x, sigma_x) = sample_moments(24, 6, 3);
    let (mu_y, sigma_y) = sample_moments(24, 12, 4);
    let x = Gaussian::new(mu_x, sigma_x).unwrap();
    let y = Gaussian::new(mu_y, sigma_y).unwrap();

    assert!(calc.distance(&x, &x).unwrap() < 1e-4);
    assert!(calc.distance(&y, &y).unwrap() < 1e-4);

    let dxy = calc.distance(&x, &y).unwrap();
    let dyx = calc.distance(&y, &x).unwrap();
    assert_relative_eq!(dxy, dyx, max_relative = 1e-8);

    // Covariance term is a squared Bures distance, hence ≥ 0
    let diff = x.mean() - y.mean();
    let d2 = calc.distance_squared(&x, &y).unwrap();
    assert!(d2 >= diff.dot(&diff) - 1e-8);
}

#[test]
fn test_rank_deficient_against_full_rank() {
    // Shared mean, Σy = Σx + I: d² = tr Σx + tr(Σx + I) - 2 Σ √(λ(λ + 1))
    let (mu, sigma_x) = sample_moments(32, 8, 9);
    let sigma_y = &sigma_x + &Array2::<f64>::eye(32);

    let (eigenvalues, _) = sigma_x.eigh(UPLO::Lower).unwrap();
    let largest = eigenvalues.fold(0.0f64, |m, &l| m.max(l));
    let expected_sq: f64 = eigenvalues
        .iter()
        .map(|&l| {
            let l = if l < 1e-12 * largest { 0.0 } else { l };
            (l.sqrt() - (l + 1.0).sqrt()).powi(2)
        })
        .sum();

    let d = frechet_distance((&mu, &sigma_x), (&mu, &sigma_y)).unwrap();
    assert_relative_eq!(d * d, expected_sq, max_relative = 1e-6);
}
