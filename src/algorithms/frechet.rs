use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::core::{DistributionDistance, Gaussian, MatrixSqrt, ResiduePolicy, Result};
use crate::linalg::EigenSqrt;

/// Fréchet (2-Wasserstein) distance between multivariate Gaussians
///
/// d²(N(μx, Σx), N(μy, Σy)) = ||μx - μy||² + tr(Σx + Σy - 2 (Σx Σy)^{1/2})
///
/// See Dowson & Landau (1982), "The Fréchet distance between multivariate
/// normal distributions", J. Multivariate Anal. 12(3).
///
/// The trace of (Σx Σy)^{1/2} comes from [`MatrixSqrt::trace_sqrtm_product`]
/// in complex arithmetic. The complex d² is turned into a real number by the
/// configured [`ResiduePolicy`] before the final square root.
#[derive(Debug, Clone)]
pub struct FrechetDistance<S: MatrixSqrt = EigenSqrt> {
    /// Matrix square root strategy
    pub sqrt: S,
    /// Handling of imaginary and negative residue in d²
    pub residue: ResiduePolicy,
}

impl Default for FrechetDistance<EigenSqrt> {
    fn default() -> Self {
        Self {
            sqrt: EigenSqrt::default(),
            residue: ResiduePolicy::default(),
        }
    }
}

impl FrechetDistance<EigenSqrt> {
    /// Create a calculator with the eigen-decomposition square root
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: MatrixSqrt> FrechetDistance<S> {
    /// Swap the matrix square root strategy
    pub fn with_sqrt<T: MatrixSqrt>(self, sqrt: T) -> FrechetDistance<T> {
        FrechetDistance {
            sqrt,
            residue: self.residue,
        }
    }

    /// Set the residue policy
    pub fn with_residue_policy(mut self, residue: ResiduePolicy) -> Self {
        self.residue = residue;
        self
    }

    /// d² before any residue handling
    ///
    /// The value is complex; for valid input its imaginary part is rounding
    /// noise from the matrix square root.
    pub fn raw_distance_squared(&self, x: &Gaussian, y: &Gaussian) -> Result<Complex64> {
        self.validate_pair(x, y)?;
        Ok(self.squared_with_reference(x, y)?.0)
    }

    /// d² after the residue policy, always ≥ 0
    pub fn distance_squared(&self, x: &Gaussian, y: &Gaussian) -> Result<f64> {
        self.validate_pair(x, y)?;
        self.resolved_squared(x, y)
    }

    fn resolved_squared(&self, x: &Gaussian, y: &Gaussian) -> Result<f64> {
        let (d2, reference) = self.squared_with_reference(x, y)?;
        self.residue.resolve(d2, reference)
    }

    /// Complex d² and its magnitude reference ||Δμ||² + tr Σx + tr Σy
    fn squared_with_reference(&self, x: &Gaussian, y: &Gaussian) -> Result<(Complex64, f64)> {
        let mean_diff = x.mean() - y.mean();
        let mean_term = mean_diff.dot(&mean_diff);

        let trace_sqrt = self
            .sqrt
            .trace_sqrtm_product(x.covariance(), y.covariance())?;
        let trace_sum = x.covariance().diag().sum() + y.covariance().diag().sum();
        let trace_term = Complex64::new(trace_sum, 0.0) - trace_sqrt * 2.0;

        let d2 = Complex64::new(mean_term, 0.0) + trace_term;
        let reference = mean_term + trace_sum;

        tracing::debug!(
            dim = x.dim(),
            mean_term,
            trace_re = trace_term.re,
            trace_im = trace_term.im,
            "frechet distance squared"
        );

        Ok((d2, reference))
    }
}

impl<S: MatrixSqrt> DistributionDistance<Gaussian> for FrechetDistance<S> {
    type Scalar = f64;

    fn distance_unchecked(&self, x: &Gaussian, y: &Gaussian) -> Result<f64> {
        Ok(self.resolved_squared(x, y)?.sqrt())
    }

    fn validate_pair(&self, x: &Gaussian, y: &Gaussian) -> Result<()> {
        x.check_same_dim(y)
    }
}

/// Fréchet distance between `(μx, Σx)` and `(μy, Σy)` with default settings
///
/// Fails with `DimensionMismatch` unless all four inputs share one dimension.
pub fn frechet_distance(
    gauss_x: (&Array1<f64>, &Array2<f64>),
    gauss_y: (&Array1<f64>, &Array2<f64>),
) -> Result<f64> {
    let x = Gaussian::new(gauss_x.0.to_owned(), gauss_x.1.to_owned())?;
    let y = Gaussian::new(gauss_y.0.to_owned(), gauss_y.1.to_owned())?;
    FrechetDistance::new().distance(&x, &y)
}
