use ndarray::{Array1, Array2};
use ndarray_linalg::{Eigh, UPLO};

use crate::core::error::{Error, Operand, Result};

/// Summary of a multivariate Gaussian N(μ, Σ)
///
/// Holds a mean μ ∈ R^d and a covariance Σ ∈ R^{d×d}. Construction only checks
/// shapes; symmetry and positive semi-definiteness are the caller's
/// responsibility (see [`Gaussian::is_valid_covariance`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Gaussian {
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

impl Gaussian {
    /// Create N(mean, covariance), checking that the covariance is d × d
    pub fn new(mean: Array1<f64>, covariance: Array2<f64>) -> Result<Self> {
        let d = mean.len();
        if d == 0 {
            return Err(Error::InvalidParameter(
                "gaussian must have at least one dimension".to_string(),
            ));
        }
        if covariance.nrows() != d {
            return Err(Error::DimensionMismatch {
                operand: Operand::CovarianceRows,
                expected: d,
                got: covariance.nrows(),
            });
        }
        if covariance.ncols() != d {
            return Err(Error::DimensionMismatch {
                operand: Operand::CovarianceCols,
                expected: d,
                got: covariance.ncols(),
            });
        }
        Ok(Gaussian { mean, covariance })
    }

    /// Standard normal N(0, I_d)
    pub fn standard(dim: usize) -> Result<Self> {
        Self::new(Array1::zeros(dim), Array2::eye(dim))
    }

    /// N(μ, σ² I)
    pub fn isotropic(mean: Array1<f64>, variance: f64) -> Result<Self> {
        let d = mean.len();
        Self::new(mean, Array2::eye(d) * variance)
    }

    /// N(μ, diag(σ₁², ..., σ_d²))
    pub fn diagonal(mean: Array1<f64>, variances: &Array1<f64>) -> Result<Self> {
        if variances.len() != mean.len() {
            return Err(Error::DimensionMismatch {
                operand: Operand::Variances,
                expected: mean.len(),
                got: variances.len(),
            });
        }
        Self::new(mean, Array2::from_diag(variances))
    }

    /// Mean vector μ
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Covariance matrix Σ
    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    /// Dimension d of the underlying space
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Fail fast unless `other` lives in the same dimension
    pub fn check_same_dim(&self, other: &Gaussian) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::DimensionMismatch {
                operand: Operand::OtherGaussian,
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(())
    }

    /// Check that the covariance is symmetric positive semi-definite
    ///
    /// Eigenvalues down to `-tolerance` are accepted as rounding noise.
    pub fn is_valid_covariance(&self, tolerance: f64) -> bool {
        let d = self.dim();
        for i in 0..d {
            for j in i + 1..d {
                if (self.covariance[[i, j]] - self.covariance[[j, i]]).abs() > tolerance {
                    return false;
                }
            }
        }

        match self.covariance.eigh(UPLO::Lower) {
            Ok((eigenvalues, _)) => eigenvalues.iter().all(|&lambda| lambda >= -tolerance),
            Err(_) => false,
        }
    }
}

impl TryFrom<(Array1<f64>, Array2<f64>)> for Gaussian {
    type Error = Error;

    fn try_from((mean, covariance): (Array1<f64>, Array2<f64>)) -> Result<Self> {
        Gaussian::new(mean, covariance)
    }
}
