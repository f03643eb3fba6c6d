use ndarray::Array2;
use num_complex::Complex64;
use num_traits::Float;

use crate::core::error::{Error, Operand, Result};

/// Distance between two probability distributions of type `D`
#[must_use]
pub trait DistributionDistance<D> {
    /// Scalar field (f64 or f32)
    type Scalar: Float;

    /// Distance without input validation
    ///
    /// Assumes `x` and `y` are compatible. Numerical failures are still
    /// reported as errors.
    fn distance_unchecked(&self, x: &D, y: &D) -> Result<Self::Scalar>;

    /// Validate that `x` and `y` can be compared
    ///
    /// Default implementation is optimistic (always returns Ok).
    fn validate_pair(&self, _x: &D, _y: &D) -> Result<()> {
        Ok(())
    }

    /// Distance with validation
    fn distance(&self, x: &D, y: &D) -> Result<Self::Scalar> {
        self.validate_pair(x, y)?;
        self.distance_unchecked(x, y)
    }
}

/// Principal square root of a real square matrix
///
/// The result is complex: the product of two covariance matrices is not
/// symmetric in general, and its square root is only real in exact arithmetic.
pub trait MatrixSqrt {
    /// Compute S with S·S = A and eigenvalues of S in the closed right half-plane
    fn sqrtm(&self, a: &Array2<f64>) -> Result<Array2<Complex64>>;

    /// tr (A·B)^{1/2}
    ///
    /// Default forms the product and takes its principal square root.
    /// Implementations may use any route with the same trace.
    fn trace_sqrtm_product(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<Complex64> {
        if a.ncols() != b.nrows() {
            return Err(Error::DimensionMismatch {
                operand: Operand::ProductFactor,
                expected: a.ncols(),
                got: b.nrows(),
            });
        }
        Ok(self.sqrtm(&a.dot(b))?.diag().sum())
    }
}
