use num_complex::Complex64;

use crate::core::error::{Error, Result};

/// Policy for turning a complex squared distance into a non-negative real
///
/// The matrix square root is computed in complex arithmetic, so d² comes out
/// as a `Complex64` whose imaginary part and negative real part are rounding
/// residue for valid input. Both tolerances are relative to a caller-supplied
/// magnitude scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResiduePolicy {
    /// Largest accepted |Im d²| relative to the scale
    pub imaginary_tol: f64,
    /// Largest accepted negative Re d² relative to the scale
    pub negative_tol: f64,
}

impl Default for ResiduePolicy {
    fn default() -> Self {
        Self {
            imaginary_tol: 1e-6,
            negative_tol: 1e-6,
        }
    }
}

impl ResiduePolicy {
    pub fn new(imaginary_tol: f64, negative_tol: f64) -> Result<Self> {
        if !(imaginary_tol >= 0.0 && negative_tol >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "residue tolerances must be non-negative, got {} and {}",
                imaginary_tol, negative_tol
            )));
        }
        Ok(Self {
            imaginary_tol,
            negative_tol,
        })
    }

    /// Accept no residue at all
    pub fn strict() -> Self {
        Self {
            imaginary_tol: 0.0,
            negative_tol: 0.0,
        }
    }

    /// Resolve `value` to a real number ≥ 0
    ///
    /// `reference` is the natural magnitude of the quantity (for d², the sum
    /// of the squared mean gap and both covariance traces). Errors with
    /// `NegativeOrComplexResult` when the residue exceeds the tolerances.
    pub fn resolve(&self, value: Complex64, reference: f64) -> Result<f64> {
        if !value.re.is_finite() || !value.im.is_finite() {
            return Err(Error::NegativeOrComplexResult {
                real: value.re,
                imag: value.im,
            });
        }

        let scale = value.re.abs().max(reference.abs()).max(f64::MIN_POSITIVE);

        if value.im.abs() > self.imaginary_tol * scale {
            tracing::warn!(
                real = value.re,
                imag = value.im,
                scale,
                "imaginary part of squared distance exceeds tolerance"
            );
            return Err(Error::NegativeOrComplexResult {
                real: value.re,
                imag: value.im,
            });
        }

        if value.re < -self.negative_tol * scale {
            tracing::warn!(
                real = value.re,
                imag = value.im,
                scale,
                "squared distance is negative beyond tolerance"
            );
            return Err(Error::NegativeOrComplexResult {
                real: value.re,
                imag: value.im,
            });
        }

        if value.im != 0.0 || value.re < 0.0 {
            tracing::debug!(
                real = value.re,
                imag = value.im,
                "discarding numerical residue of squared distance"
            );
        }

        Ok(value.re.max(0.0))
    }
}
