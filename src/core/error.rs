use std::fmt;

use thiserror::Error;

/// Input whose dimension disagreed with the expected one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Rows of a covariance matrix vs. the mean length
    CovarianceRows,
    /// Columns of a covariance matrix vs. the mean length
    CovarianceCols,
    /// Variance vector of a diagonal covariance vs. the mean length
    Variances,
    /// Second Gaussian of a pair vs. the first
    OtherGaussian,
    /// Columns of a matrix that must be square
    SquareMatrix,
    /// Second factor of a matrix product vs. the first
    ProductFactor,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operand::CovarianceRows => "covariance rows",
            Operand::CovarianceCols => "covariance columns",
            Operand::Variances => "variances",
            Operand::OtherGaussian => "second gaussian",
            Operand::SquareMatrix => "square matrix",
            Operand::ProductFactor => "product factor",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while computing distances between Gaussians
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// Means and covariances do not share one dimension
    #[error("dimension mismatch in {operand}: expected {expected}, got {got}")]
    DimensionMismatch {
        operand: Operand,
        expected: usize,
        got: usize,
    },

    /// Matrix square root failed (singular, defective or non-convergent input)
    #[error("matrix square root did not converge: {0}")]
    NonConvergence(String),

    /// Squared distance carries a non-negligible imaginary part or negative value
    #[error("squared distance is not a non-negative real: {real} + {imag}i")]
    NegativeOrComplexResult { real: f64, imag: f64 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical error from ndarray-linalg
    #[error("linear algebra error: {0}")]
    LinalgError(String),
}

/// Convert ndarray-linalg errors to Error
impl From<ndarray_linalg::error::LinalgError> for Error {
    fn from(err: ndarray_linalg::error::LinalgError) -> Self {
        Error::LinalgError(format!("{:?}", err))
    }
}

/// Result type for distance computations
pub type Result<T> = std::result::Result<T, Error>;
