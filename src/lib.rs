pub mod algorithms;
pub mod core;
pub mod linalg;

// Flat re-exports for convenience
pub use crate::core::{DistributionDistance, Error, Gaussian, MatrixSqrt, Operand, ResiduePolicy, Result};

// Re-export square root strategies
pub use crate::linalg::{Convergence, DenmanBeavers, EigenSqrt};

// Re-export distance types
pub use algorithms::frechet::{frechet_distance, FrechetDistance};

/// Convenience re-exports for common use cases
pub mod prelude {
    pub use crate::algorithms::frechet::{frechet_distance, FrechetDistance};
    pub use crate::core::{DistributionDistance, Error, Gaussian, MatrixSqrt, Operand, ResiduePolicy, Result};
    pub use crate::linalg::{Convergence, DenmanBeavers, EigenSqrt};
}
