pub mod error;
pub mod gaussian;
pub mod residue;
pub mod traits;

pub use error::{Error, Operand, Result};
pub use gaussian::Gaussian;
pub use residue::ResiduePolicy;
pub use traits::{DistributionDistance, MatrixSqrt};
