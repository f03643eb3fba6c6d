pub mod sqrtm;

pub use sqrtm::{complexify, trace, Convergence, DenmanBeavers, EigenSqrt};
