pub mod frechet;

pub use frechet::{frechet_distance, FrechetDistance};
