//! Mixture model traits and types.

pub mod distributions;
pub mod gaussian_mixture;
pub mod snapshot;
