//! CUDA implementations of mixture model algorithms.

mod gaussian_mixture;
