//! Gaussian mixture densities.
//!
//! A [`GaussianMixture`] holds the learnable mixing logits, means and
//! covariance representation, plus the categorical and multivariate-normal
//! distributions derived from them. Scoring uses the derived distributions
//! only, so every operation that changes the store rebuilds them before
//! returning. Full backend support (CPU, CUDA, WebGPU).

mod cpu;
pub mod error;
pub mod impl_generic;
pub mod traits;
mod validation;

#[cfg(feature = "cuda")]
mod cuda;
#[cfg(feature = "wgpu")]
mod wgpu;

pub use error::{MixtureError, MixtureResult};
pub use traits::distributions::{Categorical, MixtureDistributions, MultivariateNormalBatch};
pub use traits::gaussian_mixture::{
    COVARIANCE, CovarianceType, GaussianMixture, GaussianMixtureAlgorithms,
    GaussianMixtureOptions, GmmParameters, MEANS, MIXING_LOGITS, ParameterMap,
};
pub use traits::snapshot::{HostTensor, ParameterSnapshot};
pub use validation::*;
