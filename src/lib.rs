//! mixr - Gaussian mixture densities on numr
//!
//! mixr models data density as a weighted sum of multivariate Gaussian
//! components and keeps the mixture's parameters valid (weights on the
//! simplex, positive-definite covariances) across parameter updates, state
//! loading, and precision or device moves. Built on numr's tensors, it works
//! across all backends (CPU, CUDA, WebGPU).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       mixr                              │
//! │  (parameter store, distribution builder, log-likelihood)│
//! └──────────────────────────┬──────────────────────────────┘
//!                            │ uses
//! ┌──────────────────────────▼──────────────────────────────┐
//! │                       numr                              │
//! │        (tensors, elementwise math, reductions, matmul)  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`mixture`] - Gaussian Mixture Model: initialization, distribution
//!   building, scoring, state loading and placement
//!
//! Fitting (EM, gradient descent) is left to the caller: update the
//! parameters through [`GaussianMixtureAlgorithms::gmm_update_parameters`] or
//! load them with [`GaussianMixtureAlgorithms::gmm_load_state_dict`].
//!
//! # Feature Flags
//!
//! | Feature | Description | Dependencies |
//! |---------|-------------|--------------|
//! | `cuda`  | Enable CUDA GPU acceleration | CUDA 12.x, numr/cuda |
//! | `wgpu`  | Enable WebGPU cross-platform GPU | numr/wgpu |
//!
//! ## Backend Limitations
//!
//! - **WebGPU**: Only supports F32 precision (no F64)
//!
//! # Example
//!
//! ```ignore
//! use mixr::mixture::{GaussianMixtureAlgorithms, GaussianMixtureOptions};
//! use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
//! use numr::tensor::Tensor;
//!
//! let device = CpuDevice::new();
//! let client = CpuClient::new(device.clone());
//!
//! let data = Tensor::<CpuRuntime>::from_slice(&[-5.0, -5.1, 5.0, 5.1], &[4, 1], &device);
//! let options = GaussianMixtureOptions::parse(2, "full")?;
//! let model = client.gaussian_mixture(&data, &options)?;
//!
//! // [n, 1] log-likelihoods
//! let log_prob = client.gmm_log_prob(&model, &data)?;
//! ```

pub mod mixture;

// Re-export main types for convenience
pub use mixture::{
    Categorical, CovarianceType, GaussianMixture, GaussianMixtureAlgorithms,
    GaussianMixtureOptions, GmmParameters, MixtureError, MixtureResult, MultivariateNormalBatch,
    ParameterMap, ParameterSnapshot,
};

// Re-export numr types that users will commonly need
pub use numr::dtype::DType;
pub use numr::runtime::{Runtime, RuntimeClient};
pub use numr::tensor::Tensor;
