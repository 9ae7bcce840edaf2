//! Derived probability distributions of a Gaussian mixture.
//!
//! These are rebuilt from the parameter store and never persisted.

use numr::runtime::Runtime;
use numr::tensor::Tensor;

/// Categorical distribution over the k mixture components.
#[derive(Debug, Clone)]
pub struct Categorical<R: Runtime> {
    /// Component probabilities [k], softmax of the mixing logits.
    pub(crate) probs: Tensor<R>,
    /// Normalized log-probabilities [k], log-softmax of the mixing logits.
    pub(crate) log_probs: Tensor<R>,
}

impl<R: Runtime> Categorical<R> {
    /// Component probabilities [k] (sum = 1).
    pub fn probs(&self) -> &Tensor<R> {
        &self.probs
    }

    /// Normalized log-probabilities [k].
    pub fn log_probs(&self) -> &Tensor<R> {
        &self.log_probs
    }

    /// Number of mixture components k.
    pub fn n_outcomes(&self) -> usize {
        self.probs.shape()[0]
    }
}

/// Batch of k multivariate normal distributions parameterized by their
/// lower-triangular scale factors, Σ_j = L_j L_jᵀ.
#[derive(Debug, Clone)]
pub struct MultivariateNormalBatch<R: Runtime> {
    /// Means [k, d].
    pub(crate) loc: Tensor<R>,
    /// Lower Cholesky factors L [k, d, d].
    pub(crate) scale_tril: Tensor<R>,
    /// Whitening matrices (L⁻¹)ᵀ [k, d, d]; `(x - μ) @ W` has identity covariance.
    pub(crate) whitening: Tensor<R>,
    /// Per-component -0.5 * (d ln 2π + ln|Σ|) [k].
    pub(crate) log_normalizer: Tensor<R>,
}

impl<R: Runtime> MultivariateNormalBatch<R> {
    /// Means [k, d].
    pub fn loc(&self) -> &Tensor<R> {
        &self.loc
    }

    /// Lower Cholesky factors of the covariances [k, d, d].
    pub fn scale_tril(&self) -> &Tensor<R> {
        &self.scale_tril
    }

    /// Log normalizing constant of each component [k].
    pub fn log_normalizer(&self) -> &Tensor<R> {
        &self.log_normalizer
    }

    /// Number of components k.
    pub fn batch_size(&self) -> usize {
        self.loc.shape()[0]
    }

    /// Dimensionality d.
    pub fn event_size(&self) -> usize {
        self.loc.shape()[1]
    }
}

/// Mixing and component distributions, present only on a fitted model.
#[derive(Debug, Clone)]
pub struct MixtureDistributions<R: Runtime> {
    pub mix: Categorical<R>,
    pub components: MultivariateNormalBatch<R>,
}
