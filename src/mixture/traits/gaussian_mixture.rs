//! Gaussian Mixture Model trait and parameter store.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;
use serde::{Deserialize, Serialize};

use crate::mixture::error::{MixtureError, MixtureResult};
use crate::mixture::traits::distributions::{Categorical, MixtureDistributions, MultivariateNormalBatch};
use crate::mixture::traits::snapshot::ParameterSnapshot;

/// Key of the mixing logits in a [`ParameterMap`].
pub const MIXING_LOGITS: &str = "mixing_logits";
/// Key of the component means in a [`ParameterMap`].
pub const MEANS: &str = "means";
/// Key of the covariance representation in a [`ParameterMap`].
pub const COVARIANCE: &str = "covariance";

/// Persisted tensors keyed by name.
pub type ParameterMap<R> = BTreeMap<String, Tensor<R>>;

/// Covariance parameterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CovarianceType {
    /// Each component has its own full covariance matrix [k, d, d].
    #[default]
    #[serde(rename = "full")]
    Full,
    /// Per-dimension scales stored in log space [k, d].
    #[serde(rename = "diag")]
    Diagonal,
}

impl CovarianceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Diagonal => "diag",
        }
    }

    /// Shape of the covariance parameter for k components in d dimensions.
    pub fn parameter_shape(&self, k: usize, d: usize) -> Vec<usize> {
        match self {
            Self::Full => vec![k, d, d],
            Self::Diagonal => vec![k, d],
        }
    }
}

impl fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CovarianceType {
    type Err = MixtureError;

    fn from_str(s: &str) -> MixtureResult<Self> {
        match s {
            "full" => Ok(Self::Full),
            "diag" | "diagonal" => Ok(Self::Diagonal),
            other => Err(MixtureError::config(
                "covariance_type",
                format!("expected one of {{full, diag}}, got '{other}'"),
            )),
        }
    }
}

/// Options for constructing a Gaussian Mixture Model.
#[derive(Debug, Clone)]
pub struct GaussianMixtureOptions {
    /// Number of mixture components.
    pub n_components: usize,
    /// Covariance type.
    pub covariance_type: CovarianceType,
}

impl GaussianMixtureOptions {
    /// Options from a covariance type name ("full" or "diag").
    pub fn parse(n_components: usize, covariance_type: &str) -> MixtureResult<Self> {
        Ok(Self {
            n_components,
            covariance_type: covariance_type.parse()?,
        })
    }
}

impl Default for GaussianMixtureOptions {
    fn default() -> Self {
        Self {
            n_components: 1,
            covariance_type: CovarianceType::Full,
        }
    }
}

/// Learnable tensors of a mixture model.
#[derive(Debug, Clone)]
pub struct GmmParameters<R: Runtime> {
    /// Unnormalized mixing log-weights [k].
    pub mixing_logits: Tensor<R>,
    /// Component means [k, d].
    pub means: Tensor<R>,
    /// Full: covariance matrices [k, d, d]. Diagonal: log-scales [k, d].
    pub covariance: Tensor<R>,
}

impl<R: Runtime> GmmParameters<R> {
    /// Check every tensor against the fixed (k, d, covariance type).
    pub fn validate(&self, k: usize, d: usize, covariance_type: CovarianceType) -> MixtureResult<()> {
        let expected = [
            (MIXING_LOGITS, &self.mixing_logits, vec![k]),
            (MEANS, &self.means, vec![k, d]),
            (COVARIANCE, &self.covariance, covariance_type.parameter_shape(k, d)),
        ];
        for (name, tensor, shape) in expected {
            if tensor.shape() != shape.as_slice() {
                return Err(MixtureError::shape(name, &shape, tensor.shape()));
            }
        }
        Ok(())
    }

    /// Name-keyed view of the store.
    pub fn to_map(&self) -> ParameterMap<R> {
        let mut map = ParameterMap::new();
        map.insert(MIXING_LOGITS.to_string(), self.mixing_logits.clone());
        map.insert(MEANS.to_string(), self.means.clone());
        map.insert(COVARIANCE.to_string(), self.covariance.clone());
        map
    }

    /// Take the three tensors out of a mapping that holds exactly them.
    pub fn from_map(mut map: ParameterMap<R>) -> MixtureResult<Self> {
        let mut take = |name: &str| {
            map.remove(name).ok_or_else(|| MixtureError::InvalidStateDict {
                message: format!("missing parameter '{name}'"),
            })
        };
        let params = Self {
            mixing_logits: take(MIXING_LOGITS)?,
            means: take(MEANS)?,
            covariance: take(COVARIANCE)?,
        };
        if let Some(extra) = map.keys().next() {
            return Err(MixtureError::InvalidStateDict {
                message: format!("unexpected parameter '{extra}'"),
            });
        }
        Ok(params)
    }
}

/// Gaussian Mixture Model: parameter store plus the distributions derived from it.
///
/// The model is fitted exactly when the derived distributions are present.
/// Every client operation that changes the store rebuilds them before returning.
#[derive(Debug, Clone)]
pub struct GaussianMixture<R: Runtime> {
    pub(crate) n_components: usize,
    pub(crate) n_features: usize,
    pub(crate) covariance_type: CovarianceType,
    pub(crate) params: GmmParameters<R>,
    pub(crate) distributions: Option<MixtureDistributions<R>>,
}

impl<R: Runtime> GaussianMixture<R> {
    /// Wrap an existing parameter store without building distributions.
    ///
    /// The returned model is not fitted; build it through
    /// [`GaussianMixtureAlgorithms::gmm_build_distributions`] before scoring.
    pub fn from_parameters(covariance_type: CovarianceType, params: GmmParameters<R>) -> MixtureResult<Self> {
        let mean_shape = params.means.shape();
        if mean_shape.len() != 2 || mean_shape[0] == 0 || mean_shape[1] == 0 {
            return Err(MixtureError::config(
                MEANS,
                format!("expected non-empty [k, d] means, got {mean_shape:?}"),
            ));
        }
        let (k, d) = (mean_shape[0], mean_shape[1]);
        params.validate(k, d, covariance_type)?;
        Ok(Self {
            n_components: k,
            n_features: d,
            covariance_type,
            params,
            distributions: None,
        })
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn covariance_type(&self) -> CovarianceType {
        self.covariance_type
    }

    /// Numeric precision of the parameter store.
    pub fn dtype(&self) -> DType {
        self.params.means.dtype()
    }

    pub fn is_fitted(&self) -> bool {
        self.distributions.is_some()
    }

    pub fn parameters(&self) -> &GmmParameters<R> {
        &self.params
    }

    /// Mutable access to the store for an external optimizer step.
    ///
    /// Drops the derived distributions: the model stays unfitted until it is rebuilt.
    pub fn parameters_mut(&mut self) -> &mut GmmParameters<R> {
        self.distributions = None;
        &mut self.params
    }

    pub fn into_parameters(self) -> GmmParameters<R> {
        self.params
    }

    /// Mixing distribution, if fitted.
    pub fn mixture_distribution(&self) -> Option<&Categorical<R>> {
        self.distributions.as_ref().map(|dist| &dist.mix)
    }

    /// Component distributions, if fitted.
    pub fn component_distribution(&self) -> Option<&MultivariateNormalBatch<R>> {
        self.distributions.as_ref().map(|dist| &dist.components)
    }

    /// Persisted tensors keyed by name.
    pub fn state_dict(&self) -> ParameterMap<R> {
        self.params.to_map()
    }
}

/// Gaussian Mixture Model algorithms.
///
/// Operations that change the parameter store (`gmm_update_parameters`,
/// `gmm_load_state_dict`, `gmm_to_dtype`) validate and rebuild the
/// distributions as one step: on error the model is left as it was.
pub trait GaussianMixtureAlgorithms<R: Runtime> {
    /// Initialize a model from data [n, d] (n > k) and build its distributions.
    fn gaussian_mixture(
        &self,
        data: &Tensor<R>,
        options: &GaussianMixtureOptions,
    ) -> MixtureResult<GaussianMixture<R>>;

    /// Rebuild the derived distributions from the current store.
    ///
    /// On failure the model is left unfitted.
    fn gmm_build_distributions(&self, model: &mut GaussianMixture<R>) -> MixtureResult<()>;

    /// Apply `update` to a copy of the store, then validate, rebuild and commit.
    fn gmm_update_parameters<F>(&self, model: &mut GaussianMixture<R>, update: F) -> MixtureResult<()>
    where
        F: FnOnce(&mut GmmParameters<R>) -> MixtureResult<()>;

    /// Per-point mixture log-likelihood [n, 1].
    fn gmm_log_prob(&self, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<Tensor<R>>;

    /// Posterior component probabilities [n, k].
    fn gmm_predict_proba(&self, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<Tensor<R>>;

    /// Most likely component for each point [n].
    fn gmm_predict(&self, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<Tensor<R>>;

    /// Mean per-point log-likelihood.
    fn gmm_score(&self, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<f64>;

    /// Covariance matrices L Lᵀ [k, d, d] of the built components.
    fn gmm_covariances(&self, model: &GaussianMixture<R>) -> MixtureResult<Tensor<R>>;

    /// Replace the store with `state` (exact keys and shapes) and rebuild.
    fn gmm_load_state_dict(&self, model: &mut GaussianMixture<R>, state: ParameterMap<R>) -> MixtureResult<()>;

    /// Cast the store to `dtype` and rebuild.
    fn gmm_to_dtype(&self, model: &mut GaussianMixture<R>, dtype: DType) -> MixtureResult<()>;

    /// Copy a model from any runtime onto this client's device and rebuild.
    fn gmm_transfer<S: Runtime>(&self, model: &GaussianMixture<S>) -> MixtureResult<GaussianMixture<R>>;

    /// Upload a host snapshot as a model of precision `dtype` and build it.
    fn gmm_from_snapshot(&self, snapshot: &ParameterSnapshot, dtype: DType) -> MixtureResult<GaussianMixture<R>>;
}
