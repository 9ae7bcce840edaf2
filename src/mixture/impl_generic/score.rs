//! Mixture log-likelihood evaluation.

use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::mixture::error::{MixtureError, MixtureResult};
use crate::mixture::impl_generic::MixtureClient;
use crate::mixture::impl_generic::host::extract_scalar;
use crate::mixture::traits::distributions::{MixtureDistributions, MultivariateNormalBatch};
use crate::mixture::traits::gaussian_mixture::GaussianMixture;
use crate::mixture::validation::{validate_batch, validate_same_dtype};

/// log Σ exp(t) along `dim`, keeping the reduced dimension.
///
/// The maximum is subtracted before exponentiating.
pub fn logsumexp<R, C>(client: &C, t: &Tensor<R>, dim: usize) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let max = client.max(t, &[dim], true)?;
    let shifted = client.sub(t, &max.broadcast_to(t.shape())?)?;
    let sum_exp = client.sum(&client.exp(&shifted)?, &[dim], true)?;
    Ok(client.add(&client.log(&sum_exp)?, &max)?)
}

/// Component log-densities log N(x | μ_j, Σ_j) as [n, k].
pub fn component_log_prob<R, C>(
    client: &C,
    components: &MultivariateNormalBatch<R>,
    x: &Tensor<R>,
) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let n = x.shape()[0];
    let k = components.batch_size();
    let d = components.event_size();

    let mut log_prob_slices = Vec::with_capacity(k);
    for j in 0..k {
        let mean_j = components.loc.narrow(0, j, 1)?; // [1, d]
        let diff = client.sub(x, &mean_j.broadcast_to(&[n, d])?)?; // [n, d]
        let w_j = components
            .whitening
            .narrow(0, j, 1)?
            .contiguous()
            .reshape(&[d, d])?;
        let z = client.matmul(&diff, &w_j)?; // [n, d]
        let maha = client.sum(&client.mul(&z, &z)?, &[1], true)?; // [n, 1]
        log_prob_slices.push(client.mul_scalar(&maha, -0.5)?);
    }
    let refs: Vec<&Tensor<R>> = log_prob_slices.iter().collect();
    let maha_term = client.cat(&refs, 1)?; // [n, k]

    let normalizer = components.log_normalizer.unsqueeze(0)?.broadcast_to(&[n, k])?;
    Ok(client.add(&maha_term, &normalizer)?)
}

/// log N(x | μ_j, Σ_j) + log π_j as [n, k].
fn weighted_log_prob<R, C>(
    client: &C,
    model: &GaussianMixture<R>,
    x: &Tensor<R>,
    operation: &'static str,
) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let MixtureDistributions { mix, components } = model.distributions.as_ref().ok_or_else(|| {
        MixtureError::NotFitted {
            operation: operation.to_string(),
        }
    })?;
    validate_batch(x.shape(), model.n_features)?;
    validate_same_dtype(model.dtype(), x.dtype(), operation)?;

    let n = x.shape()[0];
    let k = model.n_components;
    let log_gauss = component_log_prob(client, components, x)?;
    let log_weights = mix.log_probs.unsqueeze(0)?.broadcast_to(&[n, k])?;
    Ok(client.add(&log_gauss, &log_weights)?)
}

/// Per-point mixture log-likelihood [n, 1].
pub fn log_prob_impl<R, C>(client: &C, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let weighted = weighted_log_prob(client, model, x, "gmm_log_prob")?;
    logsumexp(client, &weighted, 1)
}

/// Posterior component probabilities [n, k].
pub fn predict_proba_impl<R, C>(
    client: &C,
    model: &GaussianMixture<R>,
    x: &Tensor<R>,
) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let weighted = weighted_log_prob(client, model, x, "gmm_predict_proba")?;
    let lse = logsumexp(client, &weighted, 1)?; // [n, 1]
    let log_resp = client.sub(&weighted, &lse.broadcast_to(weighted.shape())?)?;
    Ok(client.exp(&log_resp)?)
}

/// Most likely component for each point [n] (I64).
pub fn predict_impl<R, C>(client: &C, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let weighted = weighted_log_prob(client, model, x, "gmm_predict")?;
    Ok(client.argmax(&weighted, 1, false)?)
}

/// Mean per-point log-likelihood.
pub fn score_impl<R, C>(client: &C, model: &GaussianMixture<R>, x: &Tensor<R>) -> MixtureResult<f64>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let log_prob = log_prob_impl(client, model, x)?;
    extract_scalar(&client.mean(&log_prob, &[0, 1], false)?)
}
