//! Construction of the mixing and component distributions from the parameter store.
//!
//! Full covariances are factorized per component with numr's Cholesky;
//! diagonal log-scales are exponentiated and used as the factor directly.

use numr::algorithm::linalg::LinearAlgebraAlgorithms;
use numr::error::Error;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::mixture::error::{MixtureError, MixtureResult};
use crate::mixture::impl_generic::MixtureClient;
use crate::mixture::impl_generic::host::{download, extract_scalar};
use crate::mixture::impl_generic::score::logsumexp;
use crate::mixture::traits::distributions::{
    Categorical, MixtureDistributions, MultivariateNormalBatch,
};
use crate::mixture::traits::gaussian_mixture::{
    CovarianceType, GaussianMixture, GmmParameters, COVARIANCE, MEANS, MIXING_LOGITS,
};
use crate::mixture::validation::validate_float_dtype;

const SYMMETRY_ATOL: f64 = 1e-6;
const SYMMETRY_RTOL: f64 = 1e-5;

/// Rebuild the model's distributions; the model is unfitted if this fails.
pub fn build_distributions_impl<R, C>(client: &C, model: &mut GaussianMixture<R>) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    model.distributions = None;
    let distributions = build_from_parameters(
        client,
        &model.params,
        model.n_components,
        model.n_features,
        model.covariance_type,
    )?;
    model.distributions = Some(distributions);
    Ok(())
}

/// Build both distributions from a parameter store of shape (k, d, covariance_type).
pub fn build_from_parameters<R, C>(
    client: &C,
    params: &GmmParameters<R>,
    k: usize,
    d: usize,
    covariance_type: CovarianceType,
) -> MixtureResult<MixtureDistributions<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    params.validate(k, d, covariance_type)?;
    let dtype = params.means.dtype();
    validate_float_dtype(dtype, "build_distributions")?;
    for (name, tensor) in [
        (MIXING_LOGITS, &params.mixing_logits),
        (COVARIANCE, &params.covariance),
    ] {
        if tensor.dtype() != dtype {
            return Err(MixtureError::InvalidInput {
                context: format!(
                    "build_distributions: '{name}' is {:?} but '{MEANS}' is {dtype:?}",
                    tensor.dtype()
                ),
            });
        }
    }
    for (name, tensor) in [
        (MIXING_LOGITS, &params.mixing_logits),
        (MEANS, &params.means),
        (COVARIANCE, &params.covariance),
    ] {
        check_finite(client, tensor, name)?;
    }

    let mix = build_categorical(client, &params.mixing_logits)?;
    let components = match covariance_type {
        CovarianceType::Full => build_full(client, params, k, d)?,
        CovarianceType::Diagonal => build_diagonal(client, params, k, d)?,
    };
    Ok(MixtureDistributions { mix, components })
}

/// Categorical over k outcomes with probabilities softmax(logits).
fn build_categorical<R, C>(client: &C, logits: &Tensor<R>) -> MixtureResult<Categorical<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let k = logits.shape()[0];
    let lse = logsumexp(client, logits, 0)?; // [1]
    let log_probs = client.sub(logits, &lse.broadcast_to(&[k])?)?;
    let probs = client.exp(&log_probs)?;
    Ok(Categorical { probs, log_probs })
}

/// Fail with `NumericalError` if `t` holds a NaN or an infinity.
fn check_finite<R, C>(client: &C, t: &Tensor<R>, name: &str) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    // x * 0 is NaN exactly when x is not finite
    let zeroed = client.mul_scalar(t, 0.0)?.contiguous().reshape(&[t.numel()])?;
    let total = extract_scalar(&client.sum(&zeroed, &[0], true)?)?;
    if !total.is_finite() {
        return Err(MixtureError::NumericalError {
            message: format!("'{name}' contains non-finite values"),
        });
    }
    Ok(())
}

/// Fail with `NumericalError` naming the first component whose covariance
/// is not symmetric within `SYMMETRY_ATOL + SYMMETRY_RTOL * |Σᵀ|`.
fn check_symmetric<R, C>(client: &C, covariance: &Tensor<R>) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let transposed = covariance.transpose(1, 2)?.contiguous(); // [k, d, d]
    let gap = client.abs(&client.sub(covariance, &transposed)?)?;
    let tolerance = client.add_scalar(
        &client.mul_scalar(&client.abs(&transposed)?, SYMMETRY_RTOL)?,
        SYMMETRY_ATOL,
    )?;
    let excess = client.max(&client.sub(&gap, &tolerance)?, &[1, 2], false)?; // [k]
    if let Some(j) = download(&excess)?.iter().position(|&e| e > 0.0) {
        return Err(MixtureError::NumericalError {
            message: format!("covariance of component {j} is not symmetric"),
        });
    }
    Ok(())
}

fn build_full<R, C>(
    client: &C,
    params: &GmmParameters<R>,
    k: usize,
    d: usize,
) -> MixtureResult<MultivariateNormalBatch<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let covariance = &params.covariance; // [k, d, d]
    check_symmetric(client, covariance)?;
    let eye = client.eye(d, None, covariance.dtype())?;

    let mut tril_slices = Vec::with_capacity(k);
    let mut whitening_slices = Vec::with_capacity(k);
    let mut log_det_slices = Vec::with_capacity(k);
    for j in 0..k {
        let cov_j = covariance.narrow(0, j, 1)?.contiguous().reshape(&[d, d])?;
        let l_j = LinearAlgebraAlgorithms::cholesky_decompose(client, &cov_j)
            .map_err(|e| match e {
                Error::Internal(reason) => MixtureError::NumericalError {
                    message: format!(
                        "covariance of component {j} is not positive-definite: {reason}"
                    ),
                },
                other => MixtureError::from(other),
            })?
            .l;

        // W = (L⁻¹)ᵀ, so ‖(x - μ) W‖² is the Mahalanobis distance
        let l_inv = LinearAlgebraAlgorithms::solve_triangular_lower(client, &l_j, &eye, false)?;
        let w_j = l_inv.transpose(0, 1)?.contiguous();

        // ln|Σ| = 2 Σ_i ln L_ii
        let diag = LinearAlgebraAlgorithms::diag(client, &l_j)?;
        let log_det_j = client.sum(&client.log(&diag)?, &[0], true)?; // [1]

        tril_slices.push(l_j.unsqueeze(0)?);
        whitening_slices.push(w_j.unsqueeze(0)?);
        log_det_slices.push(client.mul_scalar(&log_det_j, 2.0)?);
    }
    let tril_refs: Vec<&Tensor<R>> = tril_slices.iter().collect();
    let whitening_refs: Vec<&Tensor<R>> = whitening_slices.iter().collect();
    let log_det_refs: Vec<&Tensor<R>> = log_det_slices.iter().collect();
    let log_det = client.cat(&log_det_refs, 0)?; // [k]

    Ok(MultivariateNormalBatch {
        loc: params.means.clone(),
        scale_tril: client.cat(&tril_refs, 0)?,
        whitening: client.cat(&whitening_refs, 0)?,
        log_normalizer: log_normalizer(client, &log_det, d)?,
    })
}

fn build_diagonal<R, C>(
    client: &C,
    params: &GmmParameters<R>,
    k: usize,
    d: usize,
) -> MixtureResult<MultivariateNormalBatch<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let log_scale = &params.covariance; // [k, d]
    let scale = client.exp(log_scale)?;
    let inv_scale = client.exp(&client.neg(log_scale)?)?;

    let mut tril_slices = Vec::with_capacity(k);
    let mut whitening_slices = Vec::with_capacity(k);
    for j in 0..k {
        let scale_j = scale.narrow(0, j, 1)?.contiguous().reshape(&[d])?;
        let inv_j = inv_scale.narrow(0, j, 1)?.contiguous().reshape(&[d])?;
        let tril_j = LinearAlgebraAlgorithms::diagflat(client, &scale_j)?; // [d, d]
        let whitening_j = LinearAlgebraAlgorithms::diagflat(client, &inv_j)?;
        tril_slices.push(tril_j.unsqueeze(0)?);
        whitening_slices.push(whitening_j.unsqueeze(0)?);
    }
    let tril_refs: Vec<&Tensor<R>> = tril_slices.iter().collect();
    let whitening_refs: Vec<&Tensor<R>> = whitening_slices.iter().collect();

    // ln|Σ| = 2 Σ_i θ_i
    let log_det = client.mul_scalar(&client.sum(log_scale, &[1], false)?, 2.0)?; // [k]

    Ok(MultivariateNormalBatch {
        loc: params.means.clone(),
        scale_tril: client.cat(&tril_refs, 0)?,
        whitening: client.cat(&whitening_refs, 0)?,
        log_normalizer: log_normalizer(client, &log_det, d)?,
    })
}

/// -0.5 * (d ln 2π + ln|Σ|) per component.
fn log_normalizer<R, C>(client: &C, log_det: &Tensor<R>, d: usize) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let log_2pi = (2.0 * std::f64::consts::PI).ln();
    let half_log_det = client.mul_scalar(log_det, -0.5)?;
    Ok(client.add_scalar(&half_log_det, -0.5 * d as f64 * log_2pi)?)
}

/// Covariance matrices L Lᵀ [k, d, d] of a fitted model.
pub fn covariances_impl<R, C>(client: &C, model: &GaussianMixture<R>) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let components = model
        .component_distribution()
        .ok_or_else(|| MixtureError::NotFitted {
            operation: "gmm_covariances".to_string(),
        })?;
    let (k, d) = (model.n_components, model.n_features);

    let mut cov_slices = Vec::with_capacity(k);
    for j in 0..k {
        let l_j = components
            .scale_tril
            .narrow(0, j, 1)?
            .contiguous()
            .reshape(&[d, d])?;
        let cov_j = client.matmul(&l_j, &l_j.transpose(0, 1)?)?;
        cov_slices.push(cov_j.unsqueeze(0)?);
    }
    let refs: Vec<&Tensor<R>> = cov_slices.iter().collect();
    Ok(client.cat(&refs, 0)?)
}
