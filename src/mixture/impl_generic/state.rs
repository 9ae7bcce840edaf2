//! Parameter store mutation: updates, state loading, precision and device moves.
//!
//! Each operation builds the distributions for the new store before
//! committing it, so a failed operation leaves the model untouched.

use std::collections::BTreeMap;

use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::mixture::error::{MixtureError, MixtureResult};
use crate::mixture::impl_generic::MixtureClient;
use crate::mixture::impl_generic::build::{build_distributions_impl, build_from_parameters};
use crate::mixture::impl_generic::host::{download, upload};
use crate::mixture::traits::gaussian_mixture::{GaussianMixture, GmmParameters, ParameterMap};
use crate::mixture::traits::snapshot::{HostTensor, ParameterSnapshot};
use crate::mixture::validation::validate_float_dtype;

impl<R: Runtime> GaussianMixture<R> {
    /// Copy the parameter store to the host.
    pub fn snapshot(&self) -> MixtureResult<ParameterSnapshot> {
        let mut tensors = BTreeMap::new();
        for (name, tensor) in self.params.to_map() {
            let host = HostTensor::new(tensor.shape().to_vec(), download(&tensor)?);
            tensors.insert(name, host);
        }
        Ok(ParameterSnapshot {
            covariance_type: self.covariance_type,
            tensors,
        })
    }
}

/// Build distributions for `params` and swap both into the model.
fn commit<R, C>(client: &C, model: &mut GaussianMixture<R>, params: GmmParameters<R>) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let distributions = build_from_parameters(
        client,
        &params,
        model.n_components,
        model.n_features,
        model.covariance_type,
    )?;
    model.params = params;
    model.distributions = Some(distributions);
    Ok(())
}

/// Apply `update` to a copy of the store and commit it with rebuilt distributions.
pub fn update_parameters_impl<R, C, F>(
    client: &C,
    model: &mut GaussianMixture<R>,
    update: F,
) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
    F: FnOnce(&mut GmmParameters<R>) -> MixtureResult<()>,
{
    let mut candidate = model.params.clone();
    update(&mut candidate)?;
    commit(client, model, candidate)
}

/// Replace the store with a name-keyed mapping holding exactly the persisted tensors.
///
/// Loaded tensors are cast to the model's precision.
pub fn load_state_dict_impl<R, C>(
    client: &C,
    model: &mut GaussianMixture<R>,
    state: ParameterMap<R>,
) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let params = GmmParameters::from_map(state)?;
    params.validate(model.n_components, model.n_features, model.covariance_type)?;
    let params = cast_parameters(client, &params, model.dtype())?;
    commit(client, model, params)
}

/// Cast the store to `dtype` and rebuild.
pub fn to_dtype_impl<R, C>(client: &C, model: &mut GaussianMixture<R>, dtype: DType) -> MixtureResult<()>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    validate_float_dtype(dtype, "gmm_to_dtype")?;
    let params = cast_parameters(client, &model.params, dtype)?;
    commit(client, model, params)
}

fn cast_parameters<R, C>(client: &C, params: &GmmParameters<R>, dtype: DType) -> MixtureResult<GmmParameters<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let cast = |t: &Tensor<R>| -> MixtureResult<Tensor<R>> {
        validate_float_dtype(t.dtype(), "cast_parameters")?;
        if t.dtype() == dtype {
            Ok(t.clone())
        } else {
            Ok(client.cast(t, dtype)?)
        }
    };
    Ok(GmmParameters {
        mixing_logits: cast(&params.mixing_logits)?,
        means: cast(&params.means)?,
        covariance: cast(&params.covariance)?,
    })
}

/// Copy a model from runtime `S` onto the client's device, keeping its precision.
pub fn transfer_impl<S, R, C>(client: &C, model: &GaussianMixture<S>) -> MixtureResult<GaussianMixture<R>>
where
    S: Runtime,
    R: Runtime,
    C: MixtureClient<R>,
{
    let snapshot = model.snapshot()?;
    from_snapshot_impl(client, &snapshot, model.dtype())
}

/// Upload a host snapshot to the client's device and build the model.
pub fn from_snapshot_impl<R, C>(
    client: &C,
    snapshot: &ParameterSnapshot,
    dtype: DType,
) -> MixtureResult<GaussianMixture<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    validate_float_dtype(dtype, "gmm_from_snapshot")?;
    let device = client.device();

    let mut map = ParameterMap::new();
    for (name, host) in &snapshot.tensors {
        if host.numel() != host.data.len() {
            return Err(MixtureError::InvalidStateDict {
                message: format!(
                    "'{name}' has shape {:?} but {} values",
                    host.shape,
                    host.data.len()
                ),
            });
        }
        map.insert(name.clone(), upload(&host.data, &host.shape, dtype, device)?);
    }

    let params = GmmParameters::from_map(map)?;
    let mut model = GaussianMixture::from_parameters(snapshot.covariance_type, params)?;
    build_distributions_impl(client, &mut model)?;
    Ok(model)
}
