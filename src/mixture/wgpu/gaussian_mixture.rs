//! WebGPU implementation of the Gaussian Mixture Model.

use crate::mixture::error::MixtureResult;
use crate::mixture::impl_generic::{
    build_distributions_impl, covariances_impl, from_snapshot_impl, gaussian_mixture_impl,
    load_state_dict_impl, log_prob_impl, predict_impl, predict_proba_impl, score_impl,
    to_dtype_impl, transfer_impl, update_parameters_impl,
};
use crate::mixture::traits::gaussian_mixture::{
    GaussianMixture, GaussianMixtureAlgorithms, GaussianMixtureOptions, GmmParameters, ParameterMap,
};
use crate::mixture::traits::snapshot::ParameterSnapshot;
use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::runtime::wgpu::{WgpuClient, WgpuRuntime};
use numr::tensor::Tensor;

impl GaussianMixtureAlgorithms<WgpuRuntime> for WgpuClient {
    fn gaussian_mixture(
        &self,
        data: &Tensor<WgpuRuntime>,
        options: &GaussianMixtureOptions,
    ) -> MixtureResult<GaussianMixture<WgpuRuntime>> {
        gaussian_mixture_impl(self, data, options)
    }

    fn gmm_build_distributions(&self, model: &mut GaussianMixture<WgpuRuntime>) -> MixtureResult<()> {
        build_distributions_impl(self, model)
    }

    fn gmm_update_parameters<F>(&self, model: &mut GaussianMixture<WgpuRuntime>, update: F) -> MixtureResult<()>
    where
        F: FnOnce(&mut GmmParameters<WgpuRuntime>) -> MixtureResult<()>,
    {
        update_parameters_impl(self, model, update)
    }

    fn gmm_log_prob(
        &self,
        model: &GaussianMixture<WgpuRuntime>,
        x: &Tensor<WgpuRuntime>,
    ) -> MixtureResult<Tensor<WgpuRuntime>> {
        log_prob_impl(self, model, x)
    }

    fn gmm_predict_proba(
        &self,
        model: &GaussianMixture<WgpuRuntime>,
        x: &Tensor<WgpuRuntime>,
    ) -> MixtureResult<Tensor<WgpuRuntime>> {
        predict_proba_impl(self, model, x)
    }

    fn gmm_predict(
        &self,
        model: &GaussianMixture<WgpuRuntime>,
        x: &Tensor<WgpuRuntime>,
    ) -> MixtureResult<Tensor<WgpuRuntime>> {
        predict_impl(self, model, x)
    }

    fn gmm_score(&self, model: &GaussianMixture<WgpuRuntime>, x: &Tensor<WgpuRuntime>) -> MixtureResult<f64> {
        score_impl(self, model, x)
    }

    fn gmm_covariances(&self, model: &GaussianMixture<WgpuRuntime>) -> MixtureResult<Tensor<WgpuRuntime>> {
        covariances_impl(self, model)
    }

    fn gmm_load_state_dict(
        &self,
        model: &mut GaussianMixture<WgpuRuntime>,
        state: ParameterMap<WgpuRuntime>,
    ) -> MixtureResult<()> {
        load_state_dict_impl(self, model, state)
    }

    fn gmm_to_dtype(&self, model: &mut GaussianMixture<WgpuRuntime>, dtype: DType) -> MixtureResult<()> {
        to_dtype_impl(self, model, dtype)
    }

    fn gmm_transfer<S: Runtime>(&self, model: &GaussianMixture<S>) -> MixtureResult<GaussianMixture<WgpuRuntime>> {
        transfer_impl(self, model)
    }

    fn gmm_from_snapshot(
        &self,
        snapshot: &ParameterSnapshot,
        dtype: DType,
    ) -> MixtureResult<GaussianMixture<WgpuRuntime>> {
        from_snapshot_impl(self, snapshot, dtype)
    }
}
