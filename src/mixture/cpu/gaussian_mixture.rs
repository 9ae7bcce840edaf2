//! CPU implementation of the Gaussian Mixture Model.

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
use numr::runtime::cpu::{CpuClient, CpuRuntime};
use numr::tensor::Tensor;

impl GaussianMixtureAlgorithms<CpuRuntime> for CpuClient {
    fn gaussian_mixture(
        &self,
        data: &Tensor<CpuRuntime>,
        options: &GaussianMixtureOptions,
    ) -> MixtureResult<GaussianMixture<CpuRuntime>> {
        gaussian_mixture_impl(self, data, options)
    }

    fn gmm_build_distributions(&self, model: &mut GaussianMixture<CpuRuntime>) -> MixtureResult<()> {
        build_distributions_impl(self, model)
    }

    fn gmm_update_parameters<F>(&self, model: &mut GaussianMixture<CpuRuntime>, update: F) -> MixtureResult<()>
    where
        F: FnOnce(&mut GmmParameters<CpuRuntime>) -> MixtureResult<()>,
    {
        update_parameters_impl(self, model, update)
    }

    fn gmm_log_prob(
        &self,
        model: &GaussianMixture<CpuRuntime>,
        x: &Tensor<CpuRuntime>,
    ) -> MixtureResult<Tensor<CpuRuntime>> {
        log_prob_impl(self, model, x)
    }

    fn gmm_predict_proba(
        &self,
        model: &GaussianMixture<CpuRuntime>,
        x: &Tensor<CpuRuntime>,
    ) -> MixtureResult<Tensor<CpuRuntime>> {
        predict_proba_impl(self, model, x)
    }

    fn gmm_predict(
        &self,
        model: &GaussianMixture<CpuRuntime>,
        x: &Tensor<CpuRuntime>,
    ) -> MixtureResult<Tensor<CpuRuntime>> {
        predict_impl(self, model, x)
    }

    fn gmm_score(&self, model: &GaussianMixture<CpuRuntime>, x: &Tensor<CpuRuntime>) -> MixtureResult<f64> {
        score_impl(self, model, x)
    }

    fn gmm_covariances(&self, model: &GaussianMixture<CpuRuntime>) -> MixtureResult<Tensor<CpuRuntime>> {
        covariances_impl(self, model)
    }

    fn gmm_load_state_dict(
        &self,
        model: &mut GaussianMixture<CpuRuntime>,
        state: ParameterMap<CpuRuntime>,
    ) -> MixtureResult<()> {
        load_state_dict_impl(self, model, state)
    }

    fn gmm_to_dtype(&self, model: &mut GaussianMixture<CpuRuntime>, dtype: DType) -> MixtureResult<()> {
        to_dtype_impl(self, model, dtype)
    }

    fn gmm_transfer<S: Runtime>(&self, model: &GaussianMixture<S>) -> MixtureResult<GaussianMixture<CpuRuntime>> {
        transfer_impl(self, model)
    }

    fn gmm_from_snapshot(
        &self,
        snapshot: &ParameterSnapshot,
        dtype: DType,
    ) -> MixtureResult<GaussianMixture<CpuRuntime>> {
        from_snapshot_impl(self, snapshot, dtype)
    }
}
