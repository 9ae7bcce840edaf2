//! Initialization of a Gaussian mixture from data.
//!
//! Uniform mixing weights, means drawn from data rows, unit covariances.

use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::mixture::error::MixtureResult;
use crate::mixture::impl_generic::MixtureClient;
use crate::mixture::impl_generic::build::build_distributions_impl;
use crate::mixture::traits::gaussian_mixture::{
    CovarianceType, GaussianMixture, GaussianMixtureOptions, GmmParameters,
};
use crate::mixture::validation::{validate_data_2d, validate_float_dtype, validate_n_components};

/// Initialize a model from data [n, d] and build its distributions.
pub fn gaussian_mixture_impl<R, C>(
    client: &C,
    data: &Tensor<R>,
    options: &GaussianMixtureOptions,
) -> MixtureResult<GaussianMixture<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    validate_float_dtype(data.dtype(), "gaussian_mixture")?;
    validate_data_2d(data.shape(), "gaussian_mixture")?;
    validate_n_components(options.n_components, data.shape()[0], "gaussian_mixture")?;

    let params = initial_parameters(client, data, options.n_components, options.covariance_type)?;
    let mut model = GaussianMixture {
        n_components: options.n_components,
        n_features: data.shape()[1],
        covariance_type: options.covariance_type,
        params,
        distributions: None,
    };
    build_distributions_impl(client, &mut model)?;
    Ok(model)
}

/// Seed the parameter store for k components.
pub fn initial_parameters<R, C>(
    client: &C,
    data: &Tensor<R>,
    k: usize,
    covariance_type: CovarianceType,
) -> MixtureResult<GmmParameters<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let d = data.shape()[1];
    let dtype = data.dtype();
    let device = data.device();

    // Equal logits give softmax = 1/k for every component.
    let mixing_logits = Tensor::<R>::full_scalar(&[k], dtype, -(k as f64).ln(), device);

    let means = sample_rows(client, data, k)?;

    let covariance = match covariance_type {
        CovarianceType::Full => {
            let eye = client.eye(d, None, dtype)?; // [d, d]
            eye.unsqueeze(0)?.broadcast_to(&[k, d, d])?.contiguous()
        }
        // log-scale 0 is unit variance
        CovarianceType::Diagonal => Tensor::<R>::zeros(&[k, d], dtype, device),
    };

    Ok(GmmParameters {
        mixing_logits,
        means,
        covariance,
    })
}

/// Draw k rows uniformly with replacement: index = floor(u * n), u ~ U[0, 1).
fn sample_rows<R, C>(client: &C, data: &Tensor<R>, k: usize) -> MixtureResult<Tensor<R>>
where
    R: Runtime,
    C: MixtureClient<R>,
{
    let n = data.shape()[0];
    let dtype = data.dtype();
    let device = data.device();

    let u = client.rand(&[k], dtype)?;
    let scaled = client.floor(&client.mul_scalar(&u, n as f64)?)?;
    // f32 rounding can push u * n up to n
    let last = Tensor::<R>::full_scalar(&[k], dtype, (n - 1) as f64, device);
    let clamped = client.minimum(&scaled, &last)?;
    let indices = client.cast(&clamped, DType::I64)?;
    Ok(client.index_select(data, 0, &indices)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::impl_generic::host::download;
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn setup() -> (CpuClient, CpuDevice) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (client, device)
    }

    #[test]
    fn test_initial_means_are_data_rows() {
        let (client, device) = setup();
        #[rustfmt::skip]
        let rows = [
            0.0, 1.0,
            2.0, 3.0,
            4.0, 5.0,
            6.0, 7.0,
            8.0, 9.0,
        ];
        let data = Tensor::<CpuRuntime>::from_slice(&rows, &[5, 2], &device);

        for _ in 0..10 {
            let params = initial_parameters(&client, &data, 3, CovarianceType::Full).unwrap();
            assert_eq!(params.means.shape(), &[3, 2]);
            let means = download(&params.means).unwrap();
            for mean in means.chunks(2) {
                assert!(
                    rows.chunks(2).any(|row| row == mean),
                    "mean {mean:?} is not a data row"
                );
            }
        }
    }

    #[test]
    fn test_initial_covariances() {
        let (client, device) = setup();
        let data = Tensor::<CpuRuntime>::from_slice(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[3, 2], &device);

        let full = initial_parameters(&client, &data, 2, CovarianceType::Full).unwrap();
        assert_eq!(full.covariance.shape(), &[2, 2, 2]);
        assert_eq!(
            download(&full.covariance).unwrap(),
            vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]
        );

        let diag = initial_parameters(&client, &data, 2, CovarianceType::Diagonal).unwrap();
        assert_eq!(diag.covariance.shape(), &[2, 2]);
        assert_eq!(download(&diag.covariance).unwrap(), vec![0.0; 4]);

        let logits = download(&diag.mixing_logits).unwrap();
        assert!(logits.iter().all(|&l| l == logits[0]));
    }
}
