//! Host transfer helpers.
//!
//! Work with any Runtime backend; values travel as f64 on the host.

use numr::dtype::DType;
use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::mixture::error::{MixtureError, MixtureResult};

/// Copy a float tensor to the host as row-major f64 values.
pub fn download<R: Runtime>(t: &Tensor<R>) -> MixtureResult<Vec<f64>> {
    let t = t.contiguous();
    match t.dtype() {
        DType::F32 => {
            let data: Vec<f32> = t.to_vec();
            Ok(data.into_iter().map(f64::from).collect())
        }
        DType::F64 => Ok(t.to_vec()),
        dtype => Err(MixtureError::InvalidInput {
            context: format!("download: unsupported dtype {dtype:?}"),
        }),
    }
}

/// Create a tensor of precision `dtype` on `device` from f64 host values.
pub fn upload<R: Runtime>(
    data: &[f64],
    shape: &[usize],
    dtype: DType,
    device: &R::Device,
) -> MixtureResult<Tensor<R>> {
    match dtype {
        DType::F32 => {
            let narrowed: Vec<f32> = data.iter().map(|&v| v as f32).collect();
            Ok(Tensor::<R>::from_slice(&narrowed, shape, device))
        }
        DType::F64 => Ok(Tensor::<R>::from_slice(data, shape, device)),
        _ => Err(MixtureError::InvalidInput {
            context: format!("upload: unsupported dtype {dtype:?}"),
        }),
    }
}

/// Extract a scalar f64 from a 1-element tensor.
pub fn extract_scalar<R: Runtime>(t: &Tensor<R>) -> MixtureResult<f64> {
    if t.numel() != 1 {
        return Err(MixtureError::InvalidInput {
            context: format!("extract_scalar: expected 1 element, got {}", t.numel()),
        });
    }
    Ok(download(t)?[0])
}
