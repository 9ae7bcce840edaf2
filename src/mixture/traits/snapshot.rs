//! Host-side copy of the persisted parameters.
//!
//! How a snapshot reaches storage is up to the caller; the types only derive
//! serde so any serde format can carry them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mixture::traits::gaussian_mixture::CovarianceType;

/// Dense row-major tensor values pulled back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl HostTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Self {
        Self { shape, data }
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Runtime-independent copy of a model's parameter store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub covariance_type: CovarianceType,
    /// Keyed by the same names as [`ParameterMap`](super::gaussian_mixture::ParameterMap).
    pub tensors: BTreeMap<String, HostTensor>,
}
