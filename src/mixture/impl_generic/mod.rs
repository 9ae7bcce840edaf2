//! Generic mixture model implementations.

pub mod build;
pub mod host;
pub mod init;
pub mod score;
pub mod state;

use numr::algorithm::linalg::LinearAlgebraAlgorithms;
use numr::ops::{
    BinaryOps, IndexingOps, MatmulOps, RandomOps, ReduceOps, ScalarOps, ShapeOps,
    TypeConversionOps, UnaryOps, UtilityOps,
};
use numr::runtime::{Runtime, RuntimeClient};

pub use build::{build_distributions_impl, covariances_impl};
pub use init::gaussian_mixture_impl;
pub use score::{log_prob_impl, predict_impl, predict_proba_impl, score_impl};
pub use state::{
    from_snapshot_impl, load_state_dict_impl, to_dtype_impl, transfer_impl,
    update_parameters_impl,
};

/// Trait bounds needed for mixture models.
pub trait MixtureClient<R: Runtime>:
    IndexingOps<R>
    + ReduceOps<R>
    + ScalarOps<R>
    + BinaryOps<R>
    + TypeConversionOps<R>
    + UnaryOps<R>
    + RandomOps<R>
    + ShapeOps<R>
    + UtilityOps<R>
    + MatmulOps<R>
    + LinearAlgebraAlgorithms<R>
    + RuntimeClient<R>
{
}

impl<R, C> MixtureClient<R> for C
where
    R: Runtime,
    C: IndexingOps<R>
        + ReduceOps<R>
        + ScalarOps<R>
        + BinaryOps<R>
        + TypeConversionOps<R>
        + UnaryOps<R>
        + RandomOps<R>
        + ShapeOps<R>
        + UtilityOps<R>
        + MatmulOps<R>
        + LinearAlgebraAlgorithms<R>
        + RuntimeClient<R>,
{
}
