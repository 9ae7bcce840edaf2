//! Error types for mixture model operations.

use std::fmt;

/// Result type for mixture model operations.
pub type MixtureResult<T> = Result<T, MixtureError>;

/// Errors that can occur while building or evaluating a mixture model.
#[derive(Debug, Clone)]
pub enum MixtureError {
    /// Constructor arguments violate the model's preconditions.
    InvalidConfiguration { parameter: String, message: String },

    /// Evaluation attempted before the distributions were built.
    NotFitted { operation: String },

    /// A covariance matrix is not symmetric positive-definite.
    NumericalError { message: String },

    /// A tensor disagrees with the model's fixed (k, d, covariance type).
    ShapeMismatch {
        parameter: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A parameter mapping is missing entries or carries unknown ones.
    InvalidStateDict { message: String },

    /// Input tensor has an unusable dtype.
    InvalidInput { context: String },

    /// Error from underlying numr operation.
    NumrError(String),
}

impl MixtureError {
    pub(crate) fn config(parameter: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn shape(parameter: &str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            parameter: parameter.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

impl fmt::Display for MixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { parameter, message } => {
                write!(f, "Invalid configuration '{}': {}", parameter, message)
            }
            Self::NotFitted { operation } => {
                write!(
                    f,
                    "{} requires built distributions; the model is not fitted",
                    operation
                )
            }
            Self::NumericalError { message } => {
                write!(f, "Numerical error: {}", message)
            }
            Self::ShapeMismatch {
                parameter,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Shape mismatch for '{}': expected {:?}, got {:?}",
                    parameter, expected, actual
                )
            }
            Self::InvalidStateDict { message } => {
                write!(f, "Invalid parameter mapping: {}", message)
            }
            Self::InvalidInput { context } => {
                write!(f, "Invalid input in {}", context)
            }
            Self::NumrError(msg) => {
                write!(f, "numr error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MixtureError {}

impl From<numr::error::Error> for MixtureError {
    fn from(err: numr::error::Error) -> Self {
        Self::NumrError(err.to_string())
    }
}
