//! Validation helpers for mixture models.

use crate::mixture::error::{MixtureError, MixtureResult};
use numr::dtype::DType;

/// Validate tensor dtype (must be F32 or F64).
pub fn validate_float_dtype(dtype: DType, op: &'static str) -> MixtureResult<()> {
    match dtype {
        DType::F32 | DType::F64 => Ok(()),
        _ => Err(MixtureError::InvalidInput {
            context: format!("{op}: expected F32 or F64, got {dtype:?}"),
        }),
    }
}

/// Validate that initializing data is 2D [n, d] with d >= 1.
pub fn validate_data_2d(shape: &[usize], op: &'static str) -> MixtureResult<()> {
    if shape.len() != 2 {
        return Err(MixtureError::config(
            "data",
            format!("{op} requires 2D data [n, d], got {}-D", shape.len()),
        ));
    }
    if shape[1] == 0 {
        return Err(MixtureError::config(
            "data",
            format!("{op} requires at least 1 feature"),
        ));
    }
    Ok(())
}

/// Validate the number of components against the number of seeding points.
///
/// Seeding k means needs strictly more than k rows.
pub fn validate_n_components(n_components: usize, n_points: usize, op: &'static str) -> MixtureResult<()> {
    if n_components == 0 {
        return Err(MixtureError::config(
            "n_components",
            format!("{op} requires n_components > 0"),
        ));
    }
    if n_points <= n_components {
        return Err(MixtureError::config(
            "n_components",
            format!(
                "{op}: need more data points than components, got n={n_points} for k={n_components}"
            ),
        ));
    }
    Ok(())
}

/// Validate an evaluation batch [n, d] against the model width.
pub fn validate_batch(shape: &[usize], n_features: usize) -> MixtureResult<()> {
    if shape.len() != 2 || shape[1] != n_features {
        let n = shape.first().copied().unwrap_or(0);
        return Err(MixtureError::shape("x", &[n, n_features], shape));
    }
    if shape[0] == 0 {
        return Err(MixtureError::InvalidInput {
            context: "x: evaluation batch has no rows".to_string(),
        });
    }
    Ok(())
}

/// Validate that an evaluation batch matches the model precision.
pub fn validate_same_dtype(expected: DType, actual: DType, op: &'static str) -> MixtureResult<()> {
    if expected != actual {
        return Err(MixtureError::InvalidInput {
            context: format!("{op}: model is {expected:?}, input is {actual:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_float_dtype() {
        assert!(validate_float_dtype(DType::F32, "test").is_ok());
        assert!(validate_float_dtype(DType::F64, "test").is_ok());
        assert!(validate_float_dtype(DType::I64, "test").is_err());
    }

    #[test]
    fn test_validate_data_2d() {
        assert!(validate_data_2d(&[10, 3], "test").is_ok());
        assert!(validate_data_2d(&[10], "test").is_err());
        assert!(validate_data_2d(&[10, 0], "test").is_err());
    }

    #[test]
    fn test_validate_n_components() {
        assert!(validate_n_components(3, 100, "test").is_ok());
        assert!(validate_n_components(0, 100, "test").is_err());
        assert!(matches!(
            validate_n_components(3, 3, "test"),
            Err(MixtureError::InvalidConfiguration { .. })
        ));
        assert!(validate_n_components(4, 3, "test").is_err());
    }

    #[test]
    fn test_validate_batch() {
        assert!(validate_batch(&[5, 2], 2).is_ok());
        assert!(matches!(
            validate_batch(&[5, 3], 2),
            Err(MixtureError::ShapeMismatch { .. })
        ));
        assert!(validate_batch(&[5], 2).is_err());
        assert!(matches!(
            validate_batch(&[0, 2], 2),
            Err(MixtureError::InvalidInput { .. })
        ));
    }
}
