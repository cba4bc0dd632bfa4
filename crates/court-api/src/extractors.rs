//! # Request Extraction Helpers
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and pass it through
//! [`extract_validated_json`] so malformed bodies and failed business
//! validation both produce the structured 422 error body instead of
//! axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types that carry their own field-level validation.
pub trait Validate {
    /// Check business validity. Field-presence and type errors are
    /// already handled by deserialization before this runs.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body and run its validation.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Probe {
        value: i32,
    }

    impl Validate for Probe {
        fn validate(&self) -> Result<(), String> {
            if self.value < 0 {
                return Err("value must be non-negative".into());
            }
            Ok(())
        }
    }

    #[test]
    fn valid_body_passes_through() {
        let probe = extract_validated_json(Ok(Json(Probe { value: 3 }))).unwrap();
        assert_eq!(probe.value, 3);
    }

    #[test]
    fn failed_validation_becomes_validation_error() {
        let err = extract_validated_json(Ok(Json(Probe { value: -1 }))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
