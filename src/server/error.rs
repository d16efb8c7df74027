//! HTTP mapping of [`crate::Error`].
//!
//! Credential problems surface as 401 with their message and validation
//! failures as 422. Everything else is logged in full and reported as a
//! generic 500 so provider payloads never leak to callers.

use crate::models::ErrorResponse;
use crate::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Configuration(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            Error::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
            other => {
                error!(error = %other, "fable generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "fable generation failed".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_is_unauthorized() {
        let response = Error::Configuration("no key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_error_is_unprocessable() {
        let response = Error::Validation("age".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_other_errors_are_internal() {
        for err in [
            Error::Parse("bad json".to_string()),
            Error::ImageGeneration("rejected".to_string()),
            Error::PromptCountMismatch {
                expected: 2,
                actual: 1,
            },
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
