//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        // The failing product is named in the message; the caller must
        // reduce the quantity or pick another product before retrying.
        DomainError::InsufficientStock { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::AlreadyExists { .. } => (StatusCode::CONFLICT, err.to_string()),
        DomainError::InvalidQuantity { .. } | DomainError::InvalidPrice { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        DomainError::Store(store_err) => {
            tracing::error!(error = %store_err, "store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}
