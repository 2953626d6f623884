//! API error taxonomy and its HTTP mapping.
//!
//! Client-input failures map to 4xx responses; store failures map to 500 and are
//! never reported as a client error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelfwatch_core::error::DocumentStoreError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// The path identifier is not a valid store identifier.
    #[error("Invalid ID format")]
    InvalidIdentifier,

    /// Well-formed identifier with no matching document.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A filter parameter failed its format check.
    #[error("{0}")]
    InvalidFormat(String),

    /// The request was well-formed but carried nothing usable.
    #[error("{0}")]
    InvalidInput(String),

    /// The JSON body could not be parsed into the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Store error: {0}")]
    Store(#[from] DocumentStoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            ApiError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidIdentifier.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidFormat("bad date".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidInput("nothing to do".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("Item").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidBody("missing field".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_store_failures_are_server_errors() {
        let err = ApiError::from(DocumentStoreError::Backend("connection reset".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message_names_resource() {
        assert_eq!(ApiError::NotFound("Record").to_string(), "Record not found");
    }
}
