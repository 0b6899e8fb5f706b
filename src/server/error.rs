//! Error types and response handling for the backend.
//!
//! Every failure leaves the service as
//! `{"error": {"code", "message", "details"?}}` with `code` equal to the
//! HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::models::{ApiErrorBody, ApiErrorResponse};

/// Errors a route handler can end with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request parameters failed validation.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// Requested favorite does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Catalog failure, forwarded with its own status.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Anything else.
    #[error("Error processing request. Reason -> {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Catalog(err) => {
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation { details, .. } => details.clone(),
            ApiError::Catalog(err) => err.details.clone(),
            ApiError::NotFound(_) | ApiError::Internal(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: status.as_u16(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        (status, Json(body)).into_response()
    }
}
