use serde_json::Value;
use thiserror::Error;

use crate::error::NO_RESPONSE_STATUS;
use crate::models::SchemaViolation;

/// Failure talking to the movie catalog.
///
/// Carries the HTTP-like status the backend answers with, so the route
/// layer can forward it unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct CatalogError {
    pub status: u16,
    pub message: String,
    pub details: Option<Value>,
}

impl CatalogError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// The catalog answered, but not in the documented shape.
    pub fn invalid_payload(context: &str, violation: &SchemaViolation) -> Self {
        Self {
            status: 500,
            message: format!("{}. Data validation failed", context),
            details: Some(violation.to_details()),
        }
    }

    /// The catalog could not be reached or answered with a non-success
    /// status. The URL is dropped from the message since it carries the
    /// API key.
    pub fn transport(context: &str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        Self {
            status: err
                .status()
                .map(|s| s.as_u16())
                .unwrap_or(NO_RESPONSE_STATUS),
            message: format!("{} -> {}", context, err),
            details: None,
        }
    }
}
