//! Error taxonomy of the client-side engine.
//!
//! Errors are captured per store cell, so they must be cheap to clone and
//! comparable for change detection. Transport errors are flattened to
//! status + message for that reason.

use serde_json::Value;
use thiserror::Error;

use crate::models::SchemaViolation;

/// Status reported when no response arrived at all.
pub const NO_RESPONSE_STATUS: u16 = 504;

/// Errors produced by remote data operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Malformed input or a response that broke its schema.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// The requested favorite does not exist server-side.
    #[error("{message}")]
    NotFound { message: String },

    /// Transport failure or non-success status from the backend.
    #[error("Remote service error ({status}): {message}")]
    RemoteService {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// The request was superseded. Never surfaced to the user.
    #[error("Operation cancelled")]
    Cancelled,
}

/// User-facing summary of an error, shown as a dismissible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub status: Option<u16>,
    pub message: String,
    pub details: Option<Value>,
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// HTTP-like status for the error, when one applies.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Validation { .. } | ClientError::Cancelled => None,
            ClientError::NotFound { .. } => Some(404),
            ClientError::RemoteService { status, .. } => Some(*status),
        }
    }

    /// Summarize for display. `fallback` prefixes messages that carry no
    /// context of their own.
    pub fn describe(&self, fallback: &str) -> ErrorDetails {
        match self {
            ClientError::Validation { details, .. } => ErrorDetails {
                status: None,
                message: "Invalid api response".to_string(),
                details: details.clone(),
            },
            ClientError::NotFound { message } => ErrorDetails {
                status: Some(404),
                message: message.clone(),
                details: None,
            },
            ClientError::RemoteService {
                status,
                message,
                details,
            } => ErrorDetails {
                status: Some(*status),
                message: message.clone(),
                details: details.clone(),
            },
            ClientError::Cancelled => ErrorDetails {
                status: None,
                message: format!("{}. Reason -> operation cancelled", fallback),
                details: None,
            },
        }
    }
}

impl From<SchemaViolation> for ClientError {
    fn from(violation: SchemaViolation) -> Self {
        ClientError::Validation {
            message: format!("Invalid api response: {}", violation),
            details: Some(violation.to_details()),
        }
    }
}
