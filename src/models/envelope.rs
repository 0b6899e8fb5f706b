use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every successful backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccessResponse<T> {
    pub data: T,
}

/// Body of every failed backend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// HTTP status code.
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
