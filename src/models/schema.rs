//! Decode-and-validate helpers used at every network boundary.
//!
//! Payloads are first deserialized with serde (which enforces types and
//! literal tags), then checked with [`Validate`] for the constraints serde
//! cannot express: non-empty strings and poster URLs.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A payload that deserialized but broke a schema rule.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct SchemaViolation {
    /// Dotted path of the offending field (`$` for the whole payload).
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the field path, used when validating nested collections.
    pub fn within(self, parent: &str) -> Self {
        Self {
            field: format!("{}{}", parent, self.field),
            reason: self.reason,
        }
    }

    /// JSON form carried in error `details`.
    pub fn to_details(&self) -> Value {
        serde_json::json!({
            "field": self.field,
            "reason": self.reason,
        })
    }
}

/// Schema rules that go beyond what serde enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaViolation>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), SchemaViolation> {
        for (index, item) in self.iter().enumerate() {
            item.validate()
                .map_err(|violation| violation.within(&format!("[{}].", index)))?;
        }
        Ok(())
    }
}

/// Deserialize `value` into `T` and run its schema checks.
pub fn decode<T>(value: Value) -> Result<T, SchemaViolation>
where
    T: DeserializeOwned + Validate,
{
    let decoded: T =
        serde_json::from_value(value).map_err(|e| SchemaViolation::new("$", e.to_string()))?;
    decoded.validate()?;
    Ok(decoded)
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), SchemaViolation> {
    if value.is_empty() {
        return Err(SchemaViolation::new(field, "must not be empty"));
    }
    Ok(())
}

/// Posters are either an absolute URL or the literal `"N/A"`.
pub(crate) fn require_poster(field: &str, value: &str) -> Result<(), SchemaViolation> {
    if value == "N/A" {
        return Ok(());
    }
    match reqwest::Url::parse(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(SchemaViolation::new(field, "must be a URL or \"N/A\"")),
    }
}
