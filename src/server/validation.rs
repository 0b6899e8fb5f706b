//! Strict query-string validation.
//!
//! Unknown keys are rejected. Failures are reported with per-field
//! messages in `details`:
//! `{"_errors": [...], "<field>": {"_errors": [...]}}`.

use std::collections::{BTreeMap, HashMap};

use serde_json::{json, Map, Value};

use crate::models::SortOrder;
use crate::server::error::ApiError;

const VALIDATION_FAILED: &str = "Query params validation failed";

/// Accepted query of `GET /movies/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub title: String,
    pub page: u32,
}

/// Accepted query of `GET /movies/favorite`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteListParams {
    pub sort_by_upvotes: Option<SortOrder>,
}

#[derive(Default)]
struct Issues {
    form: Vec<String>,
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl Issues {
    fn reject_unknown(&mut self, query: &HashMap<String, String>, known: &[&str]) {
        let mut unknown: Vec<&str> = query
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect();
        if unknown.is_empty() {
            return;
        }
        unknown.sort_unstable();
        let keys: Vec<String> = unknown.iter().map(|key| format!("'{}'", key)).collect();
        self.form
            .push(format!("Unrecognized key(s) in object: {}", keys.join(", ")));
    }

    fn field(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.form.is_empty() && self.fields.is_empty() {
            return Ok(());
        }

        let mut details = Map::new();
        details.insert("_errors".to_string(), json!(self.form));
        for (field, messages) in self.fields {
            details.insert(field.to_string(), json!({ "_errors": messages }));
        }

        Err(ApiError::Validation {
            message: VALIDATION_FAILED.to_string(),
            details: Some(Value::Object(details)),
        })
    }
}

impl SearchParams {
    pub fn parse(query: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut issues = Issues::default();
        issues.reject_unknown(query, &["title", "page"]);

        let title = match query.get("title") {
            None => {
                issues.field("title", "Required");
                None
            }
            Some(title) if title.is_empty() => {
                issues.field("title", "String must contain at least 1 character(s)");
                None
            }
            Some(title) => Some(title.clone()),
        };

        let page = match query.get("page") {
            None => {
                issues.field("page", "Required");
                None
            }
            Some(page) if page.is_empty() || !page.bytes().all(|b| b.is_ascii_digit()) => {
                issues.field("page", "Must be a positive integer");
                None
            }
            Some(page) => match page.parse::<u32>() {
                Ok(0) => {
                    issues.field("page", "Number must be greater than 0");
                    None
                }
                Ok(page) => Some(page),
                Err(_) => {
                    issues.field("page", "Number is too large");
                    None
                }
            },
        };

        issues.into_result()?;
        match (title, page) {
            (Some(title), Some(page)) => Ok(Self { title, page }),
            _ => Err(ApiError::Validation {
                message: VALIDATION_FAILED.to_string(),
                details: None,
            }),
        }
    }
}

impl FavoriteListParams {
    pub fn parse(query: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut issues = Issues::default();
        issues.reject_unknown(query, &["sortByUpvotes"]);

        let sort_by_upvotes = match query.get("sortByUpvotes") {
            None => None,
            Some(value) => {
                let order = SortOrder::parse(value);
                if order.is_none() {
                    issues.field(
                        "sortByUpvotes",
                        format!(
                            "Invalid enum value. Expected 'ASC' | 'DES', received '{}'",
                            value
                        ),
                    );
                }
                order
            }
        };

        issues.into_result()?;
        Ok(Self { sort_by_upvotes })
    }
}
