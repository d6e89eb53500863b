//! Wire schema for the todo API.
//!
//! # Design
//! `TodoInput` is deliberately lenient at the serde layer: every field is
//! optional and `date` stays a string. `TodoInput::validate` then applies the
//! schema rules and produces `TodoFields`, so a missing task or a bad date is
//! reported as a `ValidationError` rather than as an opaque parse failure.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MSG_NO_RECORDS: &str = "No records found in database";
pub const MSG_TODO_NOT_FOUND: &str = "Todo not found";
pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";
pub const MSG_INSERTED: &str = "Inserted successfully";
pub const MSG_UPDATED: &str = "Updated successfully";
pub const MSG_DELETED: &str = "Deleted successfully";
pub const MSG_INSERT_FAILED: &str = "Insert operation failed";
pub const MSG_ORIGIN_REJECTED: &str = "Not allowed by CORS";

/// A single row of the `todo` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub task: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Request body for create and update.
///
/// Update is a full replacement: a field left out of the body overwrites the
/// stored value with NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoInput {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// The four mutable columns after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub task: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TodoInput {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<TodoFields, ValidationError> {
        let task = match self.task.as_deref() {
            Some(task) if !task.trim().is_empty() => task.to_string(),
            _ => return Err(ValidationError::MissingTask),
        };
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };
        Ok(TodoFields {
            task,
            description: self.description.clone(),
            category: self.category.clone(),
            date,
        })
    }
}

/// Accepts a calendar date, or an RFC 3339 timestamp at exactly midnight UTC
/// (how JavaScript serialises a `Date` built from a calendar day). A
/// timestamp with a time of day is rejected, since the column holds days.
fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    let invalid = || ValidationError::InvalidDate(raw.to_string());
    let ts = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| invalid())?
        .with_timezone(&Utc);
    if ts.time() != NaiveTime::MIN {
        return Err(invalid());
    }
    Ok(ts.date_naive())
}

/// Coerce a path segment into a todo id.
///
/// Whitespace is ignored and integral float literals such as `"3.0"` are
/// accepted. `None` means "matches no row", not a request error.
pub fn coerce_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }
    let float = raw.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

/// `{"message": ...}` response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertedBody {
    pub message: String,
    #[serde(rename = "insertId")]
    pub insert_id: u64,
}
