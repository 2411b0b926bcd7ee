//! Field access for documents read back from a collection.

use chrono::{DateTime, Utc};
use serde_json::Value;

use brainery_core::error::AppError;
use brainery_core::result::AppResult;

use super::engine::Document;
use crate::store::timestamp_text;

/// Required string field.
pub(crate) fn text(doc: &Document, field: &str) -> AppResult<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::internal(format!("Stored document is missing '{field}'")))
}

/// Optional string field; null and absent are both `None`.
pub(crate) fn optional_text(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Required timestamp field.
pub(crate) fn timestamp(doc: &Document, field: &str) -> AppResult<DateTime<Utc>> {
    let raw = text(doc, field)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Stored document has a malformed '{field}': {e}")))
}

/// Current time in stored form.
pub(crate) fn now() -> Value {
    Value::String(timestamp_text(Utc::now()))
}

/// Optional text in stored form.
pub(crate) fn nullable(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

/// Build a document from a `json!` object literal.
pub(crate) fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}
