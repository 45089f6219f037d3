//! Field extraction helpers shared by the entity codecs
//!
//! Legacy documents are not uniform: link fields were written either as a
//! JSON array of id strings or as a single comma-joined string. These
//! helpers normalize every shape to typed values at the codec boundary so
//! nothing downstream branches on runtime shape.

use serde_json::Value;

use crate::types::error::{CatalogError, CatalogResult};
use crate::types::{DocId, Document};

/// Extract a required string field.
pub fn required_str(doc: &Document, field: &'static str) -> CatalogResult<String> {
    match doc.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(CatalogError::MissingField(field)),
    }
}

/// Extract an optional string field; `null` counts as absent.
pub fn optional_str(doc: &Document, field: &'static str) -> Option<String> {
    match doc.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Extract a required integer field.
pub fn required_i64(doc: &Document, field: &'static str) -> CatalogResult<i64> {
    doc.get(field)
        .and_then(Value::as_i64)
        .ok_or(CatalogError::MissingField(field))
}

/// Extract a required float field (integers are accepted).
pub fn required_f64(doc: &Document, field: &'static str) -> CatalogResult<f64> {
    doc.get(field)
        .and_then(Value::as_f64)
        .ok_or(CatalogError::MissingField(field))
}

/// Extract a required DocId field stored as a string.
pub fn required_id(doc: &Document, field: &'static str) -> CatalogResult<DocId> {
    let raw = required_str(doc, field)?;
    raw.parse()
}

/// Normalize a link field to an ordered id list.
///
/// Accepted shapes: absent (empty list), an array of id strings, or a
/// comma-joined string. Malformed tokens inside the field fail with
/// `InvalidIdentifier` rather than being dropped.
pub fn id_list(doc: &Document, field: &'static str) -> CatalogResult<Vec<DocId>> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.parse(),
                other => Err(CatalogError::InvalidIdentifier(other.to_string())),
            })
            .collect(),
        Some(Value::String(joined)) => {
            if joined.is_empty() {
                return Ok(Vec::new());
            }
            joined.split(',').map(|s| s.trim().parse()).collect()
        }
        Some(other) => Err(CatalogError::InvalidIdentifier(other.to_string())),
    }
}

/// Render an id list back to the canonical stored shape (array of strings).
pub fn id_list_value(ids: &[DocId]) -> Value {
    Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect())
}
