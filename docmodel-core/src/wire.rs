//! The untyped wire-document shape exchanged with the backing store.
//!
//! A wire document is a flat, ordered, string-keyed mapping of tagged
//! primitive values ([`bson::Bson`]). The mapping core serializes instances
//! into this shape before handing them to the connection collaborator, and
//! reconstructs instances from it when materializing query results.

use serde_json::Value;

use crate::error::ModelResult;

/// The key-value representation exchanged with the backing store.
///
/// The primary key's wire key name is configurable per document type
/// (default `"id"`); absence of that key means "no primary key assigned yet".
pub type WireDocument = bson::Document;

/// Converts a wire document to a JSON value.
///
/// # Errors
///
/// Returns an error if the document contains values with no JSON
/// representation.
pub fn to_json(document: &WireDocument) -> ModelResult<Value> {
    Ok(serde_json::to_value(document)?)
}

/// Builds a wire document from a JSON value.
///
/// # Errors
///
/// Returns an error if the value is not a JSON object.
pub fn from_json(value: Value) -> ModelResult<WireDocument> {
    Ok(serde_json::from_value(value)?)
}
