//! Error and result types for the document-mapping layer.
//!
//! Use [`ModelResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors raised by the mapping layer.
///
/// Attribute and validation errors are always fatal to the calling
/// operation and are never retried. Store-level failures surface as
/// [`ModelError::Backend`] unmodified; the mapping layer performs no
/// retries and no local recovery.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Read or write of an attribute name that is absent from the schema.
    #[error("Unknown attribute {class}.{field}")]
    UnknownAttribute {
        /// The document type name.
        class: String,
        /// The attribute name that failed to resolve.
        field: String,
    },
    /// A value failed its field's validity predicate, either on direct
    /// assignment or during full-document validation before persistence.
    #[error("Validation failed: {class}.{field} is of wrong type {actual}")]
    Validation {
        /// The document type name.
        class: String,
        /// The offending field name.
        field: String,
        /// The runtime type of the rejected value.
        actual: String,
    },
    /// A single-result query matched zero documents.
    #[error("No document matched in collection {0}")]
    NotFound(String),
    /// A single-result query matched more than one document.
    #[error("Multiple documents matched in collection {0}")]
    MultipleResults(String),
    /// Serialization/deserialization error when converting between wire formats.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error propagated from the underlying store.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for mapping-layer operations.
pub type ModelResult<T> = Result<T, ModelError>;

impl From<BsonError> for ModelError {
    fn from(err: BsonError) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for ModelError {
    fn from(err: SerdeJsonError) -> Self {
        ModelError::Serialization(err.to_string())
    }
}
