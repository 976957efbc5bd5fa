//! The connection collaborator: the mapping core's boundary with the store.
//!
//! The core issues exactly five verbs against a live store handle: create a
//! table, drop a table, insert a document, delete a document by key, and run
//! a composed filter/order query. Everything else about the store — its wire
//! protocol, session lifecycle, retries, pooling — lives behind this trait
//! and is out of scope for the mapping layer.
//!
//! Every method is a blocking round trip. The mapping layer defines no
//! cancellation or timeout semantics; a connection implementation may, and
//! those are invisible here.

use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};

use bson::Bson;

use crate::{error::ModelResult, query::Query, wire::WireDocument};

/// A store's acknowledgement of a write.
///
/// Mirrors the structured response document stores return for inserts and
/// deletes. `generated_keys` carries keys the store assigned to documents
/// inserted without one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteSummary {
    /// Number of documents inserted.
    #[serde(default)]
    pub inserted: u64,
    /// Number of documents deleted.
    #[serde(default)]
    pub deleted: u64,
    /// Keys the store assigned to inserted documents that carried none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_keys: Vec<Bson>,
}

/// Abstract interface to a live document store.
///
/// Implementations supply the concrete storage strategy; the mapping core
/// only ever calls these five operations. Implementations must be shareable
/// as a single process-wide handle (`Send + Sync`); how that handle is
/// opened, pooled or retried is the implementation's concern.
pub trait Connection: Send + Sync + Debug {
    /// Creates the table (collection) with the given name.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`](crate::error::ModelError) if the store
    /// rejects the operation.
    fn create_table(&self, name: &str) -> ModelResult<()>;

    /// Drops the table with the given name and every document in it.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`](crate::error::ModelError) if the table does
    /// not exist or the store rejects the operation.
    fn drop_table(&self, name: &str) -> ModelResult<()>;

    /// Inserts one wire document into the table.
    ///
    /// When the document carries no primary key, the store assigns one and
    /// reports it in the returned summary's `generated_keys`.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`](crate::error::ModelError) on write conflicts
    /// or store failures.
    fn insert(&self, table: &str, document: WireDocument) -> ModelResult<WriteSummary>;

    /// Deletes the document with the given primary key from the table.
    ///
    /// Deleting a key that matches nothing is not an error; the summary
    /// reports zero deletions.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`](crate::error::ModelError) if the store
    /// rejects the operation.
    fn delete(&self, table: &str, key: &Bson) -> ModelResult<WriteSummary>;

    /// Runs a composed filter/order query against the table and returns the
    /// matching wire documents.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`](crate::error::ModelError) if the store
    /// cannot evaluate the query.
    fn run_query(&self, table: &str, query: Query) -> ModelResult<Vec<WireDocument>>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn create_table(&self, name: &str) -> ModelResult<()> {
        (*self).create_table(name)
    }

    fn drop_table(&self, name: &str) -> ModelResult<()> {
        (*self).drop_table(name)
    }

    fn insert(&self, table: &str, document: WireDocument) -> ModelResult<WriteSummary> {
        (*self).insert(table, document)
    }

    fn delete(&self, table: &str, key: &Bson) -> ModelResult<WriteSummary> {
        (*self).delete(table, key)
    }

    fn run_query(&self, table: &str, query: Query) -> ModelResult<Vec<WireDocument>> {
        (*self).run_query(table, query)
    }
}

impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn create_table(&self, name: &str) -> ModelResult<()> {
        (**self).create_table(name)
    }

    fn drop_table(&self, name: &str) -> ModelResult<()> {
        (**self).drop_table(name)
    }

    fn insert(&self, table: &str, document: WireDocument) -> ModelResult<WriteSummary> {
        (**self).insert(table, document)
    }

    fn delete(&self, table: &str, key: &Bson) -> ModelResult<WriteSummary> {
        (**self).delete(table, key)
    }

    fn run_query(&self, table: &str, query: Query) -> ModelResult<Vec<WireDocument>> {
        (**self).run_query(table, query)
    }
}
