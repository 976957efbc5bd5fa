//! Lazily-composed, immutable query sets bound to one document type.
//!
//! A [`QuerySet`] carries a schema reference and accumulated filter/order
//! state. Composition is by value: every `filter`, `order_by`, `limit` or
//! `skip` call returns a new query set and leaves the receiver unchanged, so
//! earlier references remain valid and reusable. Nothing touches the store
//! until a terminal operation (`all`, `first`, `get`, `count`) runs the
//! accumulated query and wraps the raw results back into [`Instance`]s.
//!
//! # Example
//!
//! ```ignore
//! use docmodel::prelude::*;
//!
//! let adults = person.objects().filter(Filter::gte("age", 18));
//! let named = adults.filter(Filter::eq("name", "Ann")); // adults unchanged
//! let matches = named.all(&conn)?;
//! ```

use std::sync::Arc;

use crate::{
    connection::Connection,
    error::{ModelError, ModelResult},
    instance::Instance,
    query::{Expr, Query, Sort, SortDirection},
    schema::Schema,
};

/// A restartable query descriptor bound to one document type.
#[derive(Debug, Clone)]
pub struct QuerySet {
    schema: Arc<Schema>,
    query: Query,
}

impl QuerySet {
    /// Creates a fresh query set with empty filter state.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema, query: Query::new() }
    }

    /// The schema this query set is bound to.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Composes a filter onto this query set, returning a new one.
    ///
    /// Filters accumulate conjunctively. The receiver is left unmodified
    /// and re-executing it yields its original result set.
    pub fn filter(&self, expr: Expr) -> QuerySet {
        let mut next = self.clone();
        next.query.filter = Some(match next.query.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        next
    }

    /// Returns a new query set ordered by the given field.
    pub fn order_by(&self, field: impl Into<String>, direction: SortDirection) -> QuerySet {
        let mut next = self.clone();
        next.query.sort = Some(Sort { field: field.into(), direction });
        next
    }

    /// Returns a new query set capped at `limit` results.
    pub fn limit(&self, limit: usize) -> QuerySet {
        let mut next = self.clone();
        next.query.limit = Some(limit);
        next
    }

    /// Returns a new query set skipping the first `offset` results.
    pub fn skip(&self, offset: usize) -> QuerySet {
        let mut next = self.clone();
        next.query.offset = Some(offset);
        next
    }

    /// Materializes every match as an [`Instance`].
    ///
    /// # Errors
    ///
    /// Store failures propagate unmodified; a raw result document with an
    /// invalid known field fails with [`ModelError::Validation`].
    pub fn all(&self, conn: &dyn Connection) -> ModelResult<Vec<Instance>> {
        let documents = conn.run_query(self.schema.collection(), self.effective_query())?;
        documents
            .into_iter()
            .map(|document| Instance::from_wire(&self.schema, document))
            .collect()
    }

    /// Materializes the first match, if any.
    ///
    /// # Errors
    ///
    /// Store failures propagate unmodified.
    pub fn first(&self, conn: &dyn Connection) -> ModelResult<Option<Instance>> {
        let mut query = self.effective_query();
        query.limit = Some(1);
        let documents = conn.run_query(self.schema.collection(), query)?;
        documents
            .into_iter()
            .next()
            .map(|document| Instance::from_wire(&self.schema, document))
            .transpose()
    }

    /// Materializes exactly one match.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] when nothing matches,
    /// [`ModelError::MultipleResults`] when more than one document does.
    pub fn get(&self, conn: &dyn Connection) -> ModelResult<Instance> {
        let mut query = self.effective_query();
        // Two rows are enough to tell "one" from "many".
        query.limit = Some(2);
        let mut documents = conn.run_query(self.schema.collection(), query)?;
        match documents.len() {
            0 => Err(ModelError::NotFound(self.schema.collection().to_string())),
            1 => Instance::from_wire(&self.schema, documents.remove(0)),
            _ => Err(ModelError::MultipleResults(
                self.schema.collection().to_string(),
            )),
        }
    }

    /// Counts the matches without materializing instances.
    ///
    /// # Errors
    ///
    /// Store failures propagate unmodified.
    pub fn count(&self, conn: &dyn Connection) -> ModelResult<usize> {
        let documents = conn.run_query(self.schema.collection(), self.effective_query())?;
        Ok(documents.len())
    }

    /// The query handed to the store: the composed state, with the type's
    /// default ordering applied when none was composed explicitly.
    fn effective_query(&self) -> Query {
        let mut query = self.query.clone();
        if query.sort.is_none() {
            query.sort = self.schema.order_by().cloned();
        }
        query
    }
}

/// The per-type entry point that hands back fresh query sets.
///
/// Holding a manager is equivalent to holding the schema: every call to
/// [`query_set`](QuerySetManager::query_set) (or the
/// [`filter`](QuerySetManager::filter) shorthand) starts from empty filter
/// state.
#[derive(Debug, Clone)]
pub struct QuerySetManager {
    schema: Arc<Schema>,
}

impl QuerySetManager {
    /// Creates a manager bound to the given document type.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// Hands back a fresh query set with empty filter state.
    pub fn query_set(&self) -> QuerySet {
        QuerySet::new(Arc::clone(&self.schema))
    }

    /// Shorthand for `query_set().filter(expr)`.
    pub fn filter(&self, expr: Expr) -> QuerySet {
        self.query_set().filter(expr)
    }

    /// Materializes the whole collection.
    ///
    /// # Errors
    ///
    /// Store failures propagate unmodified.
    pub fn all(&self, conn: &dyn Connection) -> ModelResult<Vec<Instance>> {
        self.query_set().all(conn)
    }
}
