//! In-memory connection implementation.
//!
//! Stores wire documents in per-table hash maps behind a read-write lock,
//! keyed by a canonical rendering of the primary-key value. Intended for
//! development and testing; queries scan every row in a table.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use bson::Bson;

use docmodel_core::{
    connection::{Connection, WriteSummary},
    error::{ModelError, ModelResult},
    query::{Query, SortDirection},
    wire::WireDocument,
};

use crate::evaluator::{Comparable, RowEvaluator};

type RowMap = HashMap<String, WireDocument>;
type TableMap = HashMap<String, RowMap>;

/// Thread-safe in-memory store handle.
///
/// Cloning yields another handle to the same underlying tables, matching
/// the "single shared process-wide handle" model the mapping layer assumes.
/// Documents inserted without a primary key get a generated UUID string
/// key, reported back through the write summary.
///
/// # Example
///
/// ```ignore
/// use docmodel_memory::MemoryConnection;
///
/// let conn = MemoryConnection::new();
/// instance.save(&conn)?;
/// ```
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    tables: Arc<RwLock<TableMap>>,
    primary_key_field: String,
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConnection {
    /// Creates an empty store expecting primary keys under `"id"`.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(TableMap::new())),
            primary_key_field: "id".to_string(),
        }
    }

    /// Creates an empty store expecting primary keys under a custom wire
    /// key name, for document types that configure one.
    pub fn with_primary_key_field(name: impl Into<String>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(TableMap::new())),
            primary_key_field: name.into(),
        }
    }

    fn read_tables(&self) -> RwLockReadGuard<'_, TableMap> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, TableMap> {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Canonical row-key rendering of a primary-key value, so keys match
/// across integer widths.
fn key_repr(key: &Bson) -> String {
    match key {
        Bson::String(value) => value.clone(),
        Bson::Int32(value) => value.to_string(),
        Bson::Int64(value) => value.to_string(),
        other => other.to_string(),
    }
}

impl Connection for MemoryConnection {
    fn create_table(&self, name: &str) -> ModelResult<()> {
        self.write_tables()
            .entry(name.to_string())
            .or_default();

        Ok(())
    }

    fn drop_table(&self, name: &str) -> ModelResult<()> {
        if self.write_tables().remove(name).is_none() {
            return Err(ModelError::Backend(format!("Table `{name}` does not exist")));
        }

        Ok(())
    }

    fn insert(&self, table: &str, mut document: WireDocument) -> ModelResult<WriteSummary> {
        let mut tables = self.write_tables();
        let rows = tables.entry(table.to_string()).or_default();

        let mut summary = WriteSummary::default();
        let key = match document.get(&self.primary_key_field) {
            Some(key) if !matches!(key, Bson::Null) => key.clone(),
            _ => {
                let generated = Bson::String(bson::Uuid::new().to_string());
                document.insert(self.primary_key_field.clone(), generated.clone());
                summary.generated_keys.push(generated.clone());
                generated
            }
        };

        let row_key = key_repr(&key);
        if rows.contains_key(&row_key) {
            return Err(ModelError::Backend(format!(
                "Duplicate primary key `{row_key}` in table `{table}`"
            )));
        }

        rows.insert(row_key, document);
        summary.inserted = 1;

        Ok(summary)
    }

    fn delete(&self, table: &str, key: &Bson) -> ModelResult<WriteSummary> {
        let mut tables = self.write_tables();
        let deleted = match tables.get_mut(table) {
            Some(rows) => rows.remove(&key_repr(key)).is_some() as u64,
            None => 0,
        };

        Ok(WriteSummary { deleted, ..WriteSummary::default() })
    }

    fn run_query(&self, table: &str, query: Query) -> ModelResult<Vec<WireDocument>> {
        let tables = self.read_tables();
        let rows = match tables.get(table) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let mut matched = match &query.filter {
            Some(filter) => RowEvaluator::filter_rows(rows.values(), filter)?,
            None => rows.values().cloned().collect::<Vec<_>>(),
        };

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| {
                let left = a
                    .get(&sort.field)
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);
                let right = b
                    .get(&sort.field)
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });
        }

        Ok(matched
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }
}
