//! Main docmodel crate: a typed document-mapping layer over document stores.
//!
//! This crate is the primary entry point for users of the docmodel project.
//! Application code declares document types as schemas with typed, defaulted
//! fields; the mapping layer validates every attribute assignment, keeps the
//! typed in-memory representation separate from the untyped wire document,
//! and composes queries lazily against whichever store implements the
//! [`Connection`](connection::Connection) boundary.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::MemoryConnection};
//!
//! // Declare a document type. Every type gets a reserved `pk` identity
//! // field whether declared or not.
//! let person = Schema::builder("Person")
//!     .field("name", Field::text(""))
//!     .field("age", Field::integer(0))
//!     .build();
//!
//! let conn = MemoryConnection::new();
//! person.create_table(&conn)?;
//!
//! // Construct, validate-on-write, persist.
//! let mut ann = Instance::with_values(&person, [("name", "Ann")])?;
//! ann.set("age", 30)?;
//! ann.save(&conn)?;
//!
//! // Compose queries lazily; nothing runs until a terminal operation.
//! let adults = person.objects().filter(Filter::gte("age", 18));
//! let ann = adults.filter(Filter::eq("name", "Ann")).get(&conn)?;
//! assert_eq!(ann.get("name")?, &bson::bson!("Ann"));
//! ```
//!
//! # Wire documents
//!
//! An instance serializes to a flat, string-keyed document of tagged
//! primitive values. The primary key's wire name is configurable per type
//! (default `"id"`) and is omitted while unset, so the store can assign a
//! key; a store-generated key is adopted back onto the instance after a
//! successful save.
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//!
//! Any other store plugs in by implementing the five-verb
//! [`Connection`](connection::Connection) trait.

pub mod prelude;

pub use docmodel_core::{connection, error, field, instance, query, queryset, schema, wire};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docmodel_memory::MemoryConnection;
}
