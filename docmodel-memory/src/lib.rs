//! In-memory store backend for docmodel.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! mapping layer's [`Connection`](docmodel_core::connection::Connection)
//! trait. Every verb is a blocking call against hash maps behind a
//! read-write lock, which makes it the natural store for development and
//! for exercising document types in tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel_core::{field::Field, instance::Instance, schema::Schema};
//! use docmodel_memory::MemoryConnection;
//!
//! let person = Schema::builder("Person")
//!     .field("name", Field::text(""))
//!     .build();
//!
//! let conn = MemoryConnection::new();
//! person.create_table(&conn)?;
//!
//! let mut ann = Instance::with_values(&person, [("name", "Ann")])?;
//! ann.save(&conn)?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmodel_memory;

pub mod evaluator;
pub mod store;

pub use store::MemoryConnection;
