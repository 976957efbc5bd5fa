//! A typed document-mapping layer over document stores.
//!
//! This crate is the core of the docmodel project and provides:
//!
//! - **Field descriptors** ([`field`]) - Typed, defaulted schema attributes with validity predicates
//! - **Schemas** ([`schema`]) - Per-type ordered field mappings, built once and shared by reference
//! - **Instances** ([`instance`]) - Live records with validated attribute access and CRUD operations
//! - **Query expressions** ([`query`]) - Declarative filter/order state handed to the store
//! - **Query sets** ([`queryset`]) - Lazily-composed, immutable query descriptors
//! - **Connection boundary** ([`connection`]) - The five-verb trait the store collaborator implements
//! - **Wire documents** ([`wire`]) - The untyped key-value shape exchanged with the store
//! - **Error handling** ([`error`]) - The mapping-layer error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use docmodel_core::{field::Field, instance::Instance, schema::Schema};
//!
//! let person = Schema::builder("Person")
//!     .field("name", Field::text(""))
//!     .build();
//!
//! let mut ann = Instance::with_values(&person, [("name", "Ann")])?;
//! ann.save(&conn)?;
//!
//! let found = person.objects().filter(Filter::eq("name", "Ann")).get(&conn)?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmodel_core;

pub mod connection;
pub mod error;
pub mod field;
pub mod instance;
pub mod query;
pub mod queryset;
pub mod schema;
pub mod wire;
