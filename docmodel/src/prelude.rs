//! Convenient re-exports of commonly used types from docmodel.
//!
//! ```ignore
//! use docmodel::prelude::*;
//! ```

pub use docmodel_core::{
    connection::{Connection, WriteSummary},
    error::{ModelError, ModelResult},
    field::{Field, FieldKind},
    instance::Instance,
    query::{Expr, FieldOp, Filter, Query, QueryVisitor, Sort, SortDirection},
    queryset::{QuerySet, QuerySetManager},
    schema::{PK, Schema, SchemaBuilder, SchemaHandle},
    wire::WireDocument,
};
