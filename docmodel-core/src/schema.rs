//! Per-type schemas: the ordered field mapping built once per document type.
//!
//! A [`Schema`] is the Rust rendition of a document class definition: the
//! builder collects field declarations into an ordered `name -> Field`
//! mapping, unconditionally installs the reserved `pk` identity entry, and
//! produces an immutable schema shared by reference (`Arc`) with every
//! instance of the type.
//!
//! # Example
//!
//! ```ignore
//! use docmodel::{field::Field, schema::Schema};
//!
//! let person = Schema::builder("Person")
//!     .field("name", Field::text(""))
//!     .field("age", Field::integer(0))
//!     .build();
//!
//! assert!(person.field(docmodel::schema::PK).is_some());
//! ```

use std::sync::Arc;

use crate::{
    connection::Connection,
    error::ModelResult,
    field::Field,
    query::{Sort, SortDirection},
    queryset::QuerySet,
};

/// The reserved name of the identity field every schema receives.
pub const PK: &str = "pk";

/// The default wire-document key name for the primary key.
pub const DEFAULT_PRIMARY_KEY_FIELD: &str = "id";

/// The immutable schema of one document type.
///
/// Built once through [`Schema::builder`]; never mutated afterwards. Many
/// instances share one schema by reference.
#[derive(Debug)]
pub struct Schema {
    class_name: String,
    collection: String,
    primary_key_field: String,
    order_by: Option<Sort>,
    fields: Vec<(String, Field)>,
}

impl Schema {
    /// Starts building a schema for the document type with the given name.
    ///
    /// The backing table is named after the lower-cased type name.
    pub fn builder(class_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            class_name: class_name.into(),
            primary_key_field: DEFAULT_PRIMARY_KEY_FIELD.to_string(),
            order_by: None,
            fields: Vec::new(),
        }
    }

    /// The document type name this schema was declared for.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The backing table name (lower-cased type name).
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The wire-document key name used for the primary key.
    pub fn primary_key_field(&self) -> &str {
        &self.primary_key_field
    }

    /// The default ordering applied by query-set terminal operations when
    /// no explicit ordering was composed.
    pub fn order_by(&self) -> Option<&Sort> {
        self.order_by.as_ref()
    }

    /// Looks up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    /// Iterates field names in declaration order (`pk` first).
    ///
    /// The sequence is finite and restartable; it reflects the static
    /// schema, not any instance state.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(name, descriptor)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.as_str(), field))
    }

    /// Number of fields, including the injected `pk`.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: every schema carries at least the `pk` entry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Creates the backing table through the connection collaborator.
    ///
    /// Thin pass-through; not part of the mapping core's algorithmic
    /// contract.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn create_table(&self, conn: &dyn Connection) -> ModelResult<()> {
        conn.create_table(&self.collection)
    }

    /// Drops the backing table through the connection collaborator.
    ///
    /// # Errors
    ///
    /// Propagates store failures unmodified.
    pub fn drop_table(&self, conn: &dyn Connection) -> ModelResult<()> {
        conn.drop_table(&self.collection)
    }
}

/// The per-type query entry point on a shared schema handle.
///
/// Implemented for `Arc<Schema>`, so any holder of the shared schema can
/// start a query the way application code reads naturally:
/// `person.objects().filter(...)`.
pub trait SchemaHandle {
    /// Hands back a fresh query set with empty filter state.
    fn objects(&self) -> QuerySet;
}

impl SchemaHandle for Arc<Schema> {
    fn objects(&self) -> QuerySet {
        QuerySet::new(Arc::clone(self))
    }
}

/// Builder collecting field declarations into a [`Schema`].
///
/// `build()` cannot fail: a declaration is either a field and registers, or
/// it never reaches the builder in the first place.
#[derive(Debug)]
pub struct SchemaBuilder {
    class_name: String,
    primary_key_field: String,
    order_by: Option<Sort>,
    fields: Vec<(String, Field)>,
}

impl SchemaBuilder {
    /// Declares a field. Re-declaring a name replaces the earlier
    /// descriptor in place.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    /// Overrides the wire-document key name for the primary key
    /// (default `"id"`).
    pub fn primary_key_field(mut self, name: impl Into<String>) -> Self {
        self.primary_key_field = name.into();
        self
    }

    /// Sets the default ordering applied to query results for this type.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(Sort { field: field.into(), direction });
        self
    }

    /// Finishes the schema.
    ///
    /// Installs the reserved `pk` descriptor at the front of the mapping,
    /// overwriting any declared field of that name: every document type gets
    /// a primary key whether declared or not.
    pub fn build(mut self) -> Arc<Schema> {
        self.fields.retain(|(name, _)| name != PK);
        self.fields
            .insert(0, (PK.to_string(), Field::primary_key()));

        let collection = self.class_name.to_lowercase();
        Arc::new(Schema {
            class_name: self.class_name,
            collection,
            primary_key_field: self.primary_key_field,
            order_by: self.order_by,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn empty_declaration_still_gets_a_primary_key() {
        let schema = Schema::builder("Bare").build();
        assert_eq!(schema.len(), 1);
        let pk = schema.field(PK).unwrap();
        assert_eq!(pk.kind(), FieldKind::PrimaryKey);
    }

    #[test]
    fn pk_comes_first_then_declaration_order() {
        let schema = Schema::builder("Person")
            .field("name", Field::text(""))
            .field("age", Field::integer(0))
            .build();
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["pk", "name", "age"]);
    }

    #[test]
    fn declared_pk_is_overwritten_by_the_injected_descriptor() {
        let schema = Schema::builder("Sneaky")
            .field(PK, Field::text("not a key"))
            .build();
        assert_eq!(schema.field(PK).unwrap().kind(), FieldKind::PrimaryKey);
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn collection_name_is_the_lowercased_class_name() {
        let schema = Schema::builder("BlogPost").build();
        assert_eq!(schema.collection(), "blogpost");
    }

    #[test]
    fn primary_key_field_defaults_to_id() {
        let schema = Schema::builder("Person").build();
        assert_eq!(schema.primary_key_field(), "id");

        let custom = Schema::builder("Person")
            .primary_key_field("person_id")
            .build();
        assert_eq!(custom.primary_key_field(), "person_id");
    }

    #[test]
    fn redeclaring_a_field_replaces_it_in_place() {
        let schema = Schema::builder("Person")
            .field("name", Field::text(""))
            .field("age", Field::integer(0))
            .field("name", Field::text("anon"))
            .build();
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["pk", "name", "age"]);
        assert_eq!(
            schema.field("name").unwrap().default(),
            &bson::Bson::String("anon".into())
        );
    }
}
