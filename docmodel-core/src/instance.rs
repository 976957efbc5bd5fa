//! Live records: schema-validated instances of a document type.
//!
//! An [`Instance`] pairs a shared reference to its type's [`Schema`] with a
//! private value mapping. Every read and write goes through the schema:
//! writes are validated against the field's predicate, reads fall back to
//! the field's default when no value has been set. The instance is the
//! single translation point between the typed in-memory representation and
//! the untyped wire document exchanged with the store.

use std::{collections::HashMap, fmt, sync::Arc};

use bson::Bson;

use crate::{
    connection::{Connection, WriteSummary},
    error::{ModelError, ModelResult},
    field::{FieldKind, value_type_name},
    schema::{PK, Schema},
    wire::WireDocument,
};

/// A live record of one document type.
///
/// Holds a reference to the owning type's schema and the values assigned so
/// far. Constructed empty, from keyword-style pairs, or from a raw wire
/// document returned by the store.
///
/// # Persistence state
///
/// An instance with no primary key value is unsaved; a successful
/// [`save`](Instance::save) against a store that generates keys adopts the
/// generated key, after which [`delete`](Instance::delete) can identify the
/// remote record.
#[derive(Debug, Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    data: HashMap<String, Bson>,
}

impl Instance {
    /// Creates an empty instance of the given type. No fields are set;
    /// reads report field defaults.
    pub fn new(schema: &Arc<Schema>) -> Self {
        Self { schema: Arc::clone(schema), data: HashMap::new() }
    }

    /// Creates an instance from keyword-style pairs.
    ///
    /// Every pair goes through the validating setter.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownAttribute`] for names absent from the schema,
    /// [`ModelError::Validation`] for values that fail their field's
    /// predicate.
    pub fn with_values<I, K, V>(schema: &Arc<Schema>, values: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Bson>,
    {
        let mut instance = Self::new(schema);
        for (name, value) in values {
            instance.set(name.as_ref(), value)?;
        }
        Ok(instance)
    }

    /// Reconstructs an instance from a raw wire document.
    ///
    /// The type's configured external key name maps to `pk`, and its value
    /// is stored directly, bypassing the validating setter — an externally
    /// assigned key need not match the declared key shape. Every other name
    /// present in the schema goes through the validating setter. Names the
    /// schema does not know are silently ignored, keeping the mapping
    /// forward-compatible with unknown wire fields.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] when a known field's wire value fails its
    /// predicate.
    pub fn from_wire(schema: &Arc<Schema>, document: WireDocument) -> ModelResult<Self> {
        let mut instance = Self::new(schema);
        for (name, value) in document {
            if name == schema.primary_key_field() {
                instance.data.insert(PK.to_string(), value);
                continue;
            }
            if schema.field(&name).is_none() {
                continue;
            }
            instance.set(&name, value)?;
        }
        Ok(instance)
    }

    /// The schema this instance was constructed against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Reads a field: the stored value, or the field's default when unset.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownAttribute`] for names absent from the schema.
    pub fn get(&self, name: &str) -> ModelResult<&Bson> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| self.unknown_attribute(name))?;
        Ok(self.data.get(name).unwrap_or_else(|| field.default()))
    }

    /// Writes a field through the validating interceptor.
    ///
    /// On a validation failure nothing is stored; previously assigned data
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownAttribute`] for names absent from the schema,
    /// [`ModelError::Validation`] when the value fails the field's
    /// predicate.
    pub fn set(&mut self, name: &str, value: impl Into<Bson>) -> ModelResult<()> {
        let value = value.into();
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| self.unknown_attribute(name))?;
        if !field.is_valid(&value) {
            return Err(ModelError::Validation {
                class: self.schema.class_name().to_string(),
                field: name.to_string(),
                actual: value_type_name(&value).to_string(),
            });
        }
        self.data.insert(name.to_string(), value);
        Ok(())
    }

    /// Iterates field names in schema order. Finite and restartable:
    /// re-iterating yields the same sequence.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.schema.field_names()
    }

    /// The ordered sequence of `(field name, current-or-default value)`
    /// pairs.
    pub fn items(&self) -> Vec<(&str, &Bson)> {
        self.schema
            .fields()
            .map(|(name, field)| {
                (name, self.data.get(name).unwrap_or_else(|| field.default()))
            })
            .collect()
    }

    /// The current primary key value; [`Bson::Null`] means "not yet
    /// persisted".
    pub fn primary_key(&self) -> &Bson {
        self.data.get(PK).unwrap_or(&Bson::Null)
    }

    /// Re-checks every field against its predicate.
    ///
    /// An unset primary key is always permitted; it only means the store
    /// has not assigned one yet.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] on the first violation found.
    pub fn validate(&self) -> ModelResult<()> {
        for (name, field) in self.schema.fields() {
            let value = self.data.get(name).unwrap_or_else(|| field.default());
            if field.kind() == FieldKind::PrimaryKey && matches!(value, Bson::Null) {
                continue;
            }
            if !field.is_valid(value) {
                return Err(ModelError::Validation {
                    class: self.schema.class_name().to_string(),
                    field: name.to_string(),
                    actual: value_type_name(value).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Serializes this instance to its wire-document shape.
    ///
    /// Fields appear in schema order with current-or-default values; `pk`
    /// is renamed to the type's configured external key name, and omitted
    /// entirely while unset so the store can assign a key. For any document
    /// that round-trips through a store this is the inverse of
    /// [`from_wire`](Instance::from_wire).
    pub fn to_wire(&self) -> WireDocument {
        let mut document = WireDocument::new();
        for (name, field) in self.schema.fields() {
            let value = self.data.get(name).unwrap_or_else(|| field.default());
            if name == PK {
                if matches!(value, Bson::Null) {
                    continue;
                }
                document.insert(self.schema.primary_key_field(), value.clone());
            } else {
                document.insert(name, value.clone());
            }
        }
        document
    }

    /// Persists this instance: full validation, then an insert through the
    /// connection collaborator.
    ///
    /// Insert-only: re-saving an already-persisted instance asks the store
    /// for a second insert under the same key, which the store will reject
    /// or duplicate according to its own rules. When the instance had no
    /// primary key and the store's acknowledgement carries generated keys,
    /// the first one is adopted as this instance's `pk`.
    ///
    /// # Errors
    ///
    /// [`ModelError::Validation`] before any store call when a field value
    /// fails its predicate; store failures propagate unmodified.
    pub fn save(&mut self, conn: &dyn Connection) -> ModelResult<WriteSummary> {
        self.validate()?;
        let document = self.to_wire();
        let summary = conn.insert(self.schema.collection(), document)?;
        if matches!(self.primary_key(), Bson::Null) {
            if let Some(key) = summary.generated_keys.first() {
                self.data.insert(PK.to_string(), key.clone());
            }
        }
        Ok(summary)
    }

    /// Removes the corresponding remote record.
    ///
    /// With no primary key value there is nothing to identify the record
    /// by: the call is a no-op, issues no store call, and returns `None`.
    /// The in-memory instance itself remains usable until discarded.
    ///
    /// # Errors
    ///
    /// Store failures propagate unmodified.
    pub fn delete(&self, conn: &dyn Connection) -> ModelResult<Option<WriteSummary>> {
        let key = self.primary_key();
        if matches!(key, Bson::Null) {
            return Ok(None);
        }
        conn.delete(self.schema.collection(), key).map(Some)
    }

    fn unknown_attribute(&self, name: &str) -> ModelError {
        ModelError::UnknownAttribute {
            class: self.schema.class_name().to_string(),
            field: name.to_string(),
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} object>", self.schema.class_name())
    }
}
