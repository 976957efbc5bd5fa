//! Field descriptors: the typed, defaulted attributes of a document type.
//!
//! A [`Field`] describes one schema attribute: its semantic kind, its default
//! value, and the validity predicate derived from the kind. Fields are created
//! once at schema-build time, are immutable thereafter, and are shared by every
//! instance of the owning document type.

use bson::Bson;

/// The semantic kind of a field, determining which wire values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text. Accepts [`Bson::String`].
    Text,
    /// Whole numbers. Accepts [`Bson::Int32`] and [`Bson::Int64`].
    Integer,
    /// Floating-point numbers. Accepts [`Bson::Double`].
    Float,
    /// Booleans. Accepts [`Bson::Boolean`].
    Boolean,
    /// Ordered sequences. Accepts [`Bson::Array`].
    List,
    /// Nested key-value objects. Accepts [`Bson::Document`].
    Map,
    /// The reserved document identity field. Accepts string and integer
    /// keys, plus [`Bson::Null`] meaning "not yet assigned".
    PrimaryKey,
}

impl FieldKind {
    /// Returns whether `value` conforms to this kind.
    ///
    /// Pure and total: a boolean result only, no side effects, no errors.
    pub fn accepts(&self, value: &Bson) -> bool {
        match self {
            FieldKind::Text => matches!(value, Bson::String(_)),
            FieldKind::Integer => matches!(value, Bson::Int32(_) | Bson::Int64(_)),
            FieldKind::Float => matches!(value, Bson::Double(_)),
            FieldKind::Boolean => matches!(value, Bson::Boolean(_)),
            FieldKind::List => matches!(value, Bson::Array(_)),
            FieldKind::Map => matches!(value, Bson::Document(_)),
            FieldKind::PrimaryKey => matches!(
                value,
                Bson::Null | Bson::String(_) | Bson::Int32(_) | Bson::Int64(_)
            ),
        }
    }
}

/// One named, typed, defaulted attribute of a document type.
///
/// Constructed through the typed constructors (`text`, `integer`, ...), which
/// guarantee that the validity predicate accepts the default value.
///
/// # Example
///
/// ```ignore
/// use docmodel::field::Field;
///
/// let name = Field::text("");
/// let age = Field::integer(0).nullable();
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    default: Bson,
    nullable: bool,
}

impl Field {
    fn new(kind: FieldKind, default: Bson) -> Self {
        Self { kind, default, nullable: false }
    }

    /// A text field with the given default.
    pub fn text(default: impl Into<String>) -> Self {
        Self::new(FieldKind::Text, Bson::String(default.into()))
    }

    /// An integer field with the given default.
    pub fn integer(default: i64) -> Self {
        Self::new(FieldKind::Integer, Bson::Int64(default))
    }

    /// A floating-point field with the given default.
    pub fn float(default: f64) -> Self {
        Self::new(FieldKind::Float, Bson::Double(default))
    }

    /// A boolean field with the given default.
    pub fn boolean(default: bool) -> Self {
        Self::new(FieldKind::Boolean, Bson::Boolean(default))
    }

    /// A list field defaulting to an empty array.
    pub fn list() -> Self {
        Self::new(FieldKind::List, Bson::Array(Vec::new()))
    }

    /// A nested-object field defaulting to an empty document.
    pub fn map() -> Self {
        Self::new(FieldKind::Map, Bson::Document(bson::Document::new()))
    }

    /// The reserved identity descriptor. Defaults to [`Bson::Null`],
    /// representing "unassigned".
    pub fn primary_key() -> Self {
        Self::new(FieldKind::PrimaryKey, Bson::Null)
    }

    /// Additionally permits [`Bson::Null`] as a valid value for this field.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns whether `value` conforms to this field's declared kind.
    pub fn is_valid(&self, value: &Bson) -> bool {
        if self.nullable && matches!(value, Bson::Null) {
            return true;
        }
        self.kind.accepts(value)
    }

    /// The value an instance reports for this field when none has been set.
    pub fn default(&self) -> &Bson {
        &self.default
    }

    /// The semantic kind of this field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// Renders the runtime type of a wire value for diagnostics.
pub(crate) fn value_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::Double(_) => "Double",
        Bson::String(_) => "String",
        Bson::Array(_) => "Array",
        Bson::Document(_) => "Document",
        Bson::Boolean(_) => "Boolean",
        Bson::Null => "Null",
        Bson::Int32(_) => "Int32",
        Bson::Int64(_) => "Int64",
        Bson::DateTime(_) => "DateTime",
        _ => "Other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::bson;

    #[test]
    fn defaults_are_valid_for_every_constructor() {
        let fields = [
            Field::text("hello"),
            Field::integer(7),
            Field::float(1.5),
            Field::boolean(true),
            Field::list(),
            Field::map(),
            Field::primary_key(),
        ];
        for field in &fields {
            assert!(field.is_valid(field.default()), "{:?}", field.kind());
        }
    }

    #[test]
    fn text_rejects_non_strings() {
        let field = Field::text("");
        assert!(field.is_valid(&bson!("ok")));
        assert!(!field.is_valid(&bson!(3)));
        assert!(!field.is_valid(&Bson::Null));
    }

    #[test]
    fn integer_accepts_both_widths() {
        let field = Field::integer(0);
        assert!(field.is_valid(&Bson::Int32(1)));
        assert!(field.is_valid(&Bson::Int64(1)));
        assert!(!field.is_valid(&Bson::Double(1.0)));
    }

    #[test]
    fn primary_key_reports_null_as_valid() {
        let field = Field::primary_key();
        assert!(field.is_valid(&Bson::Null));
        assert!(field.is_valid(&bson!("3f2a")));
        assert!(field.is_valid(&bson!(42)));
        assert!(!field.is_valid(&bson!([1, 2])));
    }

    #[test]
    fn nullable_permits_null_on_top_of_the_kind() {
        let field = Field::integer(0).nullable();
        assert!(field.is_valid(&Bson::Null));
        assert!(field.is_valid(&bson!(9)));
        assert!(!field.is_valid(&bson!("nine")));
    }
}
