//! Query expression evaluation over stored wire documents.
//!
//! The in-memory backend has no native query language, so it evaluates
//! filter expressions itself by walking them with a [`QueryVisitor`] against
//! each stored row.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, datetime::DateTime};

use docmodel_core::{
    error::{ModelError, ModelResult},
    query::{Expr, FieldOp, QueryVisitor},
    wire::WireDocument,
};

/// Comparable normalization of wire values.
///
/// All integer widths and doubles normalize to `f64` so numbers compare
/// across representations. Values with no meaningful ordering compare as
/// unequal.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => {
                Comparable::Array(arr.iter().map(Comparable::from).collect::<Vec<_>>())
            }
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>(),
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates a filter expression against one stored row.
pub(crate) struct RowEvaluator<'a> {
    row: &'a WireDocument,
}

impl<'a> RowEvaluator<'a> {
    pub fn new(row: &'a WireDocument) -> Self {
        Self { row }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> ModelResult<bool> {
        self.visit_expr(expr)
    }

    /// Filters rows down to those matching `expr`.
    pub fn filter_rows(
        rows: impl IntoIterator<Item = &'a WireDocument>,
        expr: &Expr,
    ) -> ModelResult<Vec<WireDocument>> {
        Ok(rows
            .into_iter()
            .filter(|row| {
                RowEvaluator::new(row)
                    .evaluate(expr)
                    .unwrap_or(false)
            })
            .cloned()
            .collect::<Vec<_>>())
    }
}

impl<'a> QueryVisitor for RowEvaluator<'a> {
    type Output = bool;
    type Error = ModelError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(self.row.get(field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.row.get(field) else {
            return Ok(false);
        };

        match op {
            FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
            FieldOp::Ne => Ok(Comparable::from(field_value) != Comparable::from(value)),
            FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                    Some(ordering) => Ok(match op {
                        FieldOp::Gt => ordering == Ordering::Greater,
                        FieldOp::Gte => ordering != Ordering::Less,
                        FieldOp::Lt => ordering == Ordering::Less,
                        FieldOp::Lte => ordering != Ordering::Greater,
                        _ => unreachable!(),
                    }),
                    None => Ok(false),
                }
            }
            FieldOp::Contains => match Comparable::from(field_value) {
                Comparable::Array(array) => Ok(array
                    .iter()
                    .any(|item| item == &Comparable::from(value))),
                Comparable::String(left) => match Comparable::from(value) {
                    Comparable::String(right) => Ok(left.contains(right)),
                    _ => Ok(false),
                },
                _ => Ok(false),
            },
            FieldOp::StartsWith => match (Comparable::from(field_value), Comparable::from(value)) {
                (Comparable::String(left), Comparable::String(right)) => Ok(left.starts_with(right)),
                _ => Ok(false),
            },
            FieldOp::EndsWith => match (Comparable::from(field_value), Comparable::from(value)) {
                (Comparable::String(left), Comparable::String(right)) => Ok(left.ends_with(right)),
                _ => Ok(false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use docmodel_core::query::Filter;

    fn row() -> WireDocument {
        doc! { "name": "Ann", "age": 30, "tags": ["a", "b"] }
    }

    fn matches(expr: Expr) -> bool {
        let row = row();
        RowEvaluator::new(&row).evaluate(&expr).unwrap()
    }

    #[test]
    fn equality_compares_across_numeric_widths() {
        assert!(matches(Filter::eq("age", 30i64)));
        assert!(matches(Filter::eq("age", 30.0)));
        assert!(!matches(Filter::eq("age", 31)));
    }

    #[test]
    fn comparisons_follow_ordering() {
        assert!(matches(Filter::gt("age", 18)));
        assert!(matches(Filter::lte("age", 30)));
        assert!(!matches(Filter::lt("age", 30)));
    }

    #[test]
    fn contains_covers_strings_and_arrays() {
        assert!(matches(Filter::contains("name", "nn")));
        assert!(matches(Filter::contains("tags", "b")));
        assert!(!matches(Filter::contains("tags", "z")));
    }

    #[test]
    fn missing_fields_never_match_comparisons() {
        assert!(!matches(Filter::eq("nickname", "Ann")));
        assert!(matches(Filter::not_exists("nickname")));
        assert!(matches(Filter::exists("name")));
    }

    #[test]
    fn logical_composition() {
        assert!(matches(Filter::eq("name", "Ann").and(Filter::gt("age", 18))));
        assert!(matches(Filter::eq("name", "Zoe").or(Filter::eq("name", "Ann"))));
        assert!(!matches(Filter::eq("name", "Ann").not()));
    }
}
