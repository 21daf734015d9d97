//! Tuples: fixed-arity rows bound to a schema

use std::fmt;
use std::sync::Arc;

use crate::storage::PageId;

use super::errors::{TupleError, TupleResult};
use super::field::Field;
use super::schema::Schema;

/// Storage origin of a tuple: page plus slot within that page.
///
/// Provenance only. Never part of tuple identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub page_id: PageId,
    pub slot: usize,
}

impl RecordId {
    pub fn new(page_id: PageId, slot: usize) -> Self {
        Self { page_id, slot }
    }
}

/// A row of typed values.
///
/// The field vector always has exactly `schema.num_fields()` entries.
#[derive(Debug, Clone)]
pub struct Tuple {
    schema: Arc<Schema>,
    fields: Vec<Field>,
    record_id: Option<RecordId>,
}

impl Tuple {
    /// Creates a tuple whose fields hold each type's zero value
    pub fn new(schema: Arc<Schema>) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|f| f.field_type.default_field())
            .collect();
        Self {
            schema,
            fields,
            record_id: None,
        }
    }

    /// Creates a tuple from a full value list, checking arity and types
    pub fn from_fields(schema: Arc<Schema>, fields: Vec<Field>) -> TupleResult<Self> {
        if fields.len() != schema.num_fields() {
            return Err(TupleError::ArityMismatch {
                expected: schema.num_fields(),
                found: fields.len(),
            });
        }
        for (field, column) in fields.iter().zip(schema.fields()) {
            field.validate_for(column.field_type)?;
        }
        Ok(Self {
            schema,
            fields,
            record_id: None,
        })
    }

    /// Concatenates `left`'s fields and `right`'s fields under `schema`.
    ///
    /// `schema` must be `Schema::merge` of the two input schemas.
    pub fn concat(schema: Arc<Schema>, left: &Tuple, right: &Tuple) -> TupleResult<Self> {
        let mut fields = Vec::with_capacity(left.fields.len() + right.fields.len());
        fields.extend(left.fields.iter().cloned());
        fields.extend(right.fields.iter().cloned());
        Self::from_fields(schema, fields)
    }

    /// Returns the schema this tuple is bound to
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the number of fields
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns field `i`
    pub fn field(&self, i: usize) -> TupleResult<&Field> {
        self.fields
            .get(i)
            .ok_or(TupleError::index(i, self.fields.len()))
    }

    /// Replaces field `i`. The value must match the column type and width.
    pub fn set_field(&mut self, i: usize, value: Field) -> TupleResult<()> {
        let expected = self.schema.field_type(i)?;
        value.validate_for(expected)?;
        self.fields[i] = value;
        Ok(())
    }

    /// Returns all fields in schema order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the storage origin, if known
    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Sets the storage origin
    pub fn set_record_id(&mut self, rid: Option<RecordId>) {
        self.record_id = rid;
    }

    /// Rebinds this tuple to a type-equal schema (e.g. an alias-qualified one)
    pub fn reset_schema(&mut self, schema: Arc<Schema>) -> TupleResult<()> {
        self.schema.check_type_equal(&schema)?;
        self.schema = schema;
        Ok(())
    }
}

/// Equality compares values only. Schema names and record ids are ignored.
impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Tuple {}

/// Textual tuple format: fields in schema order separated by a single space
impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::{Type, TEXT_MAX_LEN};

    fn people() -> Arc<Schema> {
        Arc::new(Schema::from_parts(&[Type::Integer, Type::Text], &[Some("id"), Some("name")]).unwrap())
    }

    #[test]
    fn test_new_tuple_has_defaults() {
        let t = Tuple::new(people());
        assert_eq!(t.num_fields(), 2);
        assert_eq!(t.field(0).unwrap(), &Field::Integer(0));
        assert_eq!(t.field(1).unwrap(), &Field::Text(String::new()));
        assert!(t.record_id().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let mut t = Tuple::new(people());
        t.set_field(0, Field::Integer(9)).unwrap();
        t.set_field(1, Field::Text("bob".into())).unwrap();
        assert_eq!(t.to_string(), "9 bob");
    }

    #[test]
    fn test_out_of_range_fails_fast() {
        let mut t = Tuple::new(people());
        assert_eq!(t.field(2).unwrap_err(), TupleError::index(2, 2));
        assert_eq!(
            t.set_field(5, Field::Integer(1)).unwrap_err(),
            TupleError::index(5, 2)
        );
    }

    #[test]
    fn test_set_field_checks_type() {
        let mut t = Tuple::new(people());
        let err = t.set_field(0, Field::Text("x".into())).unwrap_err();
        assert!(matches!(err, TupleError::TypeMismatch { .. }));
    }

    #[test]
    fn test_from_fields_checks_arity() {
        let err = Tuple::from_fields(people(), vec![Field::Integer(1)]).unwrap_err();
        assert_eq!(err, TupleError::ArityMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn test_record_id_not_part_of_equality() {
        let a = Tuple::from_fields(people(), vec![Field::Integer(1), Field::Text("a".into())]).unwrap();
        let mut b = a.clone();
        b.set_record_id(Some(RecordId::new(PageId::new(1, 0), 3)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_concat() {
        let left = Tuple::from_fields(people(), vec![Field::Integer(1), Field::Text("a".into())]).unwrap();
        let right = Tuple::from_fields(people(), vec![Field::Integer(1), Field::Text("x".into())]).unwrap();
        let merged = Arc::new(Schema::merge(left.schema(), right.schema()));
        let out = Tuple::concat(merged, &left, &right).unwrap();
        assert_eq!(out.to_string(), "1 a 1 x");
    }

    #[test]
    fn test_reset_schema_requires_type_equality() {
        let mut t = Tuple::new(people());
        let aliased = Arc::new(people().with_prefix("p"));
        t.reset_schema(aliased).unwrap();
        assert_eq!(t.schema().field_name(0).unwrap(), Some("p.id"));

        let other = Arc::new(Schema::unnamed(&[Type::Integer]).unwrap());
        assert_eq!(
            t.reset_schema(other).unwrap_err(),
            TupleError::ArityMismatch { expected: 2, found: 1 }
        );
    }

    #[test]
    fn test_reset_schema_reports_differing_column() {
        let mut t = Tuple::new(people());
        let swapped = Arc::new(Schema::unnamed(&[Type::Integer, Type::Integer]).unwrap());
        assert_eq!(
            t.reset_schema(swapped).unwrap_err(),
            TupleError::TypeMismatch {
                expected: Type::Text,
                found: Type::Integer,
            }
        );
    }

    #[test]
    fn test_from_fields_rejects_wide_text() {
        let wide = Field::Text("x".repeat(TEXT_MAX_LEN + 72));
        let err = Tuple::from_fields(people(), vec![Field::Integer(1), wide]).unwrap_err();
        assert_eq!(err, TupleError::TextTooLong { len: TEXT_MAX_LEN + 72 });
    }

    #[test]
    fn test_set_field_rejects_wide_text() {
        let mut t = Tuple::new(people());
        let err = t.set_field(1, Field::Text("y".repeat(200))).unwrap_err();
        assert_eq!(err, TupleError::TextTooLong { len: 200 });
        assert_eq!(t.field(1).unwrap(), &Field::Text(String::new()));

        t.set_field(1, Field::Text("z".repeat(TEXT_MAX_LEN))).unwrap();
    }
}
