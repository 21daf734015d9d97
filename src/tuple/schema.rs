//! Tuple schema: an ordered list of (name, type) pairs

use std::fmt;
use std::hash::{Hash, Hasher};

use super::errors::{TupleError, TupleResult};
use super::field::Type;

/// Placeholder rendered for fields without a name
pub const UNNAMED: &str = "unnamed";

/// One column of a schema
#[derive(Debug, Clone)]
pub struct SchemaField {
    /// Column name, absent for anonymous columns
    pub name: Option<String>,
    /// Column type
    pub field_type: Type,
}

impl SchemaField {
    /// Creates a named column
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Self {
            name: Some(name.into()),
            field_type,
        }
    }

    /// Creates an anonymous column
    pub fn unnamed(field_type: Type) -> Self {
        Self {
            name: None,
            field_type,
        }
    }

    /// Returns the name or the `unnamed` placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }
}

/// Describes the shape of a tuple.
///
/// Invariant: at least one field. Names may repeat or be absent.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    /// Creates a schema from explicit columns
    pub fn new(fields: Vec<SchemaField>) -> TupleResult<Self> {
        if fields.is_empty() {
            return Err(TupleError::EmptySchema);
        }
        Ok(Self { fields })
    }

    /// Creates a schema from parallel type and name lists
    pub fn from_parts(types: &[Type], names: &[Option<&str>]) -> TupleResult<Self> {
        if types.len() != names.len() {
            return Err(TupleError::ArityMismatch {
                expected: types.len(),
                found: names.len(),
            });
        }
        Self::new(
            types
                .iter()
                .zip(names)
                .map(|(t, n)| SchemaField {
                    name: n.map(str::to_string),
                    field_type: *t,
                })
                .collect(),
        )
    }

    /// Creates a schema of anonymous columns
    pub fn unnamed(types: &[Type]) -> TupleResult<Self> {
        Self::new(types.iter().copied().map(SchemaField::unnamed).collect())
    }

    /// Returns the number of fields
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns the columns in order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Returns the type sequence
    pub fn types(&self) -> Vec<Type> {
        self.fields.iter().map(|f| f.field_type).collect()
    }

    fn field(&self, i: usize) -> TupleResult<&SchemaField> {
        self.fields.get(i).ok_or(TupleError::index(i, self.fields.len()))
    }

    /// Returns the (possibly absent) name of field `i`
    pub fn field_name(&self, i: usize) -> TupleResult<Option<&str>> {
        Ok(self.field(i)?.name.as_deref())
    }

    /// Returns the type of field `i`
    pub fn field_type(&self, i: usize) -> TupleResult<Type> {
        Ok(self.field(i)?.field_type)
    }

    /// Returns the index of the first field named `name`
    pub fn index_of(&self, name: &str) -> TupleResult<usize> {
        self.fields
            .iter()
            .position(|f| f.name.as_deref() == Some(name))
            .ok_or_else(|| TupleError::NoSuchField(name.to_string()))
    }

    /// Size in bytes of a tuple with this schema
    pub fn size(&self) -> usize {
        self.fields.iter().map(|f| f.field_type.len()).sum()
    }

    /// Concatenates two schemas: `a`'s fields followed by `b`'s
    pub fn merge(a: &Schema, b: &Schema) -> Schema {
        let mut fields = Vec::with_capacity(a.num_fields() + b.num_fields());
        fields.extend(a.fields.iter().cloned());
        fields.extend(b.fields.iter().cloned());
        Schema { fields }
    }

    /// Qualifies every named field as `alias.name`
    pub fn with_prefix(&self, alias: &str) -> Schema {
        Schema {
            fields: self
                .fields
                .iter()
                .map(|f| SchemaField {
                    name: f.name.as_ref().map(|n| format!("{}.{}", alias, n)),
                    field_type: f.field_type,
                })
                .collect(),
        }
    }

    /// Fails unless `other` is type-equal to this schema.
    ///
    /// Differing lengths report `ArityMismatch`. Otherwise the first
    /// differing column reports `TypeMismatch`.
    pub fn check_type_equal(&self, other: &Schema) -> TupleResult<()> {
        if self.fields.len() != other.fields.len() {
            return Err(TupleError::ArityMismatch {
                expected: self.fields.len(),
                found: other.fields.len(),
            });
        }
        for (a, b) in self.fields.iter().zip(&other.fields) {
            if a.field_type != b.field_type {
                return Err(TupleError::TypeMismatch {
                    expected: a.field_type,
                    found: b.field_type,
                });
            }
        }
        Ok(())
    }
}

/// Type equality: same arity and same type at every position.
///
/// Field names are deliberately not compared. Anything that keys on
/// schema identity (a catalog, for instance) must compare names itself.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.field_type == b.field_type)
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for f in &self.fields {
            f.field_type.hash(state);
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}({})", field.field_type, field.display_name())?;
        }
        Ok(())
    }
}
