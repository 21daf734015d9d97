//! Value domain: `Type` and `Field`
//!
//! Supported types:
//! - Integer: 32-bit signed integer, 4 bytes wide
//! - Text: UTF-8 string of at most 128 bytes, 132 bytes wide (length prefix + payload)
//!
//! Widths are used for size accounting only. No binary layout is defined here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{TupleError, TupleResult};

/// Maximum length of a Text value in bytes
pub const TEXT_MAX_LEN: usize = 128;

/// Closed set of column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// 32-bit signed integer
    Integer,
    /// Bounded UTF-8 string
    Text,
}

impl Type {
    /// Fixed serialized width in bytes
    pub fn len(&self) -> usize {
        match self {
            Type::Integer => 4,
            Type::Text => TEXT_MAX_LEN + 4,
        }
    }

    /// Type-appropriate zero value used to initialise fresh tuples
    pub fn default_field(&self) -> Field {
        match self {
            Type::Integer => Field::Integer(0),
            Type::Text => Field::Text(String::new()),
        }
    }

    /// Returns the type name used in schema descriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            Type::Integer => "Integer",
            Type::Text => "Text",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl FromStr for Type {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Type::Integer),
            "text" | "string" => Ok(Type::Text),
            other => Err(format!("unknown column type '{}'", other)),
        }
    }
}

/// A single typed value.
///
/// Equality and hashing are structural: same variant and same value.
/// Ordering is numeric for Integer and lexicographic for Text. Values of
/// different variants are never compared by predicates (see
/// `CompareOp::apply`), so the derived cross-variant order is only used
/// for deterministic sorting in tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Integer(i32),
    Text(String),
}

impl Field {
    /// Builds a Text field, rejecting values wider than `TEXT_MAX_LEN`
    pub fn text(value: impl Into<String>) -> TupleResult<Self> {
        let field = Field::Text(value.into());
        field.check_width()?;
        Ok(field)
    }

    /// Returns the type of this value
    pub fn field_type(&self) -> Type {
        match self {
            Field::Integer(_) => Type::Integer,
            Field::Text(_) => Type::Text,
        }
    }

    /// Returns the integer payload, if any
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Field::Integer(v) => Some(*v),
            Field::Text(_) => None,
        }
    }

    /// Returns the text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Integer(_) => None,
            Field::Text(s) => Some(s),
        }
    }

    /// Fails with `TypeMismatch` unless this value has type `expected`
    pub fn expect_type(&self, expected: Type) -> TupleResult<()> {
        let found = self.field_type();
        if found != expected {
            return Err(TupleError::TypeMismatch { expected, found });
        }
        Ok(())
    }

    /// Fails with `TextTooLong` if a Text value is wider than `TEXT_MAX_LEN`
    pub fn check_width(&self) -> TupleResult<()> {
        match self {
            Field::Text(s) if s.len() > TEXT_MAX_LEN => Err(TupleError::TextTooLong { len: s.len() }),
            _ => Ok(()),
        }
    }

    /// Checks that this value may be stored in a column of type `expected`
    pub fn validate_for(&self, expected: Type) -> TupleResult<()> {
        self.expect_type(expected)?;
        self.check_width()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Integer(v) => write!(f, "{}", v),
            Field::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Integer(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_type_widths() {
        assert_eq!(Type::Integer.len(), 4);
        assert_eq!(Type::Text.len(), 132);
    }

    #[test]
    fn test_default_fields() {
        assert_eq!(Type::Integer.default_field(), Field::Integer(0));
        assert_eq!(Type::Text.default_field(), Field::Text(String::new()));
    }

    #[test]
    fn test_type_parse() {
        assert_eq!("int".parse::<Type>().unwrap(), Type::Integer);
        assert_eq!("INTEGER".parse::<Type>().unwrap(), Type::Integer);
        assert_eq!("string".parse::<Type>().unwrap(), Type::Text);
        assert!("float".parse::<Type>().is_err());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Field::Integer(1), Field::Integer(1));
        assert_ne!(Field::Integer(1), Field::Integer(2));
        assert_ne!(Field::Integer(1), Field::Text("1".into()));
        assert_eq!(Field::Text("a".into()), Field::Text("a".into()));
    }

    #[test]
    fn test_fields_as_map_keys() {
        let mut counts: HashMap<Field, usize> = HashMap::new();
        for f in [Field::Integer(1), Field::Integer(1), Field::Text("1".into())] {
            *counts.entry(f).or_default() += 1;
        }
        assert_eq!(counts[&Field::Integer(1)], 2);
        assert_eq!(counts[&Field::Text("1".into())], 1);
    }

    #[test]
    fn test_ordering_within_variant() {
        assert!(Field::Integer(-3) < Field::Integer(2));
        assert!(Field::Text("apple".into()) < Field::Text("banana".into()));
        assert!(Field::Text("Z".into()) < Field::Text("a".into()));
    }

    #[test]
    fn test_text_width_enforced() {
        assert!(Field::text("x".repeat(TEXT_MAX_LEN)).is_ok());
        let err = Field::text("x".repeat(TEXT_MAX_LEN + 1)).unwrap_err();
        assert_eq!(err, TupleError::TextTooLong { len: TEXT_MAX_LEN + 1 });
    }

    #[test]
    fn test_display() {
        assert_eq!(Field::Integer(-7).to_string(), "-7");
        assert_eq!(Field::Text("abc".into()).to_string(), "abc");
    }

    #[test]
    fn test_json_untagged() {
        let f: Field = serde_json::from_str("42").unwrap();
        assert_eq!(f, Field::Integer(42));
        let f: Field = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(f, Field::Text("x".into()));
    }
}
