//! Tuple model for relexec
//!
//! Typed values, schemas and rows shared by storage and every operator.
//!
//! # Invariants
//!
//! - Field equality and hashing are structural (variant + value)
//! - A schema has at least one field
//! - Schema equality compares arity and types, never names
//! - A tuple always holds exactly `schema.num_fields()` values
//! - Invalid field indices fail fast with `IndexOutOfRange`

mod errors;
mod field;
mod schema;
pub mod text;
#[allow(clippy::module_inception)]
mod tuple;

pub use errors::{TupleError, TupleResult};
pub use field::{Field, Type, TEXT_MAX_LEN};
pub use schema::{Schema, SchemaField, UNNAMED};
pub use tuple::{RecordId, Tuple};
