//! Textual tuple format
//!
//! One tuple per line, fields in schema order separated by a single
//! whitespace character. Blank lines and `#` comments are skipped when
//! parsing. Text values therefore cannot contain whitespace.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::errors::{TupleError, TupleResult};
use super::field::{Field, Type};
use super::schema::Schema;
use super::tuple::Tuple;

/// Parses one line into a tuple. `line_no` is 1-based and used in errors.
pub fn parse_line(schema: &Arc<Schema>, line: &str, line_no: usize) -> TupleResult<Tuple> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != schema.num_fields() {
        return Err(TupleError::Parse {
            line: line_no,
            reason: format!(
                "expected {} fields, found {}",
                schema.num_fields(),
                parts.len()
            ),
        });
    }

    let mut fields = Vec::with_capacity(parts.len());
    for (raw, column) in parts.iter().zip(schema.fields()) {
        let field = match column.field_type {
            Type::Integer => raw.parse::<i32>().map(Field::Integer).map_err(|e| {
                TupleError::Parse {
                    line: line_no,
                    reason: format!("column '{}': {}", column.display_name(), e),
                }
            })?,
            Type::Text => Field::text(*raw).map_err(|e| TupleError::Parse {
                line: line_no,
                reason: format!("column '{}': {}", column.display_name(), e),
            })?,
        };
        fields.push(field);
    }

    Tuple::from_fields(Arc::clone(schema), fields)
}

/// Parses a whole document
pub fn parse_tuples(schema: &Arc<Schema>, input: &str) -> TupleResult<Vec<Tuple>> {
    let mut tuples = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        tuples.push(parse_line(schema, trimmed, i + 1)?);
    }
    Ok(tuples)
}

/// Renders tuples, one per line, each line newline-terminated
pub fn render_tuples<'a>(tuples: impl IntoIterator<Item = &'a Tuple>) -> String {
    let mut out = String::new();
    for t in tuples {
        out.push_str(&t.to_string());
        out.push('\n');
    }
    out
}

/// Reads and parses a table file
pub fn load_table(path: &Path, schema: &Arc<Schema>) -> TupleResult<Vec<Tuple>> {
    let content = fs::read_to_string(path).map_err(|e| TupleError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_tuples(schema, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Arc<Schema> {
        Arc::new(Schema::from_parts(&[Type::Integer, Type::Text], &[Some("id"), Some("name")]).unwrap())
    }

    #[test]
    fn test_parse_scenario_rows() {
        let tuples = parse_tuples(&people(), "1 a\n1 b\n2 c\n").unwrap();
        assert_eq!(tuples.len(), 3);
        assert_eq!(tuples[2].field(0).unwrap(), &Field::Integer(2));
        assert_eq!(tuples[2].field(1).unwrap(), &Field::Text("c".into()));
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let tuples = parse_tuples(&people(), "# header\n\n1 a\n   \n2 b\n").unwrap();
        assert_eq!(tuples.len(), 2);
    }

    #[test]
    fn test_arity_error_reports_line() {
        let err = parse_tuples(&people(), "1 a\n2\n").unwrap_err();
        match err {
            TupleError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 2 fields, found 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_integer() {
        let err = parse_line(&people(), "x a", 7).unwrap_err();
        assert!(matches!(err, TupleError::Parse { line: 7, .. }));
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_render_matches_display() {
        let tuples = parse_tuples(&people(), "1 a\n-4 zz\n").unwrap();
        assert_eq!(render_tuples(&tuples), "1 a\n-4 zz\n");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_table(&dir.path().join("absent.tbl"), &people()).unwrap_err();
        assert!(matches!(err, TupleError::Io { .. }));
        assert_eq!(err.code(), "REL_TABLE_READ_FAILED");
    }

    #[test]
    fn test_load_table_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("people.tbl");
        fs::write(&path, "1 a
2 b
").unwrap();
        assert_eq!(load_table(&path, &people()).unwrap().len(), 2);
    }

    #[test]
    fn test_render_then_parse_is_stable() {
        let input = "10 ten\n20 twenty\n";
        let tuples = parse_tuples(&people(), input).unwrap();
        let again = parse_tuples(&people(), &render_tuples(&tuples)).unwrap();
        assert_eq!(tuples, again);
    }
}
