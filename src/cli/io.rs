//! Plain-text I/O for the CLI
//!
//! - Input: one JSON operator tree, from a file or stdin
//! - Output: result tuples in the textual tuple format on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use super::errors::{CliError, CliResult};

/// Read the operator tree from `path`, or from stdin when absent
pub fn read_plan(path: Option<&Path>) -> CliResult<String> {
    let raw = match path {
        Some(p) => fs::read_to_string(p)
            .map_err(|e| CliError::io_error(format!("Failed to read plan {}: {}", p.display(), e)))?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    if raw.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(raw)
}

/// Write rendered output to stdout
pub fn write_output(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_plan_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(&path, r#"{"op":"scan","table":"t"}"#).unwrap();
        assert!(read_plan(Some(&path)).unwrap().contains("scan"));
    }

    #[test]
    fn test_read_plan_empty_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(&path, "\n").unwrap();
        assert_eq!(read_plan(Some(&path)).unwrap_err().code_str(), "REL_CLI_IO_ERROR");
    }

    #[test]
    fn test_read_plan_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_plan(Some(&dir.path().join("absent.json"))).is_err());
    }
}
