//! Configuration file handling
//!
//! ```json
//! {
//!   "log_level": "info",
//!   "tuples_per_page": 64,
//!   "tables": [
//!     { "name": "people", "file": "people.tbl",
//!       "columns": [ { "name": "id", "type": "integer" },
//!                    { "name": "name", "type": "text" } ] }
//!   ]
//! }
//! ```
//!
//! Table file paths are resolved relative to the config file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::storage::DEFAULT_TUPLES_PER_PAGE;
use crate::tuple::{Schema, SchemaField, Type};

use super::errors::{CliError, CliResult};

/// One column of a configured table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// One table backed by a text file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub file: PathBuf,
    pub columns: Vec<ColumnConfig>,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Page size used when loading tables (optional, default 64)
    #[serde(default = "default_tuples_per_page")]
    pub tuples_per_page: usize,

    /// Tables to load (required, non-empty)
    pub tables: Vec<TableConfig>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_tuples_per_page() -> usize {
    DEFAULT_TUPLES_PER_PAGE
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.log_severity()?;

        if self.tuples_per_page == 0 {
            return Err(CliError::config_error("tuples_per_page must be > 0"));
        }

        if self.tables.is_empty() {
            return Err(CliError::config_error("tables must not be empty"));
        }

        let mut seen = HashSet::new();
        for table in &self.tables {
            if table.name.is_empty() {
                return Err(CliError::config_error("table name must not be empty"));
            }
            if !seen.insert(table.name.as_str()) {
                return Err(CliError::config_error(format!(
                    "duplicate table name: '{}'",
                    table.name
                )));
            }
            self.table_schema(table)?;
        }

        Ok(())
    }

    /// Parsed `log_level`. FATAL is not accepted.
    pub fn log_severity(&self) -> CliResult<Severity> {
        match self.log_level.parse::<Severity>() {
            Ok(Severity::Fatal) | Err(_) => Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error.",
                self.log_level
            ))),
            Ok(severity) => Ok(severity),
        }
    }

    /// Builds the schema of a configured table
    pub fn table_schema(&self, table: &TableConfig) -> CliResult<Schema> {
        if table.columns.is_empty() {
            return Err(CliError::config_error(format!(
                "table '{}' must have at least one column",
                table.name
            )));
        }
        let mut fields = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let column_type: Type = column.column_type.parse().map_err(|e| {
                CliError::config_error(format!("table '{}': {}", table.name, e))
            })?;
            fields.push(SchemaField::new(column.name.clone(), column_type));
        }
        Ok(Schema::new(fields)?)
    }

    /// Path of a table file, resolved against the config file's directory
    pub fn table_path(&self, table: &TableConfig) -> PathBuf {
        if table.file.is_absolute() {
            table.file.clone()
        } else {
            self.base_dir.join(&table.file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::errors::CliErrorCode;
    use serde_json::json;

    fn people_table() -> serde_json::Value {
        json!({
            "name": "people",
            "file": "people.tbl",
            "columns": [
                {"name": "id", "type": "integer"},
                {"name": "name", "type": "text"}
            ]
        })
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_json(&json!({"tables": [people_table()]}).to_string()).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tuples_per_page, DEFAULT_TUPLES_PER_PAGE);
        assert_eq!(config.log_severity().unwrap(), Severity::Info);
        let schema = config.table_schema(&config.tables[0]).unwrap();
        assert_eq!(schema.to_string(), "Integer(id), Text(name)");
    }

    #[test]
    fn test_empty_tables_rejected() {
        let err = Config::from_json(r#"{"tables": []}"#).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let raw = json!({"tuples_per_page": 0, "tables": [people_table()]}).to_string();
        assert!(Config::from_json(&raw).is_err());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let raw = json!({"tables": [people_table(), people_table()]}).to_string();
        let err = Config::from_json(&raw).unwrap_err();
        assert!(err.message().contains("duplicate"));
    }

    #[test]
    fn test_bad_column_type_rejected() {
        let raw = json!({"tables": [{
            "name": "t", "file": "t.tbl",
            "columns": [{"name": "x", "type": "float"}]
        }]})
        .to_string();
        let err = Config::from_json(&raw).unwrap_err();
        assert_eq!(err.code_str(), "REL_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_no_columns_rejected() {
        let raw = json!({"tables": [{"name": "t", "file": "t.tbl", "columns": []}]}).to_string();
        assert!(Config::from_json(&raw).is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let raw = json!({"log_level": "verbose", "tables": [people_table()]}).to_string();
        assert!(Config::from_json(&raw).is_err());
        let raw = json!({"log_level": "fatal", "tables": [people_table()]}).to_string();
        assert!(Config::from_json(&raw).is_err());
    }

    #[test]
    fn test_table_path_relative_to_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("relexec.json");
        fs::write(&path, json!({"tables": [people_table()]}).to_string()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.table_path(&config.tables[0]), dir.path().join("people.tbl"));
    }
}
