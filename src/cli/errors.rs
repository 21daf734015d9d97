//! CLI-specific error types
//!
//! Errors from the executor and tuple model keep their own codes so the
//! printed `CODE: message` line names the real failure.

use std::fmt;
use std::io;

use crate::executor::ExecError;
use crate::tuple::TupleError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Operator tree could not be built
    PlanError,
    /// Failure raised by the executor or tuple model, with its own code
    Execution(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "REL_CLI_CONFIG_ERROR",
            Self::IoError => "REL_CLI_IO_ERROR",
            Self::PlanError => "REL_CLI_PLAN_ERROR",
            Self::Execution(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Plan error
    pub fn plan_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::PlanError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::plan_error(format!("JSON error: {}", e))
    }
}

impl From<ExecError> for CliError {
    fn from(e: ExecError) -> Self {
        Self::new(CliErrorCode::Execution(e.code()), e.to_string())
    }
}

impl From<TupleError> for CliError {
    fn from(e: TupleError) -> Self {
        match e {
            TupleError::Io { .. } => Self::io_error(e.to_string()),
            _ => Self::new(CliErrorCode::Execution(e.code()), e.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
