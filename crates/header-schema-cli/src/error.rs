//! Error types for the header-validate CLI

use header_schema_core::{Error as CoreError, SchemaError};
use thiserror::Error;

use crate::cli::ExitCode;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Error from the schema engine
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A named schema is not in the registry
    #[error("Unknown schema: '{0}'. Use `header-validate list` to see available schemas")]
    UnknownSchema(String),

    /// Invalid command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rendering output failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<SchemaError> for CliError {
    fn from(err: SchemaError) -> Self {
        CliError::Core(CoreError::Schema(err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl CliError {
    /// Exit code reported for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Core(CoreError::FileError(_)) => ExitCode::FileError,
            CliError::Core(CoreError::ParseError(_)) => ExitCode::InvalidInput,
            CliError::Core(CoreError::Schema(_)) => ExitCode::SchemaError,
            CliError::Core(CoreError::Validation(_)) => ExitCode::ValidationError,
            CliError::Core(CoreError::UnknownKeyword(_)) => ExitCode::InvalidInput,
            CliError::UnknownSchema(_) => ExitCode::SchemaError,
            CliError::InvalidInput(_) => ExitCode::InvalidInput,
            CliError::Serialization(_) => ExitCode::InternalError,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
