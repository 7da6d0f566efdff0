//! CLI module for header-validate
//!
//! Validates header files against named schemas, lists the schemas a
//! registry knows about, and describes a schema's cards grouped by the
//! schema that declared them.

pub mod commands;
pub mod output;

pub use commands::{HeaderValidateCli, HeaderValidateCommands};
pub use output::{OutputFormat, ReportOutput, SchemaOutput};

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Header is valid and produced no warnings
    Success = 0,
    /// Validation failed with errors
    ValidationError = 1,
    /// Validation passed with warnings
    ValidationWarning = 2,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Schema definition or lookup errors
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a validation outcome
    pub fn from_validation_result(has_errors: bool, has_warnings: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else if has_warnings {
            ExitCode::ValidationWarning
        } else {
            ExitCode::Success
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: HeaderValidateCli) -> Result<ExitCode, CliError> {
    match cli.command {
        HeaderValidateCommands::Validate {
            header,
            schema,
            schema_files,
            onerror,
            format,
        } => commands::execute_validate(&header, &schema, &schema_files, &onerror, format),
        HeaderValidateCommands::List {
            schema_files,
            format,
        } => commands::execute_list(&schema_files, format),
        HeaderValidateCommands::Describe {
            schema,
            schema_files,
            format,
        } => commands::execute_describe(&schema, &schema_files, format),
    }
}
