//! header-validate
//!
//! Command-line front end for `header-schema-core`.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Validate a header against a built-in schema
//! header-validate validate --header primary.yaml --schema PrimaryHeader
//!
//! # Validate against a schema declared in a document, reporting every finding
//! header-validate validate --header obs.json --schema ObservationHeader \
//!     --schema-file schemas.yaml --onerror log --format json
//!
//! # List and describe schemas
//! header-validate list
//! header-validate describe --schema BinTableHeader
//! ```

pub mod cli;
pub mod error;

pub use cli::{ExitCode, HeaderValidateCli, HeaderValidateCommands, OutputFormat};
pub use error::{CliError, Result};

/// Run the CLI and map any error to its exit code
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use header_schema_cli::{run_cli, HeaderValidateCli};
///
/// let cli = HeaderValidateCli::parse();
/// let exit_code = run_cli(cli);
/// std::process::exit(exit_code.into());
/// ```
pub fn run_cli(cli: HeaderValidateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
