//! header-validate CLI
//!
//! # Usage
//!
//! ```bash
//! header-validate validate --header primary.yaml --schema PrimaryHeader --onerror log
//! header-validate list --format json
//! header-validate describe --schema PrimaryHeader
//! ```
//!
//! # Exit Codes
//!
//! - 0: Header is valid
//! - 1: Validation failed with errors
//! - 2: Validation passed with warnings
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Schema definition or lookup error
//! - 10: Internal error

use clap::Parser;
use header_schema_cli::{run_cli, HeaderValidateCli};
use tracing::Level;

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() {
    let cli = HeaderValidateCli::parse();

    // stdout carries results, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level(cli.verbose, cli.quiet).into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
