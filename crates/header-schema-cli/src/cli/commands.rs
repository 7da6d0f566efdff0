//! CLI command definitions for header-validate
//!
//! Provides Clap-based command definitions for validating header files,
//! listing known schemas, and describing a schema's cards.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use header_schema_core::{
    read_document, Header, OnError, Schema, SchemaError, SchemaRegistry, ValidationReport,
};

use super::output::{OutputFormat, ReportOutput, SchemaOutput, SchemaSummary};
use super::ExitCode;
use crate::error::{CliError, Result};

/// Header schema validator
///
/// Validate FITS-style headers against the built-in schemas or schemas
/// declared in YAML, JSON or TOML documents.
#[derive(Parser, Debug)]
#[command(name = "header-validate")]
#[command(about = "Validate ordered keyword/value headers against declarative schemas", long_about = None)]
#[command(version)]
pub struct HeaderValidateCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: HeaderValidateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum HeaderValidateCommands {
    /// Validate a header file against a schema
    ///
    /// The header file is a mapping of keyword to value (or to
    /// `{value, comment}`), or a list of `{keyword, value, comment}` cards.
    /// Card order in the file is the header order.
    Validate {
        /// Path to the header file (json, yaml, yml or toml)
        #[arg(long)]
        header: PathBuf,

        /// Name of the schema to validate against
        #[arg(short, long)]
        schema: String,

        /// Schema documents to load before resolving the schema name
        #[arg(long = "schema-file")]
        schema_files: Vec<PathBuf>,

        /// Error policy: `raise` stops at the first error, `log` reports all findings
        #[arg(long, env = "HEADER_SCHEMA_ONERROR", default_value = "raise")]
        onerror: String,

        /// Output format for validation results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// List available schemas
    List {
        /// Schema documents to load in addition to the built-in schemas
        #[arg(long = "schema-file")]
        schema_files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Describe a schema's cards, grouped by declaring schema
    Describe {
        /// Name of the schema to describe
        #[arg(short, long)]
        schema: String,

        /// Schema documents to load before resolving the schema name
        #[arg(long = "schema-file")]
        schema_files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Registry with the built-in schemas plus every given document
pub fn build_registry(schema_files: &[PathBuf]) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::with_standard()?;
    for path in schema_files {
        registry.load_file(path)?;
    }
    Ok(registry)
}

/// Look a schema up by name
pub fn resolve_schema(registry: &SchemaRegistry, name: &str) -> Result<Arc<Schema>> {
    registry
        .get(name)
        .ok_or_else(|| CliError::UnknownSchema(name.to_string()))
}

/// Parse an `--onerror` value
pub fn parse_policy(onerror: &str) -> Result<OnError> {
    onerror
        .parse()
        .map_err(|e: SchemaError| CliError::InvalidInput(e.to_string()))
}

/// Validate one header file and collect the outcome as a report.
///
/// Under `raise` the first error ends validation; the report then holds
/// that single finding.
pub fn validate_file(
    schema: &Schema,
    header_path: &Path,
    policy: OnError,
) -> Result<ValidationReport> {
    let header: Header = read_document(header_path)?;
    tracing::info!(
        header = %header_path.display(),
        schema = %schema.name(),
        cards = header.len(),
        "Validating header"
    );

    match schema.validate_header(&header, policy) {
        Ok(report) => Ok(report),
        Err(err) => {
            let mut report = ValidationReport::new(schema.name(), policy);
            report.findings.push(err.finding().clone());
            Ok(report)
        }
    }
}

/// Execute the validate command
pub fn execute_validate(
    header: &Path,
    schema: &str,
    schema_files: &[PathBuf],
    onerror: &str,
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    let policy = parse_policy(onerror)?;
    let registry = build_registry(schema_files)?;
    let schema = resolve_schema(&registry, schema)?;

    let report = validate_file(&schema, header, policy)?;

    let output = ReportOutput::from_report(&report);
    output.render(format.unwrap_or_default())?;

    Ok(ExitCode::from_validation_result(
        !report.is_valid(),
        report.has_warnings(),
    ))
}

/// Execute the list command
pub fn execute_list(schema_files: &[PathBuf], format: Option<OutputFormat>) -> Result<ExitCode> {
    let registry = build_registry(schema_files)?;
    let summaries: Vec<SchemaSummary> = registry
        .iter()
        .map(|schema| SchemaSummary::from_schema(schema))
        .collect();

    match format.unwrap_or_default() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Table => print_schema_list(&summaries),
    }

    Ok(ExitCode::Success)
}

/// Execute the describe command
pub fn execute_describe(
    schema: &str,
    schema_files: &[PathBuf],
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    let registry = build_registry(schema_files)?;
    let schema = resolve_schema(&registry, schema)?;

    SchemaOutput::from_schema(&schema).render(format.unwrap_or_default())?;
    Ok(ExitCode::Success)
}

/// Print the schema list in table format
fn print_schema_list(summaries: &[SchemaSummary]) {
    use colored::Colorize;

    println!("{}", "Available Schemas".cyan().bold());
    println!("{}", "=".repeat(60));

    for summary in summaries {
        let parents = if summary.parents.is_empty() {
            String::new()
        } else {
            format!(" ({})", summary.parents.join(", "))
        };
        println!(
            "  {} {}{} - {} card(s)",
            "-".blue(),
            summary.name.bold(),
            parents.dimmed(),
            summary.cards
        );
        if let Some(description) = &summary.description {
            println!("      {}", description.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use header_schema_core::standard::PRIMARY_HEADER;

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("raise").unwrap(), OnError::Raise);
        assert_eq!(parse_policy("log").unwrap(), OnError::Log);
        assert!(matches!(parse_policy("LOG"), Err(CliError::InvalidInput(_))));
        assert!(matches!(parse_policy("warn"), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_resolve_builtin_schema() {
        let registry = build_registry(&[]).unwrap();
        assert_eq!(resolve_schema(&registry, PRIMARY_HEADER).unwrap().name(), PRIMARY_HEADER);
        assert!(matches!(
            resolve_schema(&registry, "Nope"),
            Err(CliError::UnknownSchema(_))
        ));
    }

    #[test]
    fn test_cli_parsing() {
        let cli = HeaderValidateCli::try_parse_from([
            "header-validate",
            "-vv",
            "validate",
            "--header",
            "primary.yaml",
            "--schema",
            "PrimaryHeader",
            "--schema-file",
            "a.yaml",
            "--schema-file",
            "b.toml",
            "--onerror",
            "log",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            HeaderValidateCommands::Validate {
                header,
                schema,
                schema_files,
                onerror,
                format,
            } => {
                assert_eq!(header, PathBuf::from("primary.yaml"));
                assert_eq!(schema, "PrimaryHeader");
                assert_eq!(schema_files.len(), 2);
                assert_eq!(onerror, "log");
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
