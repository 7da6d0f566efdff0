//! Integration tests for the header-validate commands
//!
//! Each test writes header and schema documents to temporary files and
//! checks the exit code a command reports.

use clap::Parser;
use header_schema_cli::cli::commands::{
    execute_describe, execute_list, execute_validate, validate_file,
};
use header_schema_cli::{run_cli, CliError, ExitCode, HeaderValidateCli, OutputFormat};
use header_schema_core::{FindingKind, OnError, SchemaRegistry};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const VALID_PRIMARY: &str = "SIMPLE: true\nBITPIX: 16\nNAXIS: 0\nEXTEND: true\n";

const SCHEMAS: &str = r#"
schemas:
  - name: ObservationHeader
    extends: [PrimaryHeader]
    cards:
      - name: EXPTIME
        type: [float, int]
        unit: s
"#;

#[test]
fn test_validate_valid_header() {
    let header = write_temp(".yaml", VALID_PRIMARY);
    let code = execute_validate(
        header.path(),
        "PrimaryHeader",
        &[],
        "raise",
        Some(OutputFormat::Json),
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_validate_additional_card_is_warning() {
    let header = write_temp(".yaml", &format!("{}TTYPE1: TIME\n", VALID_PRIMARY));
    let code = execute_validate(
        header.path(),
        "PrimaryHeader",
        &[],
        "raise",
        Some(OutputFormat::Table),
    )
    .unwrap();
    assert_eq!(code, ExitCode::ValidationWarning);
}

#[test]
fn test_validate_errors_under_both_policies() {
    let header = write_temp(".json", r#"{"BITPIX": 12, "SIMPLE": true}"#);
    for policy in ["raise", "log"] {
        let code = execute_validate(
            header.path(),
            "PrimaryHeader",
            &[],
            policy,
            Some(OutputFormat::Yaml),
        )
        .unwrap();
        assert_eq!(code, ExitCode::ValidationError);
    }
}

#[test]
fn test_raise_reports_only_first_error() {
    let header = write_temp(".json", r#"{"BITPIX": 12, "SIMPLE": true}"#);
    let registry = SchemaRegistry::with_standard().unwrap();
    let schema = registry.get("PrimaryHeader").unwrap();

    let raised = validate_file(&schema, header.path(), OnError::Raise).unwrap();
    assert_eq!(raised.findings.len(), 1);
    assert_eq!(raised.findings[0].kind, FindingKind::WrongPosition);
    assert_eq!(raised.findings[0].keyword, "SIMPLE");

    let logged = validate_file(&schema, header.path(), OnError::Log).unwrap();
    assert_eq!(logged.errors().len(), 4);
}

#[test]
fn test_validate_with_schema_file() {
    let schemas = write_temp(".yaml", SCHEMAS);
    let header = write_temp(
        ".toml",
        "SIMPLE = true\nBITPIX = -32\nNAXIS = 0\nEXPTIME = 12.5\n",
    );
    let code = execute_validate(
        header.path(),
        "ObservationHeader",
        &[schemas.path().to_path_buf()],
        "log",
        Some(OutputFormat::Json),
    )
    .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_unknown_schema() {
    let header = write_temp(".yaml", VALID_PRIMARY);
    let err = execute_validate(header.path(), "Nope", &[], "raise", None).unwrap_err();
    assert!(matches!(err, CliError::UnknownSchema(_)));
    assert_eq!(err.exit_code(), ExitCode::SchemaError);
}

#[test]
fn test_invalid_policy() {
    let header = write_temp(".yaml", VALID_PRIMARY);
    let err = execute_validate(header.path(), "PrimaryHeader", &[], "warn", None).unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::InvalidInput);
}

#[test]
fn test_missing_header_file() {
    let err = execute_validate(
        &PathBuf::from("/nonexistent/header.yaml"),
        "PrimaryHeader",
        &[],
        "raise",
        None,
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::FileError);
}

#[test]
fn test_list_and_describe() {
    let schemas = write_temp(".yaml", SCHEMAS);
    let files = vec![schemas.path().to_path_buf()];

    assert_eq!(
        execute_list(&files, Some(OutputFormat::Json)).unwrap(),
        ExitCode::Success
    );
    assert_eq!(
        execute_describe("ObservationHeader", &files, Some(OutputFormat::Table)).unwrap(),
        ExitCode::Success
    );
}

#[test]
fn test_run_cli_maps_errors_to_exit_codes() {
    let header = write_temp(".yaml", VALID_PRIMARY);
    let path = header.path().to_string_lossy().to_string();

    let cli = HeaderValidateCli::try_parse_from([
        "header-validate",
        "validate",
        "--header",
        path.as_str(),
        "--schema",
        "Missing",
    ])
    .unwrap();
    assert_eq!(run_cli(cli), ExitCode::SchemaError);
}
