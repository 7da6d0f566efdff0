//! Output formatting for the header-validate CLI
//!
//! Provides structured output in JSON, YAML, and human-readable table formats
//! with severity-based coloring for validation findings.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use header_schema_core::{FieldSpec, Finding, Schema, ValidationReport};

use crate::error::Result;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Validation report as rendered by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub schema: String,
    pub policy: String,
    /// No error-class findings
    pub valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub findings: Vec<FindingOutput>,
    pub summary: String,
}

/// Individual finding output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingOutput {
    pub severity: String,
    pub kind: String,
    pub keyword: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ReportOutput {
    pub fn from_report(report: &ValidationReport) -> Self {
        let error_count = report.errors().len();
        let warning_count = report.warnings().len();
        let valid = error_count == 0;

        let summary = if valid && warning_count == 0 {
            format!("Header is valid against {}", report.schema)
        } else if valid {
            format!(
                "Header is valid against {} with {} warning(s)",
                report.schema, warning_count
            )
        } else {
            format!(
                "Header has {} error(s) and {} warning(s) against {}",
                error_count, warning_count, report.schema
            )
        };

        Self {
            schema: report.schema.clone(),
            policy: report.policy.to_string(),
            valid,
            error_count,
            warning_count,
            findings: report.findings.iter().map(FindingOutput::from_finding).collect(),
            summary,
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => println!("{}", serde_yaml::to_string(self)?),
            OutputFormat::Table => self.render_table(),
        }
        Ok(())
    }

    fn render_table(&self) {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Validation Results".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        let status_icon = if self.valid { "+".green() } else { "x".red() };
        writeln!(stdout, "{} {}", status_icon, self.summary).ok();
        writeln!(stdout, "  {} {}", "Policy:".dimmed(), self.policy).ok();

        if !self.findings.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Findings:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();
            for finding in &self.findings {
                finding.render_table_row(&mut stdout);
            }
        }

        stdout.flush().ok();
    }
}

impl FindingOutput {
    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            severity: finding.severity().to_string(),
            kind: finding.kind.to_string(),
            keyword: finding.keyword.clone(),
            message: finding.message.clone(),
            expected: finding.expected.clone(),
            actual: finding.actual.clone(),
        }
    }

    fn render_table_row(&self, stdout: &mut io::Stdout) {
        let (icon, label) = match self.severity.as_str() {
            "error" => ("x".red(), "ERROR".red().bold()),
            "warning" => ("!".yellow(), "WARNING".yellow().bold()),
            _ => ("-".white(), self.severity.clone().white()),
        };

        writeln!(
            stdout,
            "{} [{}] {} {}",
            icon,
            self.kind.dimmed(),
            label,
            self.message
        )
        .ok();
        writeln!(stdout, "  {} {}", "Keyword:".dimmed(), self.keyword.cyan()).ok();
        if let Some(expected) = &self.expected {
            writeln!(stdout, "  {} {}", "Expected:".dimmed(), expected.green()).ok();
        }
        if let Some(actual) = &self.actual {
            writeln!(stdout, "  {} {}", "Actual:".dimmed(), actual.yellow()).ok();
        }
    }
}

/// One line of `list` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parents: Vec<String>,
    pub cards: usize,
}

impl SchemaSummary {
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            name: schema.name().to_string(),
            description: schema.description().map(str::to_string),
            parents: schema.parents().iter().map(|p| p.name().to_string()).collect(),
            cards: schema.len(),
        }
    }
}

/// Cards contributed by one schema of a lineage
#[derive(Debug, Clone, Serialize)]
pub struct GroupOutput {
    pub schema: String,
    pub cards: Vec<FieldSpec>,
}

/// `describe` output
#[derive(Debug, Clone, Serialize)]
pub struct SchemaOutput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ancestors in resolution order
    pub lineage: Vec<String>,
    pub groups: Vec<GroupOutput>,
}

impl SchemaOutput {
    pub fn from_schema(schema: &Schema) -> Self {
        let groups = schema
            .grouped_cards()
            .iter()
            .map(|group| GroupOutput {
                schema: group.schema.name().to_string(),
                cards: group.cards.iter().map(|&spec| spec.clone()).collect(),
            })
            .collect();

        Self {
            name: schema.name().to_string(),
            description: schema.description().map(str::to_string),
            lineage: schema.lineage().iter().map(|s| s.name().to_string()).collect(),
            groups,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => println!("{}", serde_yaml::to_string(self)?),
            OutputFormat::Table => self.render_table(),
        }
        Ok(())
    }

    fn render_table(&self) {
        println!("{}", format!("Schema: {}", self.name).green().bold());
        if let Some(description) = &self.description {
            println!("  {}", description.dimmed());
        }
        if !self.lineage.is_empty() {
            println!("  {} {}", "Lineage:".dimmed(), self.lineage.join(" -> "));
        }

        for group in &self.groups {
            println!();
            println!("{}", format!("From {}:", group.schema).cyan().bold());
            for spec in &group.cards {
                println!("  {}", describe_card(spec));
                if let Some(description) = spec.description() {
                    println!("      {}", description.dimmed());
                }
            }
        }
    }
}

/// One-line summary of a card's rules
pub fn describe_card(spec: &FieldSpec) -> String {
    let mut parts = Vec::new();

    if !spec.types().is_empty() {
        let types: Vec<String> = spec.types().iter().map(ToString::to_string).collect();
        parts.push(types.join("|"));
    }
    if let Some(allowed) = spec.allowed_values() {
        let values: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        parts.push(format!("in [{}]", values.join(", ")));
    }
    if let Some(position) = spec.position() {
        parts.push(format!("at {}", position));
    }
    match spec.empty() {
        Some(true) => parts.push("empty".to_string()),
        Some(false) => parts.push("non-empty".to_string()),
        None => {}
    }
    if let Some(unit) = spec.unit() {
        parts.push(format!("[{}]", unit));
    }

    let marker = if spec.required() {
        "*".red().to_string()
    } else {
        " ".to_string()
    };
    format!("{}{:<8} {}", marker, spec.keyword().bold(), parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use header_schema_core::{FindingKind, OnError};

    #[test]
    fn test_report_output_counts() {
        let mut report = ValidationReport::new("PrimaryHeader", OnError::Log);
        report
            .findings
            .push(Finding::new(FindingKind::WrongType, "NAXIS", "bad type"));
        report.findings.push(Finding::new(
            FindingKind::AdditionalHeaderCard,
            "FOO",
            "not declared",
        ));

        let output = ReportOutput::from_report(&report);
        assert!(!output.valid);
        assert_eq!(output.error_count, 1);
        assert_eq!(output.warning_count, 1);
        assert_eq!(output.policy, "log");
        assert_eq!(output.findings[0].severity, "error");
        assert!(output.summary.contains("1 error(s)"));
    }

    #[test]
    fn test_report_output_json() {
        let report = ValidationReport::new("PrimaryHeader", OnError::Raise);
        let output = ReportOutput::from_report(&report);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["schema"], "PrimaryHeader");
        assert_eq!(json["findings"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_schema_output_groups() {
        let schema = header_schema_core::standard::primary_header().unwrap();
        let output = SchemaOutput::from_schema(&schema);
        assert_eq!(output.groups[0].schema, "PrimaryHeader");
        assert_eq!(output.groups[1].schema, "InformationalHeader");
        assert_eq!(output.lineage, vec!["InformationalHeader"]);
        assert_eq!(output.groups[0].cards[0].keyword(), "SIMPLE");
    }
}
