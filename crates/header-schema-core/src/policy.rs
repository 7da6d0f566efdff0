//! Error policy: raise, warn, or log
//!
//! Every finding produced during validation goes through [`OnError::dispatch`].
//! Under [`OnError::Raise`] the first error-class finding aborts the call and
//! warnings are emitted without stopping. Under [`OnError::Log`] every finding
//! is written to the log and recorded, and the call runs to completion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SchemaError, ValidationError};
use crate::finding::{Finding, Severity};

/// How validation findings are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Fail fast on the first error, warn on warnings
    #[default]
    Raise,
    /// Record and log everything, never fail
    Log,
}

impl fmt::Display for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnError::Raise => write!(f, "raise"),
            OnError::Log => write!(f, "log"),
        }
    }
}

impl FromStr for OnError {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise" => Ok(OnError::Raise),
            "log" => Ok(OnError::Log),
            _ => Err(SchemaError::InvalidOnError(s.to_string())),
        }
    }
}

impl OnError {
    /// Surface one finding according to this policy
    pub fn dispatch(
        self,
        finding: Finding,
        report: &mut ValidationReport,
    ) -> Result<(), ValidationError> {
        let schema = report.schema.as_str();
        match (self, finding.severity()) {
            (OnError::Raise, Severity::Error) => {
                if let Some(err) = ValidationError::from_finding(finding) {
                    return Err(err);
                }
            }
            (_, Severity::Warning) => {
                tracing::warn!(
                    schema,
                    keyword = %finding.keyword,
                    kind = %finding.kind,
                    "{}",
                    finding.message
                );
                report.findings.push(finding);
            }
            (OnError::Log, Severity::Error) => {
                tracing::error!(
                    schema,
                    keyword = %finding.keyword,
                    kind = %finding.kind,
                    "{}",
                    finding.message
                );
                report.findings.push(finding);
            }
        }
        Ok(())
    }
}

/// Outcome of validating one header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Name of the schema validated against
    pub schema: String,
    pub policy: OnError,
    /// Findings in the order they were detected
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(schema: impl Into<String>, policy: OnError) -> Self {
        Self {
            schema: schema.into(),
            policy,
            findings: Vec::new(),
        }
    }

    /// No error-class findings were recorded
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| !f.is_error())
    }

    pub fn errors(&self) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.is_error()).collect()
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.findings.iter().filter(|f| !f.is_error()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingKind;

    #[test]
    fn test_parse_policy() {
        assert_eq!("raise".parse::<OnError>().unwrap(), OnError::Raise);
        assert_eq!("log".parse::<OnError>().unwrap(), OnError::Log);
        for other in ["LOG", "Raise", " log", ""] {
            assert!(matches!(
                other.parse::<OnError>(),
                Err(SchemaError::InvalidOnError(_))
            ));
        }
        assert!(matches!(
            "warn".parse::<OnError>(),
            Err(SchemaError::InvalidOnError(_))
        ));
    }

    #[test]
    fn test_raise_fails_on_error() {
        let mut report = ValidationReport::new("Test", OnError::Raise);
        let finding = Finding::new(FindingKind::WrongValue, "SIMPLE", "must be T");
        let err = OnError::Raise.dispatch(finding, &mut report).unwrap_err();
        assert!(matches!(err, ValidationError::WrongValue(_)));
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_raise_records_warnings() {
        let mut report = ValidationReport::new("Test", OnError::Raise);
        let finding = Finding::new(FindingKind::AdditionalHeaderCard, "FOO", "not declared");
        OnError::Raise.dispatch(finding, &mut report).unwrap();
        assert!(report.is_valid());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_log_never_fails() {
        let mut report = ValidationReport::new("Test", OnError::Log);
        for kind in [FindingKind::RequiredMissing, FindingKind::AdditionalHeaderCard] {
            OnError::Log
                .dispatch(Finding::new(kind, "X", "m"), &mut report)
                .unwrap();
        }
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.warnings().len(), 1);
        assert!(!report.is_valid());
    }
}
