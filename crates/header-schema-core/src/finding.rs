//! Validation findings
//!
//! A finding is one discrepancy between a header and its schema. Its kind
//! fixes its severity: only undeclared cards are warnings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Tolerable deviation, never raised
    Warning,
    /// Malformed header
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What rule a finding violates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    RequiredMissing,
    WrongPosition,
    WrongType,
    WrongValue,
    AdditionalHeaderCard,
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::AdditionalHeaderCard => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FindingKind::RequiredMissing => "RequiredMissing",
            FindingKind::WrongPosition => "WrongPosition",
            FindingKind::WrongType => "WrongType",
            FindingKind::WrongValue => "WrongValue",
            FindingKind::AdditionalHeaderCard => "AdditionalHeaderCard",
        };
        f.write_str(name)
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Keyword of the offending card
    pub keyword: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            keyword: keyword.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} '{}': {}",
            self.severity(),
            self.kind,
            self.keyword,
            self.message
        )
    }
}
