//! Error types for header schema definition and validation
//!
//! Two families are kept apart:
//!
//! - [`SchemaError`]: structural defects in a schema definition. These are
//!   raised while the schema is being built, before any header is seen.
//! - [`ValidationError`]: an error-class finding surfaced by the `raise`
//!   policy while validating a concrete header.

use thiserror::Error;

use crate::finding::{Finding, FindingKind};

/// Structural problems with a schema definition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Keyword violates the header keyword syntax
    #[error("Invalid keyword '{keyword}': {reason}")]
    InvalidKeyword { keyword: String, reason: String },

    /// Card name cannot be used as a field name
    #[error("Invalid card name '{name}': {reason}")]
    InvalidCardName { name: String, reason: String },

    /// The same keyword is declared twice in one schema body
    #[error("Keyword '{keyword}' is declared more than once in schema '{schema}'")]
    DuplicateKeyword { schema: String, keyword: String },

    /// Two active fields claim the same header position
    #[error("Position {position} is claimed by both '{first}' and '{second}'")]
    DuplicatePosition {
        position: usize,
        first: String,
        second: String,
    },

    /// A field specification contradicts itself
    #[error("Inconsistent field '{keyword}': {reason}")]
    InconsistentField { keyword: String, reason: String },

    /// Parent schemas cannot be linearised into a single lineage
    #[error("Cannot build a consistent lineage for schema '{schema}'")]
    InconsistentHierarchy { schema: String },

    /// The `onerror` policy name is not recognised
    #[error("`onerror` must be either \"raise\" or \"log\", got '{0}'")]
    InvalidOnError(String),

    /// A schema with this name is already registered
    #[error("Schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// Referenced schema does not exist
    #[error("Unknown schema '{0}'")]
    UnknownSchema(String),
}

impl SchemaError {
    /// Create an invalid keyword error
    pub fn invalid_keyword(keyword: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidKeyword {
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }

    /// Create an inconsistent field error
    pub fn inconsistent_field(keyword: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InconsistentField {
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }
}

/// An error-class finding raised under the `raise` policy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required card is absent
    #[error("{0}")]
    RequiredMissing(Finding),

    /// A card is not at its declared position
    #[error("{0}")]
    WrongPosition(Finding),

    /// A card value has a type the field does not permit
    #[error("{0}")]
    WrongType(Finding),

    /// A card value is outside the permitted values or emptiness
    #[error("{0}")]
    WrongValue(Finding),
}

impl ValidationError {
    /// The finding that triggered this error
    pub fn finding(&self) -> &Finding {
        match self {
            ValidationError::RequiredMissing(f)
            | ValidationError::WrongPosition(f)
            | ValidationError::WrongType(f)
            | ValidationError::WrongValue(f) => f,
        }
    }

    /// The offending keyword
    pub fn keyword(&self) -> &str {
        &self.finding().keyword
    }

    /// Convert an error-class finding into an error.
    ///
    /// Returns `None` for warning-class findings, which are never raised.
    pub fn from_finding(finding: Finding) -> Option<Self> {
        match finding.kind {
            FindingKind::RequiredMissing => Some(ValidationError::RequiredMissing(finding)),
            FindingKind::WrongPosition => Some(ValidationError::WrongPosition(finding)),
            FindingKind::WrongType => Some(ValidationError::WrongType(finding)),
            FindingKind::WrongValue => Some(ValidationError::WrongValue(finding)),
            FindingKind::AdditionalHeaderCard => None,
        }
    }
}

/// Main error type for header schema operations
#[derive(Error, Debug)]
pub enum Error {
    /// Structural schema problem
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Header failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Lookup or assignment of a keyword the schema does not declare
    #[error("Unknown keyword: '{0}'")]
    UnknownKeyword(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Document parsing error
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl Error {
    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        Error::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Error::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs a schema programming defect)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::UnknownKeyword(_)
                | Error::FileError(_)
                | Error::ParseError(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for header schema operations
pub type Result<T> = std::result::Result<T, Error>;
