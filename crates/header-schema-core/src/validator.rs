//! Whole-header validation
//!
//! Walks the schema's merged fields in order, then scans the header for
//! cards the schema does not declare. Every finding goes through the
//! caller's [`OnError`] policy.

use crate::error::ValidationError;
use crate::finding::{Finding, FindingKind};
use crate::header::Header;
use crate::policy::{OnError, ValidationReport};
use crate::schema::Schema;

/// Validates headers against one schema
pub struct HeaderValidator<'a> {
    schema: &'a Schema,
}

impl<'a> HeaderValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validate `header`.
    ///
    /// Under [`OnError::Raise`] the first error-class finding is returned as
    /// `Err`. Under [`OnError::Log`] this always returns `Ok` and the report
    /// carries every finding.
    pub fn validate(
        &self,
        header: &Header,
        policy: OnError,
    ) -> Result<ValidationReport, ValidationError> {
        let mut report = ValidationReport::new(self.schema.name(), policy);

        for field in self.schema.fields() {
            field.validate(header.entry(field.keyword()), policy, &mut report)?;
        }

        for card in header.iter() {
            if !self.schema.contains(&card.keyword) {
                let finding = Finding::new(
                    FindingKind::AdditionalHeaderCard,
                    &card.keyword,
                    format!(
                        "Card '{}' is not declared by schema '{}'",
                        card.keyword,
                        self.schema.name()
                    ),
                )
                .with_actual(card.value.to_string());
                policy.dispatch(finding, &mut report)?;
            }
        }

        tracing::debug!(
            schema = %self.schema.name(),
            policy = %policy,
            cards = header.len(),
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "Validated header"
        );

        Ok(report)
    }
}
