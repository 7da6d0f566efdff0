//! Field specifications
//!
//! A [`FieldSpec`] describes one permitted header card: its keyword, the
//! value types and values it accepts, where it must sit, and whether it may
//! be empty. Specs are built once, checked for self-consistency when their
//! schema is built, and never mutated afterwards.

use serde::Serialize;

use crate::error::{SchemaError, ValidationError};
use crate::finding::{Finding, FindingKind};
use crate::header::Card;
use crate::policy::{OnError, ValidationReport};
use crate::value::{Value, ValueKind};

/// Description of one permitted header card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    name: String,
    keyword: String,
    types: Vec<ValueKind>,
    allowed_values: Option<Vec<Value>>,
    case_insensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    empty: Option<bool>,
    long: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSpec {
    /// A required field accepting any value
    pub fn new() -> Self {
        Self {
            name: String::new(),
            keyword: String::new(),
            types: Vec::new(),
            allowed_values: None,
            case_insensitive: true,
            unit: None,
            required: true,
            position: None,
            empty: None,
            long: false,
            description: None,
        }
    }

    /// Use an explicit keyword instead of the card name
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Permit values of this type
    pub fn with_type(mut self, kind: ValueKind) -> Self {
        if !self.types.contains(&kind) {
            self.types.push(kind);
            self.types.sort();
        }
        self
    }

    /// Permit values of any of these types
    pub fn with_types<I: IntoIterator<Item = ValueKind>>(self, kinds: I) -> Self {
        kinds.into_iter().fold(self, FieldSpec::with_type)
    }

    /// Restrict the card to exactly one value
    pub fn with_allowed(self, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        self.with_allowed_values([value])
    }

    /// Restrict the card to a set of values
    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut set: Vec<Value> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !set.contains(&value) {
                set.push(value);
            }
        }
        self.allowed_values = Some(set);
        self
    }

    /// Fold case when comparing string values against the allowed set
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.with_required(false)
    }

    /// Fix the card at a 0-based index in the header
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// `true`: value must be undefined, `false`: value must be defined
    pub fn with_empty(mut self, empty: bool) -> Self {
        self.empty = Some(empty);
        self
    }

    /// Lift the standard keyword length limit
    pub fn with_long(mut self, long: bool) -> Self {
        self.long = long;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the card name; the keyword defaults to it
    pub(crate) fn bind(mut self, name: &str) -> Self {
        self.name = name.to_string();
        if self.keyword.is_empty() {
            self.keyword = name.to_string();
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Permitted types, empty means any
    pub fn types(&self) -> &[ValueKind] {
        &self.types
    }

    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.allowed_values.as_deref()
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn empty(&self) -> Option<bool> {
        self.empty
    }

    pub fn long(&self) -> bool {
        self.long
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Check the spec for internal consistency
    pub fn verify(&self) -> Result<(), SchemaError> {
        crate::keyword::check_keyword(&self.keyword, self.long)?;

        if let Some(allowed) = &self.allowed_values {
            if allowed.is_empty() {
                return Err(SchemaError::inconsistent_field(
                    &self.keyword,
                    "allowed values must not be an empty set",
                ));
            }
            for value in allowed {
                let Some(kind) = value.kind() else {
                    return Err(SchemaError::inconsistent_field(
                        &self.keyword,
                        "allowed values must be scalars, not undefined",
                    ));
                };
                if !self.types.is_empty() && !self.types.contains(&kind) {
                    return Err(SchemaError::inconsistent_field(
                        &self.keyword,
                        format!(
                            "allowed value {} has type {}, expected {}",
                            value,
                            kind,
                            self.type_list()
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Run all checks for this field against its header entry.
    ///
    /// `entry` is the card and its index in the header, `None` if absent.
    pub fn check(&self, entry: Option<(usize, &Card)>) -> Vec<Finding> {
        let Some((index, card)) = entry else {
            if self.required {
                return vec![Finding::new(
                    FindingKind::RequiredMissing,
                    &self.keyword,
                    format!("Required card '{}' is missing", self.keyword),
                )];
            }
            return Vec::new();
        };

        let mut findings = Vec::new();

        if let Some(position) = self.position {
            if index != position {
                findings.push(
                    Finding::new(
                        FindingKind::WrongPosition,
                        &self.keyword,
                        format!(
                            "Card '{}' is at position {}, expected {}",
                            self.keyword, index, position
                        ),
                    )
                    .with_expected(position.to_string())
                    .with_actual(index.to_string()),
                );
            }
        }

        findings.extend(self.check_value(&card.value));
        findings
    }

    /// Emptiness, type and allowed-value checks for a single value.
    ///
    /// A defined value runs every check; an undefined one only the
    /// emptiness rule.
    pub fn check_value(&self, value: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();

        match (self.empty, value.is_undefined()) {
            (Some(false), true) => findings.push(
                Finding::new(
                    FindingKind::WrongValue,
                    &self.keyword,
                    format!("Card '{}' must not be empty", self.keyword),
                )
                .with_expected("a value")
                .with_actual(value.to_string()),
            ),
            (Some(true), false) => findings.push(
                Finding::new(
                    FindingKind::WrongValue,
                    &self.keyword,
                    format!("Card '{}' must be empty", self.keyword),
                )
                .with_expected(Value::Undefined.to_string())
                .with_actual(value.to_string()),
            ),
            _ => {}
        }

        let Some(kind) = value.kind() else {
            return findings;
        };

        if !self.types.is_empty() && !self.types.contains(&kind) {
            findings.push(
                Finding::new(
                    FindingKind::WrongType,
                    &self.keyword,
                    format!(
                        "Card '{}' has type {}, expected {}",
                        self.keyword,
                        kind,
                        self.type_list()
                    ),
                )
                .with_expected(self.type_list())
                .with_actual(kind.to_string()),
            );
        }

        if let Some(allowed) = &self.allowed_values {
            if !allowed
                .iter()
                .any(|candidate| value.matches(candidate, self.case_insensitive))
            {
                let list = allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                findings.push(
                    Finding::new(
                        FindingKind::WrongValue,
                        &self.keyword,
                        format!(
                            "Card '{}' has value {}, expected one of [{}]",
                            self.keyword, value, list
                        ),
                    )
                    .with_expected(format!("[{}]", list))
                    .with_actual(value.to_string()),
                );
            }
        }

        findings
    }

    /// Run the checks and surface the findings through `policy`
    pub fn validate(
        &self,
        entry: Option<(usize, &Card)>,
        policy: OnError,
        report: &mut ValidationReport,
    ) -> Result<(), ValidationError> {
        for finding in self.check(entry) {
            policy.dispatch(finding, report)?;
        }
        Ok(())
    }

    fn type_list(&self) -> String {
        self.types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
