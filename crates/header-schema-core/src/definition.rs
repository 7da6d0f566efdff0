//! Declarative schema documents
//!
//! Schemas can be written as YAML, JSON or TOML documents instead of builder
//! calls. A document holds a list of schema definitions; each names its
//! parents by schema name.
//!
//! ```yaml
//! schemas:
//!   - name: ObservationHeader
//!     extends: [PrimaryHeader]
//!     cards:
//!       - name: DATE_OBS
//!         keyword: DATE-OBS
//!         type: str
//!       - name: TIMESYS
//!         allowed_values: [UTC, TT]
//!         required: false
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result, SchemaError};
use crate::field::FieldSpec;
use crate::schema::Schema;
use crate::value::{Value, ValueKind};

/// A single item or a list of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

fn default_true() -> bool {
    true
}

/// Declarative form of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(rename = "type", default)]
    pub types: OneOrMany<ValueKind>,
    /// A bare scalar is a single allowed value, never split into characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<OneOrMany<Value>>,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    #[serde(default)]
    pub long: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CardDefinition {
    pub fn to_field_spec(&self) -> FieldSpec {
        let mut spec = FieldSpec::new()
            .with_types(self.types.clone().into_vec())
            .with_case_insensitive(self.case_insensitive)
            .with_required(self.required)
            .with_long(self.long);
        if let Some(keyword) = &self.keyword {
            spec = spec.with_keyword(keyword);
        }
        if let Some(allowed) = &self.allowed_values {
            spec = spec.with_allowed_values(allowed.clone().into_vec());
        }
        if let Some(unit) = &self.unit {
            spec = spec.with_unit(unit);
        }
        if let Some(position) = self.position {
            spec = spec.with_position(position);
        }
        if let Some(empty) = self.empty {
            spec = spec.with_empty(empty);
        }
        if let Some(description) = &self.description {
            spec = spec.with_description(description);
        }
        spec
    }
}

/// Declarative form of one schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent schema names, highest precedence first
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub cards: Vec<CardDefinition>,
}

impl SchemaDefinition {
    /// Build the schema, resolving parents through `resolve`
    pub fn build<F>(&self, resolve: F) -> std::result::Result<Arc<Schema>, SchemaError>
    where
        F: Fn(&str) -> Option<Arc<Schema>>,
    {
        let mut builder = Schema::builder(&self.name);
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        for parent in &self.extends {
            let schema = resolve(parent).ok_or_else(|| SchemaError::UnknownSchema(parent.clone()))?;
            builder = builder.extends(&schema);
        }
        for card in &self.cards {
            builder = builder.card(&card.name, card.to_field_spec());
        }
        builder.build()
    }
}

/// A file of schema definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub schemas: Vec<SchemaDefinition>,
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "toml" => Ok(DocumentFormat::Toml),
            _ => Err(Error::parse_error(format!(
                "Unsupported file format: '{}'. Supported formats: json, yaml, yml, toml",
                extension
            ))),
        }
    }

    /// Deserialize `content` in this format
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            DocumentFormat::Toml => Ok(toml::from_str(content)?),
        }
    }
}

/// Read and parse a file, choosing the format from its extension
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::file_error(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    format.parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_defaults() {
        let card: CardDefinition = serde_yaml::from_str("name: TEST").unwrap();
        let spec = card.to_field_spec();
        assert!(spec.required());
        assert!(spec.case_insensitive());
        assert!(spec.types().is_empty());
        assert!(spec.allowed_values().is_none());
        assert_eq!(spec.empty(), None);
    }

    #[test]
    fn test_single_allowed_string_stays_whole() {
        let card: CardDefinition =
            serde_yaml::from_str("name: OVERRIDE\nallowed_values: overridden\nunit: m").unwrap();
        let spec = card.to_field_spec();
        assert_eq!(spec.allowed_values(), Some(&[Value::from("overridden")][..]));
        assert_eq!(spec.unit(), Some("m"));
    }

    #[test]
    fn test_type_list_or_single() {
        let one: CardDefinition = serde_json::from_str(r#"{"name": "A", "type": "int"}"#).unwrap();
        assert_eq!(one.to_field_spec().types(), &[ValueKind::Int]);

        let many: CardDefinition =
            serde_json::from_str(r#"{"name": "A", "type": ["str", "int"]}"#).unwrap();
        assert_eq!(many.to_field_spec().types(), &[ValueKind::Int, ValueKind::Str]);
    }

    #[test]
    fn test_build_with_unknown_parent() {
        let definition = SchemaDefinition {
            name: "Child".to_string(),
            description: None,
            extends: vec!["Missing".to_string()],
            cards: Vec::new(),
        };
        let err = definition.build(|_| None).unwrap_err();
        assert_eq!(err, SchemaError::UnknownSchema("Missing".to_string()));
    }

    #[test]
    fn test_toml_document() {
        let content = r#"
            [[schemas]]
            name = "Simple"

            [[schemas.cards]]
            name = "NAXIS"
            type = "int"
            position = 0
        "#;
        let doc: SchemaDocument = DocumentFormat::Toml.parse(content).unwrap();
        let schema = doc.schemas[0].build(|_| None).unwrap();
        assert_eq!(schema.field("NAXIS").unwrap().position(), Some(0));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(DocumentFormat::from_path(Path::new("a.txt")).is_err());
    }
}
