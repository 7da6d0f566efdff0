//! Named catalogue of schemas
//!
//! The registry resolves `extends` references in schema documents and lets
//! front ends look schemas up by name.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::definition::{read_document, DocumentFormat, SchemaDocument};
use crate::error::{Result, SchemaError};
use crate::schema::Schema;
use crate::standard;

/// Schemas indexed by name
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard FITS layouts
    pub fn with_standard() -> std::result::Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.register(standard::informational_header()?)?;
        registry.register(standard::primary_header()?)?;
        registry.register(standard::binary_table_header()?)?;
        Ok(registry)
    }

    pub fn register(&mut self, schema: Arc<Schema>) -> std::result::Result<(), SchemaError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateSchema(schema.name().to_string()));
        }
        tracing::debug!(schema = %schema.name(), "Registered schema");
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Build and register every schema of a document, in order.
    ///
    /// Later definitions may extend earlier ones. The whole document is
    /// built before anything is registered, so a structural error leaves
    /// the registry unchanged.
    pub fn load_document(
        &mut self,
        document: &SchemaDocument,
    ) -> std::result::Result<Vec<Arc<Schema>>, SchemaError> {
        let mut staged: Vec<Arc<Schema>> = Vec::with_capacity(document.schemas.len());
        for definition in &document.schemas {
            let name = definition.name.as_str();
            if self.schemas.contains_key(name) || staged.iter().any(|s| s.name() == name) {
                return Err(SchemaError::DuplicateSchema(name.to_string()));
            }
            let schema = definition.build(|parent| {
                staged
                    .iter()
                    .find(|s| s.name() == parent)
                    .cloned()
                    .or_else(|| self.get(parent))
            })?;
            staged.push(schema);
        }

        for schema in &staged {
            self.register(Arc::clone(schema))?;
        }
        Ok(staged)
    }

    pub fn load_str(&mut self, content: &str, format: DocumentFormat) -> Result<Vec<Arc<Schema>>> {
        let document: SchemaDocument = format.parse(content)?;
        Ok(self.load_document(&document)?)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<Vec<Arc<Schema>>> {
        let document: SchemaDocument = read_document(path)?;
        let loaded = self.load_document(&document)?;
        tracing::info!(
            path = %path.display(),
            schemas = loaded.len(),
            "Loaded schema document"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = SchemaRegistry::with_standard().unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                standard::BINTABLE_HEADER,
                standard::INFORMATIONAL_HEADER,
                standard::PRIMARY_HEADER
            ]
        );
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = SchemaRegistry::with_standard().unwrap();
        let again = standard::primary_header().unwrap();
        assert_eq!(
            registry.register(again).unwrap_err(),
            SchemaError::DuplicateSchema(standard::PRIMARY_HEADER.to_string())
        );
    }

    #[test]
    fn test_load_yaml_extending_standard() {
        let mut registry = SchemaRegistry::with_standard().unwrap();
        let yaml = r#"
schemas:
  - name: ObservationHeader
    extends: [PrimaryHeader]
    cards:
      - name: TIMESYS
        allowed_values: [UTC, TT]
  - name: StrictObservationHeader
    extends: [ObservationHeader]
    cards:
      - name: TIMESYS
        allowed_values: UTC
        case_insensitive: false
"#;
        let loaded = registry.load_str(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(loaded.len(), 2);

        let strict = registry.get("StrictObservationHeader").unwrap();
        assert!(strict.contains("SIMPLE"));
        assert!(!strict.field("TIMESYS").unwrap().case_insensitive());
        assert_eq!(strict.defined_by("TIMESYS").unwrap().name(), "StrictObservationHeader");
    }

    #[test]
    fn test_structural_error_in_document() {
        let mut registry = SchemaRegistry::new();
        let yaml = "schemas:\n  - name: Bad\n    cards:\n      - name: MORE_THAN_8\n";
        let err = registry.load_str(yaml, DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Schema(SchemaError::InvalidKeyword { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_document_registers_nothing() {
        let mut registry = SchemaRegistry::with_standard().unwrap();
        let yaml = r#"
schemas:
  - name: Good
    extends: [PrimaryHeader]
  - name: GoodChild
    extends: [Good]
  - name: Bad
    cards:
      - name: MORE_THAN_8
"#;
        assert!(registry.load_str(yaml, DocumentFormat::Yaml).is_err());
        assert_eq!(registry.len(), 3);
        assert!(registry.get("Good").is_none());
        assert!(registry.get("GoodChild").is_none());

        let duplicate = "schemas:\n  - name: Twice\n  - name: Twice\n";
        let err = registry.load_str(duplicate, DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Schema(SchemaError::DuplicateSchema(_))
        ));
        assert!(registry.get("Twice").is_none());
    }
}
