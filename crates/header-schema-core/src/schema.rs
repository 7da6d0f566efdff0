//! Schemas: named, ordered collections of field specifications
//!
//! A schema is assembled with [`SchemaBuilder`]: each `card` call declares
//! one field, and `extends` lists parent schemas in precedence order. On
//! `build` the builder
//!
//! 1. binds and verifies every declared field (keyword syntax, allowed values
//!    against types, duplicate declarations),
//! 2. linearises the parents into a lineage using C3, the same method
//!    resolution order Python uses for classes,
//! 3. merges fields walking the lineage from most general to most specific
//!    and finally the schema's own declarations. A re-declared keyword
//!    replaces the earlier spec but keeps its first-appearance slot.
//!
//! Any failure is a [`SchemaError`]; no schema is produced.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{SchemaError, ValidationError};
use crate::field::FieldSpec;
use crate::header::Header;
use crate::instance::HeaderInstance;
use crate::keyword::check_card_name;
use crate::policy::{OnError, ValidationReport};
use crate::validator::HeaderValidator;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique schema identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SchemaId(u64);

impl SchemaId {
    fn next() -> Self {
        SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An immutable, merged header schema
pub struct Schema {
    id: SchemaId,
    name: String,
    description: Option<String>,
    parents: Vec<Arc<Schema>>,
    /// Linearised ancestors, most specific first, excluding this schema
    lineage: Vec<Arc<Schema>>,
    /// Fields declared by this schema itself
    own: Vec<FieldSpec>,
    /// Merged fields in header order
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Direct parents in declaration order
    pub fn parents(&self) -> &[Arc<Schema>] {
        &self.parents
    }

    /// All ancestors in resolution order, most specific first
    pub fn lineage(&self) -> &[Arc<Schema>] {
        &self.lineage
    }

    /// Fields this schema declares itself
    pub fn own_fields(&self) -> &[FieldSpec] {
        &self.own
    }

    /// Merged fields in order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::keyword)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up the active spec for a keyword
    pub fn field(&self, keyword: &str) -> Option<&FieldSpec> {
        self.index
            .get(&keyword.trim().to_uppercase())
            .map(|&i| &self.fields[i])
    }

    /// Look up the active spec by card name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.field(keyword).is_some()
    }

    /// Whether `other` is this schema or one of its ancestors
    pub fn is_a(&self, other: &Schema) -> bool {
        self.id == other.id || self.lineage.iter().any(|s| s.id == other.id)
    }

    /// The most specific schema in the lineage that declares `keyword`
    pub fn defined_by(&self, keyword: &str) -> Option<&Schema> {
        let keyword = keyword.trim().to_uppercase();
        std::iter::once(self)
            .chain(self.lineage.iter().map(Arc::as_ref))
            .find(|s| s.own.iter().any(|f| f.keyword() == keyword))
    }

    /// Fields grouped by the schema that declared them.
    ///
    /// Groups follow resolution order starting with this schema. Each group
    /// lists the keywords its schema declared, mapped to the currently
    /// active spec, so an override shows up in every group naming it.
    pub fn grouped_cards(&self) -> CardGroups<'_> {
        let groups = std::iter::once(self)
            .chain(self.lineage.iter().map(Arc::as_ref))
            .filter_map(|schema| {
                let cards: Vec<&FieldSpec> = schema
                    .own
                    .iter()
                    .filter_map(|f| self.field(f.keyword()))
                    .collect();
                if cards.is_empty() {
                    None
                } else {
                    Some(CardGroup { schema, cards })
                }
            })
            .collect();
        CardGroups { groups }
    }

    /// Validate a header against this schema
    pub fn validate_header(
        &self,
        header: &Header,
        policy: OnError,
    ) -> Result<ValidationReport, ValidationError> {
        HeaderValidator::new(self).validate(header, policy)
    }

    /// Validate a header and wrap it in a typed view
    pub fn instance(self: &Arc<Self>, header: Header) -> Result<HeaderInstance, ValidationError> {
        HeaderInstance::new(Arc::clone(self), header)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &self.id)
            .field("name", &self.name)
            .field(
                "parents",
                &self.parents.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("fields", &self.keywords().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Fields contributed by one schema of a lineage
#[derive(Debug)]
pub struct CardGroup<'a> {
    pub schema: &'a Schema,
    pub cards: Vec<&'a FieldSpec>,
}

impl<'a> CardGroup<'a> {
    pub fn get(&self, keyword: &str) -> Option<&'a FieldSpec> {
        let keyword = keyword.trim().to_uppercase();
        self.cards.iter().copied().find(|f| f.keyword() == keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|f| f.keyword())
    }
}

/// Result of [`Schema::grouped_cards`]
#[derive(Debug)]
pub struct CardGroups<'a> {
    groups: Vec<CardGroup<'a>>,
}

impl<'a> CardGroups<'a> {
    /// Group contributed by `schema`, if it contributed any field
    pub fn get(&self, schema: &Schema) -> Option<&CardGroup<'a>> {
        self.groups.iter().find(|g| g.schema.id() == schema.id())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    parents: Vec<Arc<Schema>>,
    cards: Vec<(String, FieldSpec)>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parents: Vec::new(),
            cards: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Inherit from `parent`; earlier parents take precedence
    pub fn extends(mut self, parent: &Arc<Schema>) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Declare a card; its keyword defaults to `name`
    pub fn card(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.cards.push((name.into(), spec));
        self
    }

    pub fn build(self) -> Result<Arc<Schema>, SchemaError> {
        let own = self.bind_own_fields()?;
        let lineage = linearize(&self.name, &self.parents)?;

        let mut fields: Vec<FieldSpec> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let declarations = lineage
            .iter()
            .rev()
            .flat_map(|ancestor| ancestor.own.iter())
            .chain(own.iter());
        for spec in declarations {
            match index.get(spec.keyword()) {
                Some(&slot) => fields[slot] = spec.clone(),
                None => {
                    index.insert(spec.keyword().to_string(), fields.len());
                    fields.push(spec.clone());
                }
            }
        }

        check_positions(&fields)?;

        tracing::debug!(
            schema = %self.name,
            fields = fields.len(),
            lineage = ?lineage.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "Built header schema"
        );

        Ok(Arc::new(Schema {
            id: SchemaId::next(),
            name: self.name,
            description: self.description,
            parents: self.parents,
            lineage,
            own,
            fields,
            index,
        }))
    }

    fn bind_own_fields(&self) -> Result<Vec<FieldSpec>, SchemaError> {
        let mut own: Vec<FieldSpec> = Vec::with_capacity(self.cards.len());
        for (name, spec) in &self.cards {
            check_card_name(name)?;
            let spec = spec.clone().bind(name);
            spec.verify()?;

            if own
                .iter()
                .any(|f| f.name() == spec.name() || f.keyword() == spec.keyword())
            {
                return Err(SchemaError::DuplicateKeyword {
                    schema: self.name.clone(),
                    keyword: spec.keyword().to_string(),
                });
            }
            own.push(spec);
        }
        Ok(own)
    }
}

/// C3 linearisation of `parents`, excluding the schema being built
fn linearize(name: &str, parents: &[Arc<Schema>]) -> Result<Vec<Arc<Schema>>, SchemaError> {
    let mut sequences: Vec<Vec<Arc<Schema>>> = parents
        .iter()
        .map(|parent| {
            std::iter::once(Arc::clone(parent))
                .chain(parent.lineage.iter().cloned())
                .collect()
        })
        .collect();
    sequences.push(parents.to_vec());

    let mut lineage: Vec<Arc<Schema>> = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(lineage);
        }

        // first head that does not appear in the tail of any sequence
        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq[1..].iter().any(|s| s.id == head.id))
            })
            .cloned()
            .ok_or_else(|| SchemaError::InconsistentHierarchy {
                schema: name.to_string(),
            })?;

        for seq in sequences.iter_mut() {
            if seq[0].id == candidate.id {
                seq.remove(0);
            }
        }
        lineage.push(candidate);
    }
}

fn check_positions(fields: &[FieldSpec]) -> Result<(), SchemaError> {
    let mut claimed: HashMap<usize, &str> = HashMap::new();
    for field in fields {
        if let Some(position) = field.position() {
            if let Some(first) = claimed.insert(position, field.keyword()) {
                return Err(SchemaError::DuplicatePosition {
                    position,
                    first: first.to_string(),
                    second: field.keyword().to_string(),
                });
            }
        }
    }
    Ok(())
}
