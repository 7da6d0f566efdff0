//! Typed view over a validated header
//!
//! A [`HeaderInstance`] is a closed projection: only keywords the schema
//! declares can be read or written.

use std::sync::Arc;

use crate::error::{Error, Result, ValidationError};
use crate::field::FieldSpec;
use crate::header::Header;
use crate::policy::OnError;
use crate::schema::Schema;
use crate::value::Value;

static UNDEFINED: Value = Value::Undefined;

/// A header bound to the schema it was validated against
#[derive(Debug, Clone)]
pub struct HeaderInstance {
    schema: Arc<Schema>,
    header: Header,
}

impl HeaderInstance {
    /// Validate `header` with the raise policy and bind it to `schema`
    pub fn new(schema: Arc<Schema>, header: Header) -> std::result::Result<Self, ValidationError> {
        schema.validate_header(&header, OnError::Raise)?;
        Ok(Self { schema, header })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn into_header(self) -> Header {
        self.header
    }

    /// Value of a declared card, by card name or keyword.
    ///
    /// Declared optional cards that are absent read as `Undefined`.
    pub fn get(&self, key: &str) -> Result<&Value> {
        let field = self.resolve(key)?;
        Ok(self.header.value(field.keyword()).unwrap_or(&UNDEFINED))
    }

    /// Assign a declared card.
    ///
    /// The value must pass the field's emptiness, type and allowed-value
    /// rules; on failure the header is left untouched.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let field = self.resolve(key)?;

        if let Some(err) = field
            .check_value(&value)
            .into_iter()
            .find_map(ValidationError::from_finding)
        {
            return Err(Error::Validation(err));
        }

        let keyword = field.keyword().to_string();
        self.header.set(&keyword, value);
        Ok(())
    }

    fn resolve(&self, key: &str) -> Result<&FieldSpec> {
        self.schema
            .field_by_name(key)
            .or_else(|| self.schema.field(key))
            .ok_or_else(|| Error::UnknownKeyword(key.to_string()))
    }
}
