//! Header Schema Core
//!
//! Declarative schemas for ordered keyword/value/comment headers such as the
//! headers of FITS files.
//!
//! ## Features
//!
//! - **Field specifications**: keyword, accepted types, allowed values,
//!   position, required/optional, emptiness and a descriptive unit
//! - **Schema inheritance**: schemas extend one or more parents and override
//!   inherited cards by keyword, with a C3 lineage
//! - **Validation policy**: findings either abort validation (`raise`) or are
//!   logged through `tracing` and collected (`log`)
//! - **Typed instances**: a validated header exposes only declared cards
//! - **Declarative documents**: schemas written as YAML, JSON or TOML
//!
//! ## Architecture
//!
//! 1. **Data model** (`value`, `header`): card values and the ordered header.
//!
//! 2. **Findings** (`finding`, `policy`): what went wrong and how it is
//!    reported.
//!
//! 3. **Schema** (`keyword`, `field`, `schema`): field specifications and
//!    their composition into schemas.
//!
//! 4. **Validation** (`validator`, `instance`): checking a header and binding
//!    it to its schema.
//!
//! 5. **Catalogue** (`definition`, `registry`, `standard`): document loading
//!    and the built-in FITS layouts.
//!
//! ## Example
//!
//! ```rust
//! use header_schema_core::{FieldSpec, Header, OnError, Schema, ValueKind};
//!
//! let schema = Schema::builder("ObservationHeader")
//!     .card("SIMPLE", FieldSpec::new().with_position(0).with_allowed(true))
//!     .card("EXPTIME", FieldSpec::new().with_type(ValueKind::Float).with_unit("s"))
//!     .build()
//!     .unwrap();
//!
//! let mut header = Header::new();
//! header.set("SIMPLE", true);
//! header.set("EXPTIME", 30.0);
//!
//! let report = schema.validate_header(&header, OnError::Log).unwrap();
//! assert!(report.is_valid());
//! ```

pub mod definition;
pub mod error;
pub mod field;
pub mod finding;
pub mod header;
pub mod instance;
pub mod keyword;
pub mod policy;
pub mod registry;
pub mod schema;
pub mod standard;
pub mod validator;
pub mod value;

pub use definition::{
    read_document, CardDefinition, DocumentFormat, OneOrMany, SchemaDefinition, SchemaDocument,
};
pub use error::{Error, Result, SchemaError, ValidationError};
pub use field::FieldSpec;
pub use finding::{Finding, FindingKind, Severity};
pub use header::{Card, Header};
pub use instance::HeaderInstance;
pub use policy::{OnError, ValidationReport};
pub use registry::SchemaRegistry;
pub use schema::{CardGroup, CardGroups, Schema, SchemaBuilder, SchemaId};
pub use validator::HeaderValidator;
pub use value::{Value, ValueKind};
