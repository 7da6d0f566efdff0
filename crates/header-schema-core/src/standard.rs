//! Schemas for the mandatory FITS header layouts
//!
//! `PrimaryHeader` covers the primary HDU, `BinTableHeader` a binary table
//! extension. Both inherit the optional informational cards of
//! `InformationalHeader`. Each schema is built once per process and shared,
//! so lineage and grouping lookups see the same parent instance.

use std::sync::{Arc, OnceLock};

use crate::error::SchemaError;
use crate::field::FieldSpec;
use crate::schema::Schema;
use crate::value::ValueKind;

pub const INFORMATIONAL_HEADER: &str = "InformationalHeader";
pub const PRIMARY_HEADER: &str = "PrimaryHeader";
pub const BINTABLE_HEADER: &str = "BinTableHeader";

/// Valid BITPIX values for image data
pub const BITPIX_VALUES: [i64; 6] = [8, 16, 32, 64, -32, -64];

fn optional_str(description: &str) -> FieldSpec {
    FieldSpec::new()
        .with_type(ValueKind::Str)
        .optional()
        .with_description(description)
}

type Cached = OnceLock<Result<Arc<Schema>, SchemaError>>;

/// Optional descriptive cards shared by every HDU
pub fn informational_header() -> Result<Arc<Schema>, SchemaError> {
    static SCHEMA: Cached = OnceLock::new();
    SCHEMA.get_or_init(build_informational).clone()
}

/// Primary HDU header
pub fn primary_header() -> Result<Arc<Schema>, SchemaError> {
    static SCHEMA: Cached = OnceLock::new();
    SCHEMA.get_or_init(build_primary).clone()
}

/// Binary table extension header
pub fn binary_table_header() -> Result<Arc<Schema>, SchemaError> {
    static SCHEMA: Cached = OnceLock::new();
    SCHEMA.get_or_init(build_binary_table).clone()
}

fn build_informational() -> Result<Arc<Schema>, SchemaError> {
    Schema::builder(INFORMATIONAL_HEADER)
        .description("Optional descriptive cards")
        .card("DATE", optional_str("Date the HDU was created"))
        .card("ORIGIN", optional_str("Organisation responsible for the file"))
        .card("TELESCOP", optional_str("Telescope that acquired the data"))
        .card("INSTRUME", optional_str("Instrument that acquired the data"))
        .card("OBSERVER", optional_str("Who acquired the data"))
        .card("OBJECT", optional_str("Name of the observed object"))
        .card("AUTHOR", optional_str("Who compiled the data"))
        .card("REFERENC", optional_str("Bibliographic reference"))
        .card(
            "DATE_OBS",
            optional_str("Date of the observation").with_keyword("DATE-OBS"),
        )
        .build()
}

fn build_primary() -> Result<Arc<Schema>, SchemaError> {
    let informational = informational_header()?;
    Schema::builder(PRIMARY_HEADER)
        .description("Mandatory cards of a primary HDU")
        .extends(&informational)
        .card(
            "SIMPLE",
            FieldSpec::new()
                .with_position(0)
                .with_type(ValueKind::Bool)
                .with_allowed(true)
                .with_description("File conforms to the FITS standard"),
        )
        .card(
            "BITPIX",
            FieldSpec::new()
                .with_position(1)
                .with_type(ValueKind::Int)
                .with_allowed_values(BITPIX_VALUES)
                .with_description("Bits per data value"),
        )
        .card(
            "NAXIS",
            FieldSpec::new()
                .with_position(2)
                .with_type(ValueKind::Int)
                .with_description("Number of data axes"),
        )
        .card(
            "EXTEND",
            FieldSpec::new()
                .with_type(ValueKind::Bool)
                .optional()
                .with_description("File may contain extensions"),
        )
        .build()
}

fn build_binary_table() -> Result<Arc<Schema>, SchemaError> {
    let informational = informational_header()?;
    let int_at = |position: usize, description: &str| {
        FieldSpec::new()
            .with_position(position)
            .with_type(ValueKind::Int)
            .with_description(description)
    };

    Schema::builder(BINTABLE_HEADER)
        .description("Mandatory cards of a binary table extension")
        .extends(&informational)
        .card(
            "XTENSION",
            FieldSpec::new()
                .with_position(0)
                .with_type(ValueKind::Str)
                .with_allowed("BINTABLE")
                .with_description("Extension type"),
        )
        .card("BITPIX", int_at(1, "Bits per data value").with_allowed(8))
        .card("NAXIS", int_at(2, "Number of data axes").with_allowed(2))
        .card("NAXIS1", int_at(3, "Bytes per row"))
        .card("NAXIS2", int_at(4, "Number of rows"))
        .card("PCOUNT", int_at(5, "Size of the heap"))
        .card("GCOUNT", int_at(6, "Number of groups").with_allowed(1))
        .card("TFIELDS", int_at(7, "Number of columns"))
        .card("EXTNAME", optional_str("Name of the extension"))
        .build()
}
