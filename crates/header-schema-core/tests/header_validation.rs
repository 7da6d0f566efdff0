//! Integration tests for header validation
//!
//! Covers schema construction errors, the per-field checks, inheritance and
//! grouping, and the typed instance view.

use header_schema_core::standard::{self, PRIMARY_HEADER};
use header_schema_core::{
    Error, FieldSpec, FindingKind, Header, OnError, Schema, SchemaError, ValidationError, Value,
    ValueKind,
};
use std::sync::Arc;

fn header(cards: &[(&str, Value)]) -> Header {
    let mut header = Header::new();
    for (keyword, value) in cards {
        header.set(keyword, value.clone());
    }
    header
}

fn single(name: &str, spec: FieldSpec) -> Arc<Schema> {
    Schema::builder("TestHeader").card(name, spec).build().unwrap()
}

#[test]
fn test_keyword_length() {
    let err = Schema::builder("TestHeader")
        .card("MORE_THAN_8", FieldSpec::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKeyword { .. }));

    let schema = single("MORE_THAN_8", FieldSpec::new().with_long(true));
    assert!(schema.contains("MORE_THAN_8"));
}

#[test]
fn test_lowercase_keyword() {
    let err = Schema::builder("TestHeader")
        .card("simple", FieldSpec::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidKeyword { .. }));
}

#[test]
fn test_explicit_keyword() {
    let schema = single("DATE_OBS", FieldSpec::new().with_keyword("DATE-OBS"));
    assert!(schema.contains("DATE-OBS"));
    assert!(!schema.contains("DATE_OBS"));
    assert_eq!(schema.field_by_name("DATE_OBS").unwrap().keyword(), "DATE-OBS");
}

#[test]
fn test_primary_header() {
    let schema = standard::primary_header().unwrap();
    let valid = header(&[
        ("SIMPLE", true.into()),
        ("BITPIX", 16.into()),
        ("NAXIS", 0.into()),
    ]);
    let report = schema.validate_header(&valid, OnError::Raise).unwrap();
    assert!(report.is_valid());
    assert!(!report.has_warnings());

    let not_simple = header(&[
        ("SIMPLE", false.into()),
        ("BITPIX", 16.into()),
        ("NAXIS", 0.into()),
    ]);
    let err = schema.validate_header(&not_simple, OnError::Raise).unwrap_err();
    assert!(matches!(err, ValidationError::WrongValue(_)));
    assert_eq!(err.keyword(), "SIMPLE");
}

#[test]
fn test_position() {
    let schema = single("TEST", FieldSpec::new().with_position(0));

    let first = header(&[("TEST", "foo".into())]);
    assert!(schema.validate_header(&first, OnError::Raise).is_ok());

    let second = header(&[("FOO", "bar".into()), ("TEST", "foo".into())]);
    let err = schema.validate_header(&second, OnError::Raise).unwrap_err();
    assert!(matches!(err, ValidationError::WrongPosition(_)));
}

#[test]
fn test_required() {
    let required = single("TEST", FieldSpec::new());
    let optional = single("TEST", FieldSpec::new().optional());
    let empty = Header::new();

    let err = required.validate_header(&empty, OnError::Raise).unwrap_err();
    assert!(matches!(err, ValidationError::RequiredMissing(_)));
    assert!(optional.validate_header(&empty, OnError::Raise).is_ok());
}

#[test]
fn test_wrong_value() {
    let schema = single("TEST", FieldSpec::new().with_allowed_values(["foo", "bar"]));
    assert!(schema
        .validate_header(&header(&[("TEST", "foo".into())]), OnError::Raise)
        .is_ok());

    let err = schema
        .validate_header(&header(&[("TEST", "baz".into())]), OnError::Raise)
        .unwrap_err();
    assert!(matches!(err, ValidationError::WrongValue(_)));
}

#[test]
fn test_type() {
    let strict = single("TEST", FieldSpec::new().with_type(ValueKind::Str));
    let either = single(
        "TEST",
        FieldSpec::new().with_types([ValueKind::Str, ValueKind::Int]),
    );

    let string = header(&[("TEST", "foo".into())]);
    let int = header(&[("TEST", 5.into())]);
    let float = header(&[("TEST", 5.5.into())]);

    assert!(strict.validate_header(&string, OnError::Raise).is_ok());
    assert!(matches!(
        strict.validate_header(&int, OnError::Raise),
        Err(ValidationError::WrongType(_))
    ));
    assert!(either.validate_header(&string, OnError::Raise).is_ok());
    assert!(either.validate_header(&int, OnError::Raise).is_ok());
    assert!(matches!(
        either.validate_header(&float, OnError::Raise),
        Err(ValidationError::WrongType(_))
    ));
}

#[test]
fn test_empty() {
    let must_be_empty = single("TEST", FieldSpec::new().with_empty(true));
    let must_have_value = single("TEST", FieldSpec::new().with_empty(false));

    let undefined = header(&[("TEST", Value::Undefined)]);
    let defined = header(&[("TEST", "something".into())]);

    assert!(must_be_empty.validate_header(&undefined, OnError::Raise).is_ok());
    assert!(must_be_empty.validate_header(&defined, OnError::Raise).is_err());
    assert!(must_have_value.validate_header(&defined, OnError::Raise).is_ok());
    assert!(must_have_value.validate_header(&undefined, OnError::Raise).is_err());
}

#[test]
fn test_undefined_value_passes_type_and_allowed_checks() {
    let schema = single(
        "TEST",
        FieldSpec::new().with_type(ValueKind::Int).with_allowed(1),
    );
    let report = schema
        .validate_header(&header(&[("TEST", Value::Undefined)]), OnError::Raise)
        .unwrap();
    assert!(report.findings.is_empty());
}

#[test]
fn test_inheritance() {
    let base = Schema::builder("BaseHeader")
        .card("FOO", FieldSpec::new())
        .card("BAR", FieldSpec::new().with_type(ValueKind::Str))
        .build()
        .unwrap();
    let child = Schema::builder("InheritedHeader")
        .extends(&base)
        .card("BAR", FieldSpec::new().with_type(ValueKind::Int))
        .build()
        .unwrap();

    assert_eq!(child.keywords().collect::<Vec<_>>(), vec!["FOO", "BAR"]);
    assert_eq!(child.field("BAR").unwrap().types(), &[ValueKind::Int]);
    assert_eq!(base.field("BAR").unwrap().types(), &[ValueKind::Str]);
    assert!(child.is_a(&base));
    assert!(!base.is_a(&child));

    let h = header(&[("FOO", "x".into()), ("BAR", 1.into())]);
    assert!(child.validate_header(&h, OnError::Raise).is_ok());
    assert!(base.validate_header(&h, OnError::Raise).is_err());
}

#[test]
fn test_first_parent_wins() {
    let left = Schema::builder("Left")
        .card("KEY", FieldSpec::new().with_allowed("left"))
        .build()
        .unwrap();
    let right = Schema::builder("Right")
        .card("KEY", FieldSpec::new().with_allowed("right"))
        .build()
        .unwrap();
    let child = Schema::builder("Child")
        .extends(&left)
        .extends(&right)
        .build()
        .unwrap();

    assert_eq!(
        child.field("KEY").unwrap().allowed_values(),
        Some(&[Value::from("left")][..])
    );
}

#[test]
fn test_invalid_arguments() {
    let err = Schema::builder("TestHeader")
        .card("TEST", FieldSpec::new().with_type(ValueKind::Int).with_allowed("foo"))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InconsistentField { .. }));

    let err = Schema::builder("TestHeader")
        .card("TEST", FieldSpec::new().with_allowed_values(Vec::<Value>::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InconsistentField { .. }));

    let err = Schema::builder("TestHeader")
        .card("A", FieldSpec::new().with_position(0))
        .card("B", FieldSpec::new().with_position(0))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicatePosition { position: 0, .. }));

    assert_eq!(
        "warn".parse::<OnError>().unwrap_err(),
        SchemaError::InvalidOnError("warn".to_string())
    );
}

#[test]
fn test_additional_cards() {
    let schema = single("TEST", FieldSpec::new());
    let h = header(&[("TEST", "foo".into()), ("FOO", "bar".into())]);

    let report = schema.validate_header(&h, OnError::Raise).unwrap();
    assert!(report.is_valid());
    assert_eq!(report.warnings().len(), 1);
    assert_eq!(report.warnings()[0].kind, FindingKind::AdditionalHeaderCard);
}

#[test]
fn test_case_insensitive() {
    let insensitive = single("TEST", FieldSpec::new().with_allowed("foo"));
    let sensitive = single(
        "TEST",
        FieldSpec::new().with_allowed("foo").with_case_insensitive(false),
    );
    let h = header(&[("TEST", "FOO".into())]);

    assert!(insensitive.validate_header(&h, OnError::Raise).is_ok());
    assert!(matches!(
        sensitive.validate_header(&h, OnError::Raise),
        Err(ValidationError::WrongValue(_))
    ));
}

#[test]
fn test_log_policy_reports_every_check_on_one_card() {
    let schema = single(
        "BITPIX",
        FieldSpec::new()
            .with_type(ValueKind::Int)
            .with_allowed_values([8, 16]),
    );
    let report = schema
        .validate_header(&header(&[("BITPIX", "8".into())]), OnError::Log)
        .unwrap();
    let kinds: Vec<FindingKind> = report.errors().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FindingKind::WrongType, FindingKind::WrongValue]);

    let err = schema
        .validate_header(&header(&[("BITPIX", "8".into())]), OnError::Raise)
        .unwrap_err();
    assert!(matches!(err, ValidationError::WrongType(_)));
}

#[test]
fn test_log_policy_collects_errors() {
    let schema = standard::primary_header().unwrap();
    let h = header(&[
        ("BITPIX", 12.into()),
        ("SIMPLE", true.into()),
        ("DATE", 2024.into()),
    ]);

    let report = schema.validate_header(&h, OnError::Log).unwrap();
    assert_eq!(report.schema, PRIMARY_HEADER);
    assert!(!report.is_valid());

    let kinds: Vec<FindingKind> = report.errors().iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FindingKind::WrongType,
            FindingKind::WrongPosition,
            FindingKind::WrongPosition,
            FindingKind::WrongValue,
            FindingKind::RequiredMissing,
        ]
    );
}

#[test]
fn test_grouped_cards() {
    let group1 = Schema::builder("Group1")
        .card("KEY1", FieldSpec::new())
        .card("OVERRIDE", FieldSpec::new())
        .build()
        .unwrap();
    let group2 = Schema::builder("Group2")
        .card("KEY2", FieldSpec::new())
        .build()
        .unwrap();
    let compound = Schema::builder("CompoundHeader")
        .extends(&group1)
        .extends(&group2)
        .card("COMPKEY", FieldSpec::new())
        .card(
            "OVERRIDE",
            FieldSpec::new().with_allowed("overridden").with_unit("m"),
        )
        .build()
        .unwrap();

    let groups = compound.grouped_cards();
    assert_eq!(groups.len(), 3);

    let names: Vec<&str> = groups.iter().map(|g| g.schema.name()).collect();
    assert_eq!(names, vec!["CompoundHeader", "Group1", "Group2"]);

    let own = groups.get(&compound).unwrap();
    assert_eq!(own.keywords().collect::<Vec<_>>(), vec!["COMPKEY", "OVERRIDE"]);
    assert_eq!(own.get("OVERRIDE").unwrap().unit(), Some("m"));

    let first = groups.get(&group1).unwrap();
    assert_eq!(first.keywords().collect::<Vec<_>>(), vec!["KEY1", "OVERRIDE"]);
    assert_eq!(first.get("OVERRIDE").unwrap().unit(), Some("m"));

    assert!(groups.get(&group2).unwrap().contains("KEY2"));
}

#[test]
fn test_unknown_keyword_on_instance() {
    let schema = Schema::builder("MyHeader")
        .card("KEY1", FieldSpec::new())
        .card("KEY2", FieldSpec::new())
        .build()
        .unwrap();
    let mut instance = schema
        .instance(header(&[("KEY1", 1.into()), ("KEY2", 2.3.into())]))
        .unwrap();

    assert_eq!(instance.get("KEY2").unwrap(), &Value::Float(2.3));

    let err = instance.set("FOO", 5).unwrap_err();
    assert!(matches!(err, Error::UnknownKeyword(_)));
    assert_eq!(err.to_string(), "Unknown keyword: 'FOO'");

    instance.set("KEY1", "one").unwrap();
    assert_eq!(instance.header().value("KEY1"), Some(&Value::from("one")));
}
