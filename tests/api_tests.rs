//! Integration tests for the public parsing API: string and file input,
//! session URIs, parser configuration, and error reporting.

use std::io::Write;

use avsc_parser::schema::{AvscParser, ParseContext, ParserConfig};
use avsc_parser::{parse_schema, AvroSchema, Located, SchemaError, TextLocation};
use tempfile::NamedTempFile;

const USER_SCHEMA: &str = r#"{
    "type": "record",
    "name": "User",
    "namespace": "com.example",
    "fields": [
        {"name": "id", "type": "long"},
        {"name": "email", "type": ["null", "string"], "default": null},
        {"name": "friends", "type": {"type": "array", "items": "User"}}
    ]
}"#;

fn write_schema(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write schema");
    file.flush().expect("flush schema");
    file
}

// =============================================================================
// String Input
// =============================================================================

#[test]
fn test_parse_str_uses_content_hash_uri() {
    let parsed = parse_schema(USER_SCHEMA).unwrap();
    let uri = parsed.uri();

    assert_eq!(uri.scheme(), "avsc");
    let host = uri.host_str().expect("hash in host position");
    assert_eq!(host.len(), 16);
    assert!(host.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_string_uri_is_deterministic() {
    let first = ParseContext::for_string(USER_SCHEMA).unwrap();
    let second = ParseContext::for_string(USER_SCHEMA).unwrap();
    let other = ParseContext::for_string(r#""int""#).unwrap();

    assert_eq!(first.uri(), second.uri());
    assert_ne!(first.uri(), other.uri());
}

#[test]
fn test_parser_is_reusable() {
    let parser = AvscParser::default();
    let a = parser.parse_str(USER_SCHEMA).unwrap();
    let b = parser.parse_str(USER_SCHEMA).unwrap();
    assert_eq!(a.full_names(), b.full_names());
    assert_eq!(a.defined_schemas().len(), b.defined_schemas().len());
}

#[test]
fn test_parse_with_context_requires_fresh_context() {
    let parser = AvscParser::default();

    let mut defined = ParseContext::for_string(USER_SCHEMA).unwrap();
    defined
        .define_schema(Located::new(AvroSchema::Int, TextLocation::new(1, 1, 1)), true)
        .unwrap();
    assert!(!defined.is_fresh());
    assert!(matches!(
        parser.parse_with_context(r#""long""#, defined),
        Err(SchemaError::InvalidSchema { .. })
    ));

    let mut scoped = ParseContext::for_string(USER_SCHEMA).unwrap();
    scoped.push_namespace("stale").unwrap();
    assert!(matches!(
        parser.parse_with_context(USER_SCHEMA, scoped),
        Err(SchemaError::InvalidSchema { .. })
    ));

    let fresh = ParseContext::for_string(USER_SCHEMA).unwrap();
    assert!(fresh.is_fresh());
    let parsed = parser.parse_with_context(USER_SCHEMA, fresh).unwrap();
    assert_eq!(parsed.full_names(), vec!["com.example.User"]);
}

// =============================================================================
// File Input
// =============================================================================

#[test]
fn test_parse_file() {
    let file = write_schema(USER_SCHEMA);
    let parsed = AvscParser::default().parse_file(file.path()).unwrap();

    assert_eq!(parsed.full_names(), vec!["com.example.User"]);
    assert_eq!(parsed.uri().scheme(), "file");

    let canonical = file.path().canonicalize().unwrap();
    assert_eq!(parsed.uri().to_file_path().unwrap(), canonical);
}

#[test]
fn test_parse_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.avsc");

    match AvscParser::default().parse_file(&missing) {
        Err(SchemaError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_parse_file_error_carries_location() {
    let file = write_schema("{\n  \"type\": \"record\",\n  \"name\": \"R\"\n}");
    let err = AvscParser::default().parse_file(file.path()).unwrap_err();

    assert!(matches!(err, SchemaError::InvalidSchema { .. }));
    let location = err.location().expect("location");
    assert_eq!(location.line, 1);
    assert_eq!(location.column, 1);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = ParserConfig::default();
    assert!(!config.strict);
    assert_eq!(config.max_depth, 128);
    assert_eq!(ParserConfig::new().strict(), ParserConfig::new().with_strict(true));
}

#[test]
fn test_max_depth_limits_nesting() {
    let nested = r#"{"type": "array", "items": {"type": "array", "items": {"type": "array", "items": "int"}}}"#;

    let shallow = AvscParser::new(ParserConfig::new().with_max_depth(2));
    assert!(matches!(
        shallow.parse_str(nested),
        Err(SchemaError::InvalidSchema { .. })
    ));

    let deep = AvscParser::new(ParserConfig::new().with_max_depth(8));
    assert!(deep.parse_str(nested).is_ok());
}

#[test]
fn test_strict_parser_rejects_bad_order() {
    let json = r#"{"type": "record", "name": "R", "fields": [{"name": "a", "type": "int", "order": "sideways"}]}"#;
    assert!(AvscParser::new(ParserConfig::new().strict()).parse_str(json).is_err());
    assert!(AvscParser::default().parse_str(json).is_ok());
}

// =============================================================================
// Errors and Messages
// =============================================================================

#[test]
fn test_json_error_location() {
    let err = parse_schema("{\n  \"type\": \"int\",\n}").unwrap_err();
    match &err {
        SchemaError::Json { location, .. } => assert_eq!(location.line, 3),
        other => panic!("Expected Json error, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Invalid JSON at line 3"));
}

#[test]
fn test_unresolved_reference_message_lists_locations() {
    let json = "[\"null\",\n \"Missing\",\n {\"type\": \"array\", \"items\": \"Missing\"}]";
    let err = parse_schema(json).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("'Missing'"), "{}", message);
    assert!(message.contains("line 2, column 2"), "{}", message);
    assert!(message.contains("line 3"), "{}", message);
}

#[test]
fn test_trailing_content_is_rejected() {
    assert!(matches!(
        parse_schema(r#""int" "long""#),
        Err(SchemaError::Json { .. })
    ));
}

#[test]
fn test_locations_are_recorded_for_definitions() {
    let parsed = parse_schema(USER_SCHEMA).unwrap();
    let top = parsed.top_level();
    assert_eq!(top.location().line, 1);
    assert!(matches!(top.value(), AvroSchema::Record(_)));

    let record = match top.value() {
        AvroSchema::Record(r) => r,
        _ => unreachable!(),
    };
    assert_eq!(record.fields[2].location.line, 8);
}
