//! Location-aware AVSC schema parser
//!
//! This library parses JSON-encoded Avro schemas into a validated, fully
//! linked schema graph. A parse session enforces unique full names for
//! named types, resolves unqualified names against lexically scoped
//! namespaces, and links forward and recursive references once the whole
//! document has been read. Every error carries the source location of the
//! construct that caused it.

pub mod error;
pub mod schema;

// Re-export main types
pub use error::{NamespaceError, SchemaError};
pub use schema::{
    parse_schema, parse_schema_with_options, AvroSchema, AvscParser, EnumSchema, FieldOrder,
    FieldSchema, FixedSchema, Located, LogicalType, LogicalTypeName, NamespaceStack, ParseContext,
    ParsedSchema, ParserConfig, PendingReference, RecordSchema, SchemaId, SchemaRef, SchemaSlot,
    SlotPosition, TextLocation,
};
