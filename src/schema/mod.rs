//! Avro schema parsing.
//!
//! This module defines the schema type system and the parse session that
//! turns an AVSC document into a linked schema graph: location tracking,
//! namespace scoping, the named schema registry, and forward-reference
//! resolution.

mod context;
mod json;
mod location;
mod namespace;
mod parsed;
mod parser;
mod resolution;
mod types;

pub use context::ParseContext;
pub use json::{parse_document, JsonNode, JsonValue, MAX_JSON_DEPTH};
pub use location::{LineIndex, Located, TextLocation};
pub use namespace::NamespaceStack;
pub use parsed::ParsedSchema;
pub use parser::{
    parse_schema, parse_schema_with_options, AvscParser, ParserConfig, DEFAULT_MAX_DEPTH,
};
pub use resolution::{PendingReference, SchemaSlot};
pub use types::*;
