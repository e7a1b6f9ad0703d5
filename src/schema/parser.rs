//! AVSC parser.
//!
//! Walks a location-aware JSON tree and drives a [`ParseContext`]: namespace
//! scopes are pushed and popped around named type definitions, every
//! completed schema is defined in the session (children before their
//! parents), and symbolic type names become [`SchemaRef`] slots that the
//! session resolves once the whole document has been read.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::schema::context::ParseContext;
use crate::schema::json::{self, JsonNode, JsonValue};
use crate::schema::location::{Located, TextLocation};
use crate::schema::parsed::ParsedSchema;
use crate::schema::types::{
    AvroSchema, EnumSchema, FieldOrder, FieldSchema, FixedSchema, LogicalType, LogicalTypeName,
    RecordSchema, SchemaId, SchemaRef,
};

/// Default limit on schema nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parse an Avro schema from an AVSC string.
///
/// # Example
/// ```
/// use avsc_parser::schema::{parse_schema, AvroSchema};
///
/// let parsed = parse_schema(r#""string""#).unwrap();
/// assert_eq!(*parsed.top_level().value(), AvroSchema::String);
/// ```
pub fn parse_schema(json: &str) -> Result<ParsedSchema, SchemaError> {
    parse_schema_with_options(json, false)
}

/// Parse an Avro schema from an AVSC string with validation options.
///
/// In strict mode:
/// - Union types cannot contain duplicate types
/// - Union types cannot contain nested unions
/// - Names must follow Avro naming rules (start with letter/underscore, contain only alphanumeric/underscore)
/// - Field `order` must be one of ascending, descending, ignore
///
/// In permissive mode (default), these violations are logged as warnings.
///
/// # Example
/// ```
/// use avsc_parser::schema::parse_schema_with_options;
///
/// // Permissive mode - warnings only
/// assert!(parse_schema_with_options(r#"["int", "int"]"#, false).is_ok());
///
/// // Strict mode - fails on duplicate types in union
/// assert!(parse_schema_with_options(r#"["int", "int"]"#, true).is_err());
/// ```
pub fn parse_schema_with_options(json: &str, strict: bool) -> Result<ParsedSchema, SchemaError> {
    AvscParser::new(ParserConfig::new().with_strict(strict)).parse_str(json)
}

/// Configuration for [`AvscParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Treat naming and union rule violations as errors (default: false).
    pub strict: bool,
    /// Maximum schema nesting depth (default: 128).
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new ParserConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to use strict schema validation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable strict schema validation.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Set the maximum schema nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parser for AVSC documents.
///
/// Each call parses one document in a fresh session, so a parser can be
/// reused and shared freely.
#[derive(Debug, Clone, Default)]
pub struct AvscParser {
    config: ParserConfig,
}

impl AvscParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a raw AVSC string.
    pub fn parse_str(&self, avsc: &str) -> Result<ParsedSchema, SchemaError> {
        let context = ParseContext::for_string(avsc)?;
        self.parse_with_context(avsc, context)
    }

    /// Read and parse an AVSC file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedSchema, SchemaError> {
        let path = path.as_ref();
        let avsc = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let context = ParseContext::for_file(path)?;
        self.parse_with_context(&avsc, context)
    }

    /// Parse `avsc` into a caller-supplied, unused context.
    ///
    /// # Errors
    /// [`SchemaError::InvalidSchema`] if `context` already holds definitions,
    /// pending references, or pushed namespaces.
    pub fn parse_with_context(
        &self,
        avsc: &str,
        context: ParseContext,
    ) -> Result<ParsedSchema, SchemaError> {
        if !context.is_fresh() {
            return Err(SchemaError::invalid(
                format!("parse context for {} has already been used", context.uri()),
                TextLocation::new(1, 1, 1),
            ));
        }
        debug!(uri = %context.uri(), strict = self.config.strict, "parsing avsc");

        let root = json::parse_document(avsc)?;
        let mut walker = Walker {
            context,
            config: &self.config,
            depth: 0,
        };
        walker.parse(&root, true)?;
        walker.context.finish()
    }
}

/// Recursive descent over one document.
struct Walker<'a> {
    context: ParseContext,
    config: &'a ParserConfig,
    depth: usize,
}

/// Name and effective namespace of a named type definition.
struct NamedIdentity {
    name: String,
    namespace: String,
}

impl Walker<'_> {
    fn parse(&mut self, node: &JsonNode, top_level: bool) -> Result<SchemaRef, SchemaError> {
        if self.depth >= self.config.max_depth {
            return Err(SchemaError::invalid(
                format!("schema nesting deeper than {} levels", self.config.max_depth),
                node.location,
            ));
        }

        self.depth += 1;
        let result = match &node.value {
            JsonValue::String(s) => self.parse_string_schema(s, node.location, top_level),
            JsonValue::Object(_) => self.parse_object_schema(node, top_level),
            JsonValue::Array(variants) => self.parse_union_schema(variants, node.location, top_level),
            _ => Err(SchemaError::invalid(
                format!("Expected string, object, or array, found {}", node.kind()),
                node.location,
            )),
        };
        self.depth -= 1;
        result
    }

    fn define(
        &mut self,
        schema: AvroSchema,
        location: TextLocation,
        top_level: bool,
    ) -> Result<SchemaId, SchemaError> {
        self.context
            .define_schema(Located::new(schema, location), top_level)
    }

    /// Parse a primitive type or named type reference from a string.
    fn parse_string_schema(
        &mut self,
        s: &str,
        location: TextLocation,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        match AvroSchema::primitive(s) {
            Some(primitive) => self
                .define(primitive, location, top_level)
                .map(SchemaRef::Resolved),
            None => self.parse_reference(s, location, top_level),
        }
    }

    fn parse_reference(
        &mut self,
        name: &str,
        location: TextLocation,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let slot = self.context.reference(name, location);
        match slot {
            // Nothing is defined before the outermost schema, so a top-level
            // reference can never resolve.
            SchemaRef::Pending {
                full_name,
                location,
            } if top_level => Err(SchemaError::UnresolvedReference {
                name: full_name,
                locations: vec![location],
            }),
            slot => Ok(slot),
        }
    }

    /// Parse a complex type from a JSON object.
    fn parse_object_schema(
        &mut self,
        node: &JsonNode,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let type_node = node
            .get("type")
            .ok_or_else(|| SchemaError::invalid("Missing 'type' field", node.location))?;

        let type_str = match &type_node.value {
            JsonValue::String(s) => s.as_str(),
            JsonValue::Object(_) | JsonValue::Array(_) => return self.parse(type_node, top_level),
            _ => {
                return Err(SchemaError::invalid(
                    format!("'type' must be a string, object, or array, found {}", type_node.kind()),
                    type_node.location,
                ))
            }
        };

        if let Some(primitive) = AvroSchema::primitive(type_str) {
            return self.parse_primitive_object(node, primitive, top_level);
        }

        match type_str {
            "record" => self.parse_record_schema(node, false, top_level),
            "error" => self.parse_record_schema(node, true, top_level),
            "enum" => self.parse_enum_schema(node, top_level),
            "array" => self.parse_array_schema(node, top_level),
            "map" => self.parse_map_schema(node, top_level),
            "fixed" => self.parse_fixed_object(node, top_level),
            other => self.parse_reference(other, type_node.location, top_level),
        }
    }

    /// Primitive types can also appear as objects, possibly with a logical type.
    fn parse_primitive_object(
        &mut self,
        node: &JsonNode,
        primitive: AvroSchema,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        match self.logical_type_of(node)? {
            Some(logical_type) => {
                let base = self.define(primitive, node.location, false)?;
                self.define_logical(base, logical_type, node.location, top_level)
            }
            None => self
                .define(primitive, node.location, top_level)
                .map(SchemaRef::Resolved),
        }
    }

    /// Parse a union schema from a JSON array.
    fn parse_union_schema(
        &mut self,
        variants: &[JsonNode],
        location: TextLocation,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        if variants.is_empty() {
            return Err(SchemaError::invalid(
                "Union schema cannot be empty",
                location,
            ));
        }

        let slots = variants
            .iter()
            .map(|v| self.parse(v, false))
            .collect::<Result<Vec<_>, _>>()?;

        self.validate_union(&slots, variants)?;

        self.define(AvroSchema::Union(slots), location, top_level)
            .map(SchemaRef::Resolved)
    }

    /// Parse a record schema.
    fn parse_record_schema(
        &mut self,
        node: &JsonNode,
        is_error: bool,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let identity = self.named_identity(node, "Record")?;

        let fields_node = node.get("fields").ok_or_else(|| {
            SchemaError::invalid("Record missing 'fields' array", node.location)
        })?;
        let field_nodes = fields_node.as_array().ok_or_else(|| {
            SchemaError::invalid("Record 'fields' must be an array", fields_node.location)
        })?;

        let (namespace, fields) = self.in_namespace(&identity.namespace, node.location, |walker| {
            let namespace = walker.context.current_namespace().to_string();
            let fields = walker.parse_fields(field_nodes)?;
            Ok((namespace, fields))
        })?;

        let record = RecordSchema {
            name: identity.name,
            namespace: non_empty(namespace),
            fields,
            doc: doc_of(node),
            aliases: string_list(node.get("aliases")),
            is_error,
        };

        self.define(AvroSchema::Record(record), node.location, top_level)
            .map(SchemaRef::Resolved)
    }

    fn parse_fields(&mut self, nodes: &[JsonNode]) -> Result<Vec<FieldSchema>, SchemaError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(nodes.len());

        for node in nodes {
            let field = self.parse_field_schema(node)?;
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::invalid(
                    format!("Duplicate field name '{}'", field.name),
                    node.location,
                ));
            }
            fields.push(field);
        }

        Ok(fields)
    }

    /// Parse a field schema within a record.
    fn parse_field_schema(&mut self, node: &JsonNode) -> Result<FieldSchema, SchemaError> {
        if !node.is_object() {
            return Err(SchemaError::invalid("Field must be an object", node.location));
        }

        let name_node = node
            .get("name")
            .ok_or_else(|| SchemaError::invalid("Field missing 'name'", node.location))?;
        let name = name_node
            .as_str()
            .ok_or_else(|| SchemaError::invalid("Field 'name' must be a string", name_node.location))?
            .to_string();

        self.validate_name(&name, "Field", name_node.location)?;

        let type_node = node
            .get("type")
            .ok_or_else(|| SchemaError::invalid("Field missing 'type'", node.location))?;
        let schema = self.parse(type_node, false)?;

        let order = match node.get("order") {
            None => FieldOrder::Ascending,
            Some(order_node) => match order_node.as_str() {
                Some("ascending") => FieldOrder::Ascending,
                Some("descending") => FieldOrder::Descending,
                Some("ignore") => FieldOrder::Ignore,
                _ => {
                    self.violation(
                        format!("Field '{}' has invalid order", name),
                        order_node.location,
                    )?;
                    FieldOrder::Ascending
                }
            },
        };

        Ok(FieldSchema {
            name,
            schema,
            default: node.get("default").map(JsonNode::to_value),
            doc: doc_of(node),
            order,
            aliases: string_list(node.get("aliases")),
            location: node.location,
        })
    }

    /// Parse an enum schema.
    fn parse_enum_schema(
        &mut self,
        node: &JsonNode,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let identity = self.named_identity(node, "Enum")?;

        let symbols_node = node.get("symbols").ok_or_else(|| {
            SchemaError::invalid("Enum missing 'symbols' array", node.location)
        })?;
        let symbol_nodes = symbols_node.as_array().ok_or_else(|| {
            SchemaError::invalid("Enum 'symbols' must be an array", symbols_node.location)
        })?;

        if symbol_nodes.is_empty() {
            return Err(SchemaError::invalid(
                "Enum must have at least one symbol",
                symbols_node.location,
            ));
        }

        let mut symbols = Vec::with_capacity(symbol_nodes.len());
        for symbol_node in symbol_nodes {
            let symbol = symbol_node.as_str().ok_or_else(|| {
                SchemaError::invalid("Enum symbol must be a string", symbol_node.location)
            })?;
            self.validate_name(symbol, "Enum symbol", symbol_node.location)?;
            if symbols.iter().any(|s| s == symbol) {
                return Err(SchemaError::invalid(
                    format!("Duplicate enum symbol '{}'", symbol),
                    symbol_node.location,
                ));
            }
            symbols.push(symbol.to_string());
        }

        let default = match node.get("default") {
            None => None,
            Some(default_node) => match default_node.as_str() {
                Some(d) if symbols.iter().any(|s| s == d) => Some(d.to_string()),
                _ => {
                    return Err(SchemaError::invalid(
                        "Enum default must be one of its symbols",
                        default_node.location,
                    ))
                }
            },
        };

        let namespace = self.in_namespace(&identity.namespace, node.location, |walker| {
            Ok(walker.context.current_namespace().to_string())
        })?;

        let enum_schema = EnumSchema {
            name: identity.name,
            namespace: non_empty(namespace),
            symbols,
            doc: doc_of(node),
            aliases: string_list(node.get("aliases")),
            default,
        };

        self.define(AvroSchema::Enum(enum_schema), node.location, top_level)
            .map(SchemaRef::Resolved)
    }

    /// Parse an array schema.
    fn parse_array_schema(
        &mut self,
        node: &JsonNode,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let items = node
            .get("items")
            .ok_or_else(|| SchemaError::invalid("Array missing 'items' field", node.location))?;

        let item_schema = self.parse(items, false)?;
        self.define(AvroSchema::Array(item_schema), node.location, top_level)
            .map(SchemaRef::Resolved)
    }

    /// Parse a map schema.
    fn parse_map_schema(
        &mut self,
        node: &JsonNode,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let values = node
            .get("values")
            .ok_or_else(|| SchemaError::invalid("Map missing 'values' field", node.location))?;

        let value_schema = self.parse(values, false)?;
        self.define(AvroSchema::Map(value_schema), node.location, top_level)
            .map(SchemaRef::Resolved)
    }

    /// Parse a fixed schema. A logical type stays on the named fixed so that
    /// references to it by name keep the annotation.
    fn parse_fixed_object(
        &mut self,
        node: &JsonNode,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let logical_type = self.logical_type_of(node)?;
        let mut fixed = self.parse_fixed_schema(node)?;
        fixed.logical_type = logical_type;

        self.define(AvroSchema::Fixed(fixed), node.location, top_level)
            .map(SchemaRef::Resolved)
    }

    fn parse_fixed_schema(&mut self, node: &JsonNode) -> Result<FixedSchema, SchemaError> {
        let identity = self.named_identity(node, "Fixed")?;

        let size_node = node
            .get("size")
            .ok_or_else(|| SchemaError::invalid("Fixed missing 'size' field", node.location))?;
        let size = size_node
            .as_u64()
            .and_then(|s| usize::try_from(s).ok())
            .ok_or_else(|| {
                SchemaError::invalid(
                    "Fixed 'size' must be a non-negative integer",
                    size_node.location,
                )
            })?;

        let namespace = self.in_namespace(&identity.namespace, node.location, |walker| {
            Ok(walker.context.current_namespace().to_string())
        })?;

        Ok(FixedSchema {
            name: identity.name,
            namespace: non_empty(namespace),
            size,
            doc: doc_of(node),
            aliases: string_list(node.get("aliases")),
            logical_type: None,
        })
    }

    /// Read the `logicalType` annotation of an object, if it names a known
    /// logical type. Unknown logical types are ignored per Avro rules.
    fn logical_type_of(&self, node: &JsonNode) -> Result<Option<LogicalTypeName>, SchemaError> {
        let Some(lt_node) = node.get("logicalType") else {
            return Ok(None);
        };
        let name = lt_node.as_str().ok_or_else(|| {
            SchemaError::invalid("logicalType must be a string", lt_node.location)
        })?;

        let logical_type = match name {
            "decimal" => {
                let precision = node
                    .get("precision")
                    .and_then(JsonNode::as_u64)
                    .and_then(|p| u32::try_from(p).ok())
                    .ok_or_else(|| {
                        SchemaError::invalid("Decimal missing 'precision'", node.location)
                    })?;
                let scale = node
                    .get("scale")
                    .and_then(JsonNode::as_u64)
                    .and_then(|s| u32::try_from(s).ok())
                    .unwrap_or(0);
                if scale > precision {
                    return Err(SchemaError::invalid(
                        format!("Decimal scale {} exceeds precision {}", scale, precision),
                        node.location,
                    ));
                }
                LogicalTypeName::Decimal { precision, scale }
            }
            "uuid" => LogicalTypeName::Uuid,
            "date" => LogicalTypeName::Date,
            "time-millis" => LogicalTypeName::TimeMillis,
            "time-micros" => LogicalTypeName::TimeMicros,
            "timestamp-millis" => LogicalTypeName::TimestampMillis,
            "timestamp-micros" => LogicalTypeName::TimestampMicros,
            "timestamp-nanos" => LogicalTypeName::TimestampNanos,
            "local-timestamp-millis" => LogicalTypeName::LocalTimestampMillis,
            "local-timestamp-micros" => LogicalTypeName::LocalTimestampMicros,
            "local-timestamp-nanos" => LogicalTypeName::LocalTimestampNanos,
            "duration" => LogicalTypeName::Duration,
            other => {
                debug!(logical_type = other, location = %lt_node.location, "ignoring unknown logical type");
                return Ok(None);
            }
        };

        Ok(Some(logical_type))
    }

    fn define_logical(
        &mut self,
        base: SchemaId,
        logical_type: LogicalTypeName,
        location: TextLocation,
        top_level: bool,
    ) -> Result<SchemaRef, SchemaError> {
        self.define(
            AvroSchema::Logical(LogicalType::new(base, logical_type)),
            location,
            top_level,
        )
        .map(SchemaRef::Resolved)
    }

    /// Work out the simple name and namespace of a named type definition.
    ///
    /// A dotted name carries its own namespace; otherwise the `namespace`
    /// attribute applies; otherwise the namespace in scope is inherited.
    fn named_identity(&self, node: &JsonNode, kind: &str) -> Result<NamedIdentity, SchemaError> {
        let name_node = node.get("name").ok_or_else(|| {
            SchemaError::invalid(format!("{} missing 'name' field", kind), node.location)
        })?;
        let raw = name_node.as_str().ok_or_else(|| {
            SchemaError::invalid(format!("{} 'name' must be a string", kind), name_node.location)
        })?;

        let (namespace, name) = match raw.rsplit_once('.') {
            Some((namespace, name)) => (namespace.to_string(), name.to_string()),
            None => {
                let namespace = match node.get("namespace") {
                    None => self.context.current_namespace().to_string(),
                    Some(ns_node) => match &ns_node.value {
                        JsonValue::String(ns) => ns.clone(),
                        JsonValue::Null => String::new(),
                        _ => {
                            return Err(SchemaError::invalid(
                                format!("{} 'namespace' must be a string", kind),
                                ns_node.location,
                            ))
                        }
                    },
                };
                (namespace, raw.to_string())
            }
        };

        self.validate_name(&name, kind, name_node.location)?;
        if !namespace.is_empty() {
            for part in namespace.split('.') {
                self.validate_name(part, "Namespace", name_node.location)?;
            }
        }

        Ok(NamedIdentity { name, namespace })
    }

    /// Run `f` with `namespace` as the namespace in scope.
    ///
    /// The namespace is pushed only when it differs from the current one and
    /// popped again once `f` returns.
    fn in_namespace<T>(
        &mut self,
        namespace: &str,
        location: TextLocation,
        f: impl FnOnce(&mut Self) -> Result<T, SchemaError>,
    ) -> Result<T, SchemaError> {
        let scoped = namespace != self.context.current_namespace();
        if scoped {
            self.context
                .push_namespace(namespace)
                .map_err(|source| SchemaError::Namespace { source, location })?;
        }

        let result = f(self);

        if scoped {
            self.context
                .pop_namespace()
                .map_err(|source| SchemaError::Namespace { source, location })?;
        }
        result
    }

    /// Report a rule violation: an error in strict mode, a warning otherwise.
    fn violation(&self, message: String, location: TextLocation) -> Result<(), SchemaError> {
        if self.config.strict {
            Err(SchemaError::invalid(message, location))
        } else {
            warn!(uri = %self.context.uri(), location = %location, "{}", message);
            Ok(())
        }
    }

    /// Validate that a name follows Avro naming rules.
    ///
    /// Avro names must:
    /// - Start with [A-Za-z_]
    /// - Contain only [A-Za-z0-9_]
    fn validate_name(
        &self,
        name: &str,
        kind: &str,
        location: TextLocation,
    ) -> Result<(), SchemaError> {
        let Some(first_char) = name.chars().next() else {
            return self.violation(format!("{} name cannot be empty", kind), location);
        };

        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            return self.violation(
                format!("{} name '{}' must start with a letter or underscore", kind, name),
                location,
            );
        }

        if let Some(ch) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
            return self.violation(
                format!(
                    "{} name '{}' contains invalid character '{}' (only alphanumeric and underscore allowed)",
                    kind, name, ch
                ),
                location,
            );
        }

        Ok(())
    }

    /// Validate union schema rules.
    ///
    /// Avro unions must:
    /// - Not contain duplicate types
    /// - Not contain nested unions
    fn validate_union(&self, slots: &[SchemaRef], nodes: &[JsonNode]) -> Result<(), SchemaError> {
        let mut seen_types = HashSet::new();

        for (i, (slot, node)) in slots.iter().zip(nodes).enumerate() {
            let type_key = self.type_key(slot);

            if type_key == "union" {
                self.violation(
                    format!(
                        "Union contains nested union at position {} (unions cannot be nested)",
                        i
                    ),
                    node.location,
                )?;
            } else if !seen_types.insert(type_key.clone()) {
                self.violation(
                    format!("Union contains duplicate type '{}' at position {}", type_key, i),
                    node.location,
                )?;
            }
        }

        Ok(())
    }

    /// Get a unique key for a schema type (for duplicate detection in unions).
    fn type_key(&self, slot: &SchemaRef) -> String {
        let schema = match slot {
            SchemaRef::Pending { full_name, .. } => return full_name.clone(),
            SchemaRef::Resolved(id) => match self.context.schema(*id) {
                Some(located) => located.value(),
                None => return String::new(),
            },
        };

        match schema {
            AvroSchema::Record(r) => r.fullname(),
            AvroSchema::Enum(e) => e.fullname(),
            AvroSchema::Fixed(f) => f.fullname(),
            AvroSchema::Logical(lt) => {
                format!("logical:{}", self.type_key(&SchemaRef::Resolved(lt.base)))
            }
            other => other.type_name().to_string(),
        }
    }
}

fn non_empty(namespace: String) -> Option<String> {
    if namespace.is_empty() {
        None
    } else {
        Some(namespace)
    }
}

fn doc_of(node: &JsonNode) -> Option<String> {
    node.get("doc").and_then(JsonNode::as_str).map(String::from)
}

fn string_list(node: Option<&JsonNode>) -> Vec<String> {
    node.and_then(JsonNode::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(parsed: &'a ParsedSchema, full_name: &str) -> &'a RecordSchema {
        match parsed.named_schema(full_name).map(|s| s.value()) {
            Some(AvroSchema::Record(r)) => r,
            other => panic!("Expected record {}, got {:?}", full_name, other),
        }
    }

    #[test]
    fn test_nested_record_inherits_namespace() {
        let parsed = parse_schema(
            r#"{
                "type": "record", "name": "Outer", "namespace": "com.example",
                "fields": [
                    {"name": "inner", "type": {"type": "record", "name": "Inner", "fields": []}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(record(&parsed, "com.example.Inner").namespace.as_deref(), Some("com.example"));
    }

    #[test]
    fn test_dotted_name_overrides_namespace_attribute() {
        let parsed = parse_schema(
            r#"{"type": "fixed", "name": "a.b.Hash", "namespace": "ignored", "size": 4}"#,
        )
        .unwrap();
        assert_eq!(parsed.full_names(), vec!["a.b.Hash"]);
    }

    #[test]
    fn test_namespace_scope_is_popped_after_definition() {
        let parsed = parse_schema(
            r#"{
                "type": "record", "name": "Outer",
                "fields": [
                    {"name": "a", "type": {"type": "enum", "name": "E", "namespace": "x", "symbols": ["A"]}},
                    {"name": "b", "type": {"type": "fixed", "name": "F", "size": 1}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.full_names(), vec!["F", "Outer", "x.E"]);
    }

    #[test]
    fn test_children_are_defined_before_parent() {
        let parsed = parse_schema(
            r#"{"type": "record", "name": "R", "fields": [{"name": "f", "type": "int"}]}"#,
        )
        .unwrap();
        let defined = parsed.defined_schemas();
        assert_eq!(defined.len(), 2);
        assert_eq!(*defined[0].value(), AvroSchema::Int);
        assert_eq!(parsed.top_level_id().index(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let parser = AvscParser::new(ParserConfig::new().with_max_depth(3));
        let ok = r#"{"type": "array", "items": {"type": "array", "items": "int"}}"#;
        assert!(parser.parse_str(ok).is_ok());

        let deep = r#"{"type": "array", "items": {"type": "array", "items": {"type": "array", "items": "int"}}}"#;
        assert!(matches!(
            parser.parse_str(deep),
            Err(SchemaError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_invalid_order_is_strict_only() {
        let json = r#"{"type": "record", "name": "R", "fields": [{"name": "f", "type": "int", "order": "sideways"}]}"#;
        assert!(parse_schema_with_options(json, false).is_ok());
        assert!(parse_schema_with_options(json, true).is_err());
    }
}
