//! The result of a completed parse.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Map, Value};
use url::Url;

use crate::schema::location::Located;
use crate::schema::types::{
    AvroSchema, EnumSchema, FieldOrder, FixedSchema, LogicalType, LogicalTypeName, RecordSchema,
    SchemaId, SchemaRef,
};

/// A fully linked schema graph produced by one parse session.
///
/// All [`SchemaRef`] slots are resolved. Named types may be shared between
/// several slots and may refer back to themselves.
#[derive(Debug, Clone)]
pub struct ParsedSchema {
    uri: Url,
    schemas: Vec<Located<AvroSchema>>,
    named: HashMap<String, SchemaId>,
    top_level: SchemaId,
}

impl ParsedSchema {
    pub(crate) fn new(
        uri: Url,
        schemas: Vec<Located<AvroSchema>>,
        named: HashMap<String, SchemaId>,
        top_level: SchemaId,
    ) -> Self {
        Self {
            uri,
            schemas,
            named,
            top_level,
        }
    }

    /// The resource that was parsed.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn top_level_id(&self) -> SchemaId {
        self.top_level
    }

    /// The outermost schema of the document.
    pub fn top_level(&self) -> &Located<AvroSchema> {
        &self.schemas[self.top_level.index()]
    }

    pub fn schema(&self, id: SchemaId) -> Option<&Located<AvroSchema>> {
        self.schemas.get(id.index())
    }

    /// Follow a slot to the schema it points at.
    pub fn resolve(&self, slot: &SchemaRef) -> Option<&AvroSchema> {
        slot.id()
            .and_then(|id| self.schema(id))
            .map(Located::value)
    }

    /// Every schema defined in the document, in definition order.
    pub fn defined_schemas(&self) -> &[Located<AvroSchema>] {
        &self.schemas
    }

    /// Named schemas by full name.
    pub fn named_schemas(&self) -> &HashMap<String, SchemaId> {
        &self.named
    }

    pub fn named_schema(&self, full_name: &str) -> Option<&Located<AvroSchema>> {
        self.named.get(full_name).and_then(|id| self.schema(*id))
    }

    /// Full names of all named schemas, sorted.
    pub fn full_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Serialize the top-level schema back to an AVSC JSON string.
    ///
    /// # Example
    /// ```
    /// use avsc_parser::schema::parse_schema;
    ///
    /// let parsed = parse_schema(r#""string""#).unwrap();
    /// assert_eq!(parsed.to_json(), r#""string""#);
    /// ```
    pub fn to_json(&self) -> String {
        let value = self.to_json_value();
        serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string())
    }

    /// Serialize the top-level schema to a JSON Value.
    ///
    /// Each named type is written in full the first time it is reached and
    /// as its full name after that, which also terminates recursive types.
    pub fn to_json_value(&self) -> Value {
        let mut written = HashSet::new();
        self.schema_to_json(self.top_level, &mut written)
    }

    fn slot_to_json(&self, slot: &SchemaRef, written: &mut HashSet<SchemaId>) -> Value {
        match slot {
            SchemaRef::Resolved(id) => self.schema_to_json(*id, written),
            SchemaRef::Pending { full_name, .. } => json!(full_name),
        }
    }

    fn schema_to_json(&self, id: SchemaId, written: &mut HashSet<SchemaId>) -> Value {
        let Some(located) = self.schema(id) else {
            return Value::Null;
        };
        let schema = located.value();

        if let Some(name) = schema.fullname() {
            if !written.insert(id) {
                return json!(name);
            }
        }

        match schema {
            AvroSchema::Null
            | AvroSchema::Boolean
            | AvroSchema::Int
            | AvroSchema::Long
            | AvroSchema::Float
            | AvroSchema::Double
            | AvroSchema::Bytes
            | AvroSchema::String => json!(schema.type_name()),

            AvroSchema::Record(r) => self.record_to_json(r, written),
            AvroSchema::Enum(e) => enum_to_json(e),
            AvroSchema::Fixed(f) => fixed_to_json(f),
            AvroSchema::Array(items) => {
                json!({
                    "type": "array",
                    "items": self.slot_to_json(items, written)
                })
            }
            AvroSchema::Map(values) => {
                json!({
                    "type": "map",
                    "values": self.slot_to_json(values, written)
                })
            }
            AvroSchema::Union(variants) => Value::Array(
                variants
                    .iter()
                    .map(|v| self.slot_to_json(v, written))
                    .collect(),
            ),
            AvroSchema::Logical(lt) => self.logical_to_json(lt, written),
        }
    }

    fn record_to_json(&self, record: &RecordSchema, written: &mut HashSet<SchemaId>) -> Value {
        let mut obj = named_header(
            if record.is_error { "error" } else { "record" },
            &record.name,
            record.namespace.as_deref(),
            record.doc.as_deref(),
            &record.aliases,
        );

        let fields: Vec<Value> = record
            .fields
            .iter()
            .map(|field| {
                let mut f = Map::new();
                f.insert("name".to_string(), json!(&field.name));
                f.insert("type".to_string(), self.slot_to_json(&field.schema, written));

                if let Some(default) = &field.default {
                    f.insert("default".to_string(), default.clone());
                }
                if let Some(doc) = &field.doc {
                    f.insert("doc".to_string(), json!(doc));
                }
                if field.order != FieldOrder::Ascending {
                    f.insert("order".to_string(), json!(field.order.as_str()));
                }
                if !field.aliases.is_empty() {
                    f.insert("aliases".to_string(), json!(&field.aliases));
                }
                Value::Object(f)
            })
            .collect();
        obj.insert("fields".to_string(), Value::Array(fields));

        Value::Object(obj)
    }

    /// Logical types are written as the base type with a `logicalType` attribute.
    fn logical_to_json(&self, logical: &LogicalType, written: &mut HashSet<SchemaId>) -> Value {
        let mut obj = match self.schema_to_json(logical.base, written) {
            Value::Object(m) => m,
            other => {
                let mut m = Map::new();
                m.insert("type".to_string(), other);
                m
            }
        };

        insert_logical_type(&mut obj, &logical.logical_type);
        Value::Object(obj)
    }
}

fn insert_logical_type(obj: &mut Map<String, Value>, logical_type: &LogicalTypeName) {
    obj.insert("logicalType".to_string(), json!(logical_type.name()));

    if let LogicalTypeName::Decimal { precision, scale } = logical_type {
        obj.insert("precision".to_string(), json!(precision));
        if *scale > 0 {
            obj.insert("scale".to_string(), json!(scale));
        }
    }
}

fn named_header(
    type_name: &str,
    name: &str,
    namespace: Option<&str>,
    doc: Option<&str>,
    aliases: &[String],
) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(type_name));
    obj.insert("name".to_string(), json!(name));

    if let Some(ns) = namespace {
        obj.insert("namespace".to_string(), json!(ns));
    }
    if let Some(doc) = doc {
        obj.insert("doc".to_string(), json!(doc));
    }
    if !aliases.is_empty() {
        obj.insert("aliases".to_string(), json!(aliases));
    }
    obj
}

fn enum_to_json(e: &EnumSchema) -> Value {
    let mut obj = named_header(
        "enum",
        &e.name,
        e.namespace.as_deref(),
        e.doc.as_deref(),
        &e.aliases,
    );
    obj.insert("symbols".to_string(), json!(&e.symbols));
    if let Some(default) = &e.default {
        obj.insert("default".to_string(), json!(default));
    }
    Value::Object(obj)
}

fn fixed_to_json(f: &FixedSchema) -> Value {
    let mut obj = named_header(
        "fixed",
        &f.name,
        f.namespace.as_deref(),
        f.doc.as_deref(),
        &f.aliases,
    );
    obj.insert("size".to_string(), json!(f.size));
    if let Some(logical_type) = &f.logical_type {
        insert_logical_type(&mut obj, logical_type);
    }
    Value::Object(obj)
}
