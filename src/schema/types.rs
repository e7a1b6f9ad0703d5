//! Avro schema types and representations.
//!
//! Schemas parsed within one session live in that session's arena and refer
//! to each other through [`SchemaRef`] slots holding a [`SchemaId`]. A slot
//! can stay [`SchemaRef::Pending`] while the referenced named type has not
//! been defined yet; the end-of-document resolution pass patches it.

use serde_json::Value;

use crate::schema::location::TextLocation;

/// Index of a schema within its parse session.
///
/// Ids are assigned in definition order and are only meaningful for the
/// session (or [`ParsedSchema`](crate::schema::ParsedSchema)) that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
    /// Position of the schema in the defined-schema list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A slot in the schema graph that holds another schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRef {
    /// Points at a schema defined in the same session.
    Resolved(SchemaId),
    /// Symbolic reference to a named type that was not yet defined when the
    /// reference was read.
    Pending {
        full_name: String,
        location: TextLocation,
    },
}

impl SchemaRef {
    pub fn id(&self) -> Option<SchemaId> {
        match self {
            SchemaRef::Resolved(id) => Some(*id),
            SchemaRef::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SchemaRef::Pending { .. })
    }
}

/// Where a [`SchemaRef`] sits inside its owning schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotPosition {
    /// Type of the record field at this index.
    Field(usize),
    /// Item type of an array.
    Items,
    /// Value type of a map.
    Values,
    /// Union branch at this index.
    Branch(usize),
}

/// Represents an Avro schema.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroSchema {
    // Primitive types
    /// Null type - no value.
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 floating-point.
    Float,
    /// 64-bit IEEE 754 floating-point.
    Double,
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,

    // Complex types
    /// Record type with named fields.
    Record(RecordSchema),
    /// Enumeration type.
    Enum(EnumSchema),
    /// Array of items with a single schema.
    Array(SchemaRef),
    /// Map with string keys and values of a single schema.
    Map(SchemaRef),
    /// Union of multiple schemas.
    Union(Vec<SchemaRef>),
    /// Fixed-size byte array.
    Fixed(FixedSchema),

    /// Logical type annotation on a primitive base. Fixed types carry
    /// theirs in [`FixedSchema::logical_type`].
    Logical(LogicalType),
}

/// Join a namespace and a simple name into a full name.
pub fn full_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{}.{}", ns, name),
        _ => name.to_string(),
    }
}

/// Schema for a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// The simple name of the record.
    pub name: String,
    /// Namespace, `None` for the default namespace.
    pub namespace: Option<String>,
    /// The fields of the record.
    pub fields: Vec<FieldSchema>,
    /// Optional documentation.
    pub doc: Option<String>,
    /// Aliases for this record.
    pub aliases: Vec<String>,
    /// Declared with `"type": "error"` rather than `"record"`.
    pub is_error: bool,
}

impl RecordSchema {
    /// Create a new RecordSchema with the given name and fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            fields,
            doc: None,
            aliases: Vec::new(),
            is_error: false,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Schema for a field within a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// The name of the field.
    pub name: String,
    /// The schema of the field's value.
    pub schema: SchemaRef,
    /// Optional default value for the field.
    pub default: Option<Value>,
    /// Optional documentation.
    pub doc: Option<String>,
    /// Field ordering (ascending, descending, ignore).
    pub order: FieldOrder,
    /// Aliases for this field.
    pub aliases: Vec<String>,
    /// Where the field object starts.
    pub location: TextLocation,
}

impl FieldSchema {
    /// Create a new FieldSchema with the given name and schema.
    pub fn new(name: impl Into<String>, schema: SchemaRef, location: TextLocation) -> Self {
        Self {
            name: name.into(),
            schema,
            default: None,
            doc: None,
            order: FieldOrder::Ascending,
            aliases: Vec::new(),
            location,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Field ordering for record comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    #[default]
    Ascending,
    Descending,
    Ignore,
}

impl FieldOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldOrder::Ascending => "ascending",
            FieldOrder::Descending => "descending",
            FieldOrder::Ignore => "ignore",
        }
    }
}

/// Schema for an enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// The simple name of the enum.
    pub name: String,
    /// Namespace, `None` for the default namespace.
    pub namespace: Option<String>,
    /// The symbols (variants) of the enum.
    pub symbols: Vec<String>,
    /// Optional documentation.
    pub doc: Option<String>,
    /// Aliases for this enum.
    pub aliases: Vec<String>,
    /// Default symbol (for schema resolution).
    pub default: Option<String>,
}

impl EnumSchema {
    /// Create a new EnumSchema with the given name and symbols.
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            symbols,
            doc: None,
            aliases: Vec::new(),
            default: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }

    /// Get the index of a symbol.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// Schema for a fixed-size byte array.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    /// The simple name of the fixed type.
    pub name: String,
    /// Namespace, `None` for the default namespace.
    pub namespace: Option<String>,
    /// The size in bytes.
    pub size: usize,
    /// Optional documentation.
    pub doc: Option<String>,
    /// Aliases for this fixed type.
    pub aliases: Vec<String>,
    /// Logical type carried by the fixed itself, so references to its name
    /// keep the annotation.
    pub logical_type: Option<LogicalTypeName>,
}

impl FixedSchema {
    /// Create a new FixedSchema with the given name and size.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            size,
            doc: None,
            aliases: Vec::new(),
            logical_type: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Annotate with a logical type.
    pub fn with_logical_type(mut self, logical_type: LogicalTypeName) -> Self {
        self.logical_type = Some(logical_type);
        self
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        full_name(self.namespace.as_deref(), &self.name)
    }
}

/// Logical type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalType {
    /// The underlying schema, defined in the same session.
    pub base: SchemaId,
    /// The logical type name and parameters.
    pub logical_type: LogicalTypeName,
}

impl LogicalType {
    pub fn new(base: SchemaId, logical_type: LogicalTypeName) -> Self {
        Self { base, logical_type }
    }
}

/// Logical type names with their parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalTypeName {
    /// Decimal with precision and scale.
    Decimal { precision: u32, scale: u32 },
    /// UUID (typically stored as string or fixed[16]).
    Uuid,
    /// Date (days since Unix epoch).
    Date,
    /// Time in milliseconds.
    TimeMillis,
    /// Time in microseconds.
    TimeMicros,
    /// Timestamp in milliseconds since Unix epoch.
    TimestampMillis,
    /// Timestamp in microseconds since Unix epoch.
    TimestampMicros,
    /// Timestamp in nanoseconds since Unix epoch.
    TimestampNanos,
    /// Local timestamp in milliseconds (no timezone).
    LocalTimestampMillis,
    /// Local timestamp in microseconds (no timezone).
    LocalTimestampMicros,
    /// Local timestamp in nanoseconds (no timezone).
    LocalTimestampNanos,
    /// Duration (months, days, milliseconds).
    Duration,
}

impl LogicalTypeName {
    /// Get the string name of the logical type.
    pub fn name(&self) -> &'static str {
        match self {
            LogicalTypeName::Decimal { .. } => "decimal",
            LogicalTypeName::Uuid => "uuid",
            LogicalTypeName::Date => "date",
            LogicalTypeName::TimeMillis => "time-millis",
            LogicalTypeName::TimeMicros => "time-micros",
            LogicalTypeName::TimestampMillis => "timestamp-millis",
            LogicalTypeName::TimestampMicros => "timestamp-micros",
            LogicalTypeName::TimestampNanos => "timestamp-nanos",
            LogicalTypeName::LocalTimestampMillis => "local-timestamp-millis",
            LogicalTypeName::LocalTimestampMicros => "local-timestamp-micros",
            LogicalTypeName::LocalTimestampNanos => "local-timestamp-nanos",
            LogicalTypeName::Duration => "duration",
        }
    }
}

impl AvroSchema {
    /// Map a primitive type name to its schema.
    pub fn primitive(name: &str) -> Option<AvroSchema> {
        match name {
            "null" => Some(AvroSchema::Null),
            "boolean" => Some(AvroSchema::Boolean),
            "int" => Some(AvroSchema::Int),
            "long" => Some(AvroSchema::Long),
            "float" => Some(AvroSchema::Float),
            "double" => Some(AvroSchema::Double),
            "bytes" => Some(AvroSchema::Bytes),
            "string" => Some(AvroSchema::String),
            _ => None,
        }
    }

    /// Check if this schema is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            AvroSchema::Null
                | AvroSchema::Boolean
                | AvroSchema::Int
                | AvroSchema::Long
                | AvroSchema::Float
                | AvroSchema::Double
                | AvroSchema::Bytes
                | AvroSchema::String
        )
    }

    /// Check if this schema is a named type (record, enum, or fixed).
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            AvroSchema::Record(_) | AvroSchema::Enum(_) | AvroSchema::Fixed(_)
        )
    }

    /// Get the simple name of a named type, if applicable.
    pub fn name(&self) -> Option<&str> {
        match self {
            AvroSchema::Record(r) => Some(&r.name),
            AvroSchema::Enum(e) => Some(&e.name),
            AvroSchema::Fixed(f) => Some(&f.name),
            _ => None,
        }
    }

    /// Get the fully qualified name of a named type, if applicable.
    pub fn fullname(&self) -> Option<String> {
        match self {
            AvroSchema::Record(r) => Some(r.fullname()),
            AvroSchema::Enum(e) => Some(e.fullname()),
            AvroSchema::Fixed(f) => Some(f.fullname()),
            _ => None,
        }
    }

    /// The AVSC type keyword of this schema.
    pub fn type_name(&self) -> &'static str {
        match self {
            AvroSchema::Null => "null",
            AvroSchema::Boolean => "boolean",
            AvroSchema::Int => "int",
            AvroSchema::Long => "long",
            AvroSchema::Float => "float",
            AvroSchema::Double => "double",
            AvroSchema::Bytes => "bytes",
            AvroSchema::String => "string",
            AvroSchema::Record(r) if r.is_error => "error",
            AvroSchema::Record(_) => "record",
            AvroSchema::Enum(_) => "enum",
            AvroSchema::Array(_) => "array",
            AvroSchema::Map(_) => "map",
            AvroSchema::Union(_) => "union",
            AvroSchema::Fixed(_) => "fixed",
            AvroSchema::Logical(_) => "logical",
        }
    }

    /// Every schema slot this schema owns, in document order.
    pub fn slots(&self) -> Vec<(SlotPosition, &SchemaRef)> {
        match self {
            AvroSchema::Record(r) => r
                .fields
                .iter()
                .enumerate()
                .map(|(i, f)| (SlotPosition::Field(i), &f.schema))
                .collect(),
            AvroSchema::Array(items) => vec![(SlotPosition::Items, items)],
            AvroSchema::Map(values) => vec![(SlotPosition::Values, values)],
            AvroSchema::Union(branches) => branches
                .iter()
                .enumerate()
                .map(|(i, b)| (SlotPosition::Branch(i), b))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Mutable access to the slot at `position`, if this schema has it.
    pub fn slot_mut(&mut self, position: SlotPosition) -> Option<&mut SchemaRef> {
        match (self, position) {
            (AvroSchema::Record(r), SlotPosition::Field(i)) => {
                r.fields.get_mut(i).map(|f| &mut f.schema)
            }
            (AvroSchema::Array(items), SlotPosition::Items) => Some(items),
            (AvroSchema::Map(values), SlotPosition::Values) => Some(values),
            (AvroSchema::Union(branches), SlotPosition::Branch(i)) => branches.get_mut(i),
            _ => None,
        }
    }
}
