//! Location-aware JSON reader.
//!
//! `serde_json::Value` does not remember where a value came from, so AVSC
//! documents are first read into a [`JsonNode`] tree that records the
//! [`TextLocation`] of every value. Token decoding (string escapes, number
//! syntax) is left to `serde_json`; this module only finds token boundaries
//! and builds the tree.

use serde_json::{Map, Number, Value};

use crate::error::SchemaError;
use crate::schema::location::{LineIndex, TextLocation};

/// Maximum JSON nesting depth accepted by the reader.
pub const MAX_JSON_DEPTH: usize = 512;

/// A JSON value together with the location of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNode {
    pub value: JsonValue,
    pub location: TextLocation,
}

/// JSON value tree whose children are [`JsonNode`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonNode>),
    /// Object members in document order. Duplicate keys are kept.
    Object(Vec<(String, JsonNode)>),
}

impl JsonNode {
    /// Look up a member of an object. The last occurrence of a duplicated key wins.
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        match &self.value {
            JsonValue::Object(members) => members
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonNode]> {
        match &self.value {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match &self.value {
            JsonValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.value, JsonValue::Object(_))
    }

    /// Short name of the JSON type, for error messages.
    pub fn kind(&self) -> &'static str {
        match self.value {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    /// Convert to a plain `serde_json::Value`, dropping locations.
    pub fn to_value(&self) -> Value {
        match &self.value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => Value::Number(n.clone()),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(|n| n.to_value()).collect()),
            JsonValue::Object(members) => {
                let mut obj = Map::new();
                for (key, node) in members {
                    obj.insert(key.clone(), node.to_value());
                }
                Value::Object(obj)
            }
        }
    }
}

/// Read a complete JSON document.
///
/// Anything other than whitespace after the top-level value is an error.
pub fn parse_document(text: &str) -> Result<JsonNode, SchemaError> {
    let mut reader = Reader {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        index: LineIndex::new(text),
    };

    let node = reader.parse_value(0)?;
    reader.skip_whitespace();
    if reader.pos < reader.bytes.len() {
        return Err(reader.error_here("trailing characters after JSON document"));
    }
    Ok(node)
}

struct Reader<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    index: LineIndex<'a>,
}

impl Reader<'_> {
    fn parse_value(&mut self, depth: usize) -> Result<JsonNode, SchemaError> {
        if depth > MAX_JSON_DEPTH {
            return Err(self.error_here(format!(
                "nesting deeper than {} levels",
                MAX_JSON_DEPTH
            )));
        }

        self.skip_whitespace();
        let location = self.index.location_of(self.pos);

        let value = match self.peek() {
            None => return Err(self.error_here("unexpected end of input")),
            Some(b'{') => self.parse_object(depth)?,
            Some(b'[') => self.parse_array(depth)?,
            Some(b'"') => JsonValue::String(self.parse_string()?),
            Some(b't') => self.parse_literal("true", JsonValue::Bool(true))?,
            Some(b'f') => self.parse_literal("false", JsonValue::Bool(false))?,
            Some(b'n') => self.parse_literal("null", JsonValue::Null)?,
            Some(b'-' | b'0'..=b'9') => JsonValue::Number(self.parse_number()?),
            Some(_) => {
                let found = self.text[self.pos..].chars().next().unwrap_or('?');
                return Err(self.error_here(format!("unexpected character '{}'", found)));
            }
        };

        Ok(JsonNode { value, location })
    }

    fn parse_object(&mut self, depth: usize) -> Result<JsonValue, SchemaError> {
        self.pos += 1;
        let mut members = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(JsonValue::Object(members));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.error_here("expected string key"));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(b':', "expected ':' after object key")?;

            let value = self.parse_value(depth + 1)?;
            members.push((key, value));

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(JsonValue::Object(members));
                }
                _ => return Err(self.error_here("expected ',' or '}'")),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<JsonValue, SchemaError> {
        self.pos += 1;
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(JsonValue::Array(items));
        }

        loop {
            items.push(self.parse_value(depth + 1)?);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(JsonValue::Array(items));
                }
                _ => return Err(self.error_here("expected ',' or ']'")),
            }
        }
    }

    /// Scan a string token and let serde_json decode its escapes.
    fn parse_string(&mut self) -> Result<String, SchemaError> {
        let start = self.pos;
        self.pos += 1;

        loop {
            match self.peek() {
                None => {
                    self.pos = start;
                    return Err(self.error_here("unterminated string"));
                }
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }

        let raw = &self.text[start..self.pos];
        serde_json::from_str::<String>(raw).map_err(|e| SchemaError::Json {
            message: format!("invalid string: {}", e),
            location: self.index.location_of(start),
        })
    }

    fn parse_number(&mut self) -> Result<Number, SchemaError> {
        let start = self.pos;
        while let Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E') = self.peek() {
            self.pos += 1;
        }

        let raw = &self.text[start..self.pos];
        serde_json::from_str::<Number>(raw).map_err(|_| SchemaError::Json {
            message: format!("invalid number '{}'", raw),
            location: self.index.location_of(start),
        })
    }

    fn parse_literal(&mut self, word: &str, value: JsonValue) -> Result<JsonValue, SchemaError> {
        if self.text[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(self.error_here(format!("expected '{}'", word)))
        }
    }

    fn expect(&mut self, byte: u8, message: &str) -> Result<(), SchemaError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error_here(message))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn error_here(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Json {
            message: message.into(),
            location: self.index.location_of(self.pos),
        }
    }
}
