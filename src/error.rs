//! Error types for AVSC parsing

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::TextLocation;

/// Errors raised by the namespace stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    /// Push called with an empty namespace
    #[error("Invalid namespace: new namespace cannot be empty")]
    InvalidNamespace,
    /// Push called with the namespace already in scope
    #[error("Redundant namespace: '{namespace}' is already the current namespace")]
    RedundantNamespace { namespace: String },
    /// Pop called with only the default namespace left
    #[error("Namespace underflow: no pushed namespace left to pop")]
    Underflow,
}

/// Errors that can occur while parsing an AVSC document.
///
/// Every variant raised against document content carries at least one
/// [`TextLocation`] so callers can point at the offending construct.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Malformed JSON
    #[error("Invalid JSON at {location}: {message}")]
    Json {
        message: String,
        location: TextLocation,
    },

    /// Well-formed JSON that is not a valid schema
    #[error("Invalid schema at {location}: {message}")]
    InvalidSchema {
        message: String,
        location: TextLocation,
    },

    /// Unbalanced or invalid namespace scoping
    #[error("Namespace error at {location}: {source}")]
    Namespace {
        #[source]
        source: NamespaceError,
        location: TextLocation,
    },

    /// A second schema was marked as top-level
    #[error("Cannot set schema at {location} as top-level schema, already set to schema at {existing}")]
    DuplicateTopLevelSchema {
        location: TextLocation,
        existing: TextLocation,
    },

    /// Two named schemas share a full name
    #[error("{kind} '{full_name}' defined at {location} conflicts with {existing_kind} defined at {existing}")]
    DuplicateSchemaName {
        full_name: String,
        kind: &'static str,
        location: TextLocation,
        existing_kind: &'static str,
        existing: TextLocation,
    },

    /// A symbolic type reference that never matched a definition
    #[error("Unresolved reference to '{name}' at {}", format_locations(.locations))]
    UnresolvedReference {
        name: String,
        locations: Vec<TextLocation>,
    },

    /// The session ended without a top-level schema
    #[error("No top-level schema defined")]
    MissingTopLevelSchema,

    /// Reading the input file failed
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The session URI could not be derived from the input
    #[error("Invalid source URI: {0}")]
    InvalidUri(String),
}

impl SchemaError {
    /// Shorthand for [`SchemaError::InvalidSchema`].
    pub(crate) fn invalid(message: impl Into<String>, location: TextLocation) -> Self {
        SchemaError::InvalidSchema {
            message: message.into(),
            location,
        }
    }

    /// The primary location of the error, if it has one.
    pub fn location(&self) -> Option<TextLocation> {
        match self {
            SchemaError::Json { location, .. }
            | SchemaError::InvalidSchema { location, .. }
            | SchemaError::Namespace { location, .. }
            | SchemaError::DuplicateTopLevelSchema { location, .. }
            | SchemaError::DuplicateSchemaName { location, .. } => Some(*location),
            SchemaError::UnresolvedReference { locations, .. } => locations.first().copied(),
            _ => None,
        }
    }
}

fn format_locations(locations: &[TextLocation]) -> String {
    locations
        .iter()
        .map(|l| format!("({})", l))
        .collect::<Vec<_>>()
        .join(", ")
}
