//! Parse session state.
//!
//! A [`ParseContext`] holds everything accumulated while one AVSC source is
//! walked: the namespace stack, every schema defined so far, the registry of
//! named schemas by full name, the top-level schema, and references that are
//! still waiting to be resolved. It lives for exactly one parse and is then
//! either discarded or turned into a [`ParsedSchema`] by [`ParseContext::finish`].

use std::collections::HashMap;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, trace};
use url::Url;

use crate::error::{NamespaceError, SchemaError};
use crate::schema::location::{Located, TextLocation};
use crate::schema::namespace::NamespaceStack;
use crate::schema::parsed::ParsedSchema;
use crate::schema::resolution::{pending_slots, resolve_pending, PendingReference};
use crate::schema::types::{full_name, AvroSchema, SchemaId, SchemaRef};

/// State of a parse operation in progress for a single AVSC source.
#[derive(Debug)]
pub struct ParseContext {
    /// The resource being parsed (an avsc file or a raw avsc string).
    uri: Url,
    namespaces: NamespaceStack,
    /// Every schema defined (not merely referenced) so far, in definition order.
    defined: Vec<Located<AvroSchema>>,
    /// Named schemas out of `defined`, by full name.
    named: HashMap<String, SchemaId>,
    /// The outermost schema of the document.
    top_level: Option<SchemaId>,
    pending: Vec<PendingReference>,
}

impl ParseContext {
    /// Create a context for a source identified by `uri`.
    pub fn new(uri: Url) -> Self {
        debug!(uri = %uri, "new parse context");
        Self {
            uri,
            namespaces: NamespaceStack::new(),
            defined: Vec::new(),
            named: HashMap::new(),
            top_level: None,
            pending: Vec::new(),
        }
    }

    /// Create a context for a raw avsc string.
    ///
    /// The URI is `avsc://<hash>` where the hash is derived from the content,
    /// so identical strings map to the same URI.
    pub fn for_string(avsc: &str) -> Result<Self, SchemaError> {
        Ok(Self::new(string_uri(avsc)?))
    }

    /// Create a context for an avsc file. The URI is the canonical `file://`
    /// URI of `path`, which must exist.
    pub fn for_file(path: &Path) -> Result<Self, SchemaError> {
        let canonical = path.canonicalize().map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let uri = Url::from_file_path(&canonical)
            .map_err(|_| SchemaError::InvalidUri(canonical.display().to_string()))?;
        Ok(Self::new(uri))
    }

    /// The resource being parsed.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// The namespace in scope. Empty for the default namespace.
    pub fn current_namespace(&self) -> &str {
        self.namespaces.current()
    }

    /// Enter a scope with a new namespace. See [`NamespaceStack::push`].
    pub fn push_namespace(&mut self, namespace: &str) -> Result<(), NamespaceError> {
        self.namespaces.push(namespace)
    }

    /// Leave the innermost namespace scope. See [`NamespaceStack::pop`].
    pub fn pop_namespace(&mut self) -> Result<String, NamespaceError> {
        self.namespaces.pop()
    }

    /// Record a completed schema definition.
    ///
    /// Every schema, named or anonymous, is appended to the defined list.
    /// Named schemas (record, enum, fixed) are registered under their full
    /// name. Pending slots the schema holds are queued for
    /// [`resolve_references`](Self::resolve_references).
    ///
    /// # Errors
    /// - [`SchemaError::DuplicateTopLevelSchema`] if `is_top_level` is set and
    ///   a top-level schema already exists.
    /// - [`SchemaError::DuplicateSchemaName`] if a schema with the same full
    ///   name is already registered.
    ///
    /// A failed call leaves the context unchanged.
    pub fn define_schema(
        &mut self,
        schema: Located<AvroSchema>,
        is_top_level: bool,
    ) -> Result<SchemaId, SchemaError> {
        if is_top_level {
            if let Some(existing) = self.top_level {
                return Err(SchemaError::DuplicateTopLevelSchema {
                    location: schema.location(),
                    existing: self.defined[existing.index()].location(),
                });
            }
        }

        let fullname = schema.value().fullname();
        if let Some(name) = &fullname {
            if let Some(existing) = self.named.get(name) {
                let other = &self.defined[existing.index()];
                return Err(SchemaError::DuplicateSchemaName {
                    full_name: name.clone(),
                    kind: schema.value().type_name(),
                    location: schema.location(),
                    existing_kind: other.value().type_name(),
                    existing: other.location(),
                });
            }
        }

        let id = SchemaId(self.defined.len());
        self.pending.extend(pending_slots(id, schema.value()));

        match &fullname {
            Some(name) => {
                trace!(
                    name = %name,
                    id = id.index(),
                    kind = schema.value().type_name(),
                    "define named schema"
                );
                self.named.insert(name.clone(), id);
            }
            None => trace!(id = id.index(), kind = schema.value().type_name(), "define schema"),
        }

        if is_top_level {
            self.top_level = Some(id);
        }
        self.defined.push(schema);
        Ok(id)
    }

    /// Turn a symbolic type name into a slot.
    ///
    /// Names containing a dot are already full names; other names are
    /// qualified with the current namespace. The slot is resolved right away
    /// when the name is registered, otherwise it is left pending.
    pub fn reference(&self, name: &str, location: TextLocation) -> SchemaRef {
        let full = self.qualify(name);
        match self.named.get(&full) {
            Some(id) => SchemaRef::Resolved(*id),
            None => SchemaRef::Pending {
                full_name: full,
                location,
            },
        }
    }

    /// Qualify `name` against the current namespace.
    pub fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            name.to_string()
        } else {
            full_name(Some(self.current_namespace()), name)
        }
    }

    /// The top-level schema, or `None` while it has not been defined yet.
    pub fn top_level_schema(&self) -> Option<&Located<AvroSchema>> {
        self.top_level.map(|id| &self.defined[id.index()])
    }

    pub fn top_level_id(&self) -> Option<SchemaId> {
        self.top_level
    }

    pub fn schema(&self, id: SchemaId) -> Option<&Located<AvroSchema>> {
        self.defined.get(id.index())
    }

    /// Id of the named schema registered under `full_name`.
    pub fn lookup(&self, full_name: &str) -> Option<SchemaId> {
        self.named.get(full_name).copied()
    }

    pub fn named_schema(&self, full_name: &str) -> Option<&Located<AvroSchema>> {
        self.lookup(full_name).and_then(|id| self.schema(id))
    }

    pub fn defined_schemas(&self) -> &[Located<AvroSchema>] {
        &self.defined
    }

    pub fn named_schemas(&self) -> &HashMap<String, SchemaId> {
        &self.named
    }

    pub fn pending_references(&self) -> &[PendingReference] {
        &self.pending
    }

    /// True while nothing has been defined and no namespace is pushed.
    pub fn is_fresh(&self) -> bool {
        self.defined.is_empty()
            && self.pending.is_empty()
            && self.top_level.is_none()
            && self.namespaces.depth() == 0
    }

    /// Patch every pending reference with the schema it names.
    ///
    /// # Errors
    /// [`SchemaError::UnresolvedReference`] naming the first type that was
    /// never defined, with every location that requested it. Nothing is
    /// patched in that case.
    pub fn resolve_references(&mut self) -> Result<usize, SchemaError> {
        resolve_pending(&mut self.defined, &self.named, &mut self.pending)
    }

    /// Complete the session: resolve outstanding references and hand off
    /// the result.
    ///
    /// # Errors
    /// [`SchemaError::MissingTopLevelSchema`] if no top-level schema was
    /// defined, or any error from [`resolve_references`](Self::resolve_references).
    pub fn finish(mut self) -> Result<ParsedSchema, SchemaError> {
        let top_level = self.top_level.ok_or(SchemaError::MissingTopLevelSchema)?;
        self.resolve_references()?;

        debug!(
            uri = %self.uri,
            schemas = self.defined.len(),
            named = self.named.len(),
            "parse complete"
        );
        Ok(ParsedSchema::new(self.uri, self.defined, self.named, top_level))
    }
}

/// Synthetic URI for string input: `avsc://` followed by the first 16 hex
/// digits of the SHA-256 of the content. Not collision-proof.
fn string_uri(avsc: &str) -> Result<Url, SchemaError> {
    let digest = Sha256::digest(avsc.as_bytes());
    let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    let uri = format!("avsc://{}", hex);
    Url::parse(&uri).map_err(|e| SchemaError::InvalidUri(format!("{}: {}", uri, e)))
}
