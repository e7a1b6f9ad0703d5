//! Forward-reference resolution.
//!
//! A symbolic type reference that does not match any registered named type
//! when it is read (a self reference, or a type defined later in the
//! document) is left in its slot as [`SchemaRef::Pending`]. When the owning
//! schema is defined, the slot is recorded as a [`PendingReference`]. After
//! the whole document has been walked, [`resolve_pending`] patches every
//! recorded slot with the id of the definition it names.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SchemaError;
use crate::schema::location::{Located, TextLocation};
use crate::schema::types::{AvroSchema, SchemaId, SchemaRef, SlotPosition};

/// The physical location of a slot in the schema graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaSlot {
    /// Schema that owns the slot.
    pub owner: SchemaId,
    /// Position of the slot within its owner.
    pub position: SlotPosition,
}

/// A reference waiting for the end-of-document resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReference {
    /// Full name being requested.
    pub full_name: String,
    /// Where the reference appears in the source.
    pub location: TextLocation,
    /// Slot to patch once the name resolves.
    pub slot: SchemaSlot,
}

/// Pending references held in the slots of a freshly defined schema.
pub(crate) fn pending_slots(owner: SchemaId, schema: &AvroSchema) -> Vec<PendingReference> {
    schema
        .slots()
        .into_iter()
        .filter_map(|(position, slot)| match slot {
            SchemaRef::Pending {
                full_name,
                location,
            } => Some(PendingReference {
                full_name: full_name.clone(),
                location: *location,
                slot: SchemaSlot { owner, position },
            }),
            SchemaRef::Resolved(_) => None,
        })
        .collect()
}

/// Patch every pending reference against the registry.
///
/// Nothing is patched unless every reference resolves. On failure the error
/// names the earliest (in document order) missing type together with every
/// location that requested it. On success `pending` is drained and the
/// number of patched slots is returned.
pub(crate) fn resolve_pending(
    schemas: &mut [Located<AvroSchema>],
    named: &HashMap<String, SchemaId>,
    pending: &mut Vec<PendingReference>,
) -> Result<usize, SchemaError> {
    let first_missing = pending
        .iter()
        .filter(|r| !named.contains_key(&r.full_name))
        .min_by_key(|r| r.location);

    if let Some(missing) = first_missing {
        let mut locations: Vec<TextLocation> = pending
            .iter()
            .filter(|r| r.full_name == missing.full_name)
            .map(|r| r.location)
            .collect();
        locations.sort();

        debug!(
            name = %missing.full_name,
            requests = locations.len(),
            "unresolved reference"
        );
        return Err(SchemaError::UnresolvedReference {
            name: missing.full_name.clone(),
            locations,
        });
    }

    let count = pending.len();
    for reference in pending.drain(..) {
        let target = named.get(&reference.full_name).copied();
        let slot = schemas
            .get_mut(reference.slot.owner.index())
            .and_then(|owner| owner.value_mut().slot_mut(reference.slot.position));

        match (target, slot) {
            (Some(target), Some(slot)) => *slot = SchemaRef::Resolved(target),
            _ => {
                return Err(SchemaError::invalid(
                    format!(
                        "reference to '{}' points at a slot that does not exist",
                        reference.full_name
                    ),
                    reference.location,
                ))
            }
        }
    }

    debug!(resolved = count, "resolved forward references");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{FieldSchema, RecordSchema};

    fn at(line: u64) -> TextLocation {
        TextLocation::new(line, 1, line * 10)
    }

    fn pending(name: &str, line: u64) -> SchemaRef {
        SchemaRef::Pending {
            full_name: name.to_string(),
            location: at(line),
        }
    }

    #[test]
    fn test_pending_slots_only_reports_pending() {
        let union = AvroSchema::Union(vec![SchemaRef::Resolved(SchemaId(0)), pending("a.B", 4)]);
        let refs = pending_slots(SchemaId(7), &union);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].full_name, "a.B");
        assert_eq!(
            refs[0].slot,
            SchemaSlot {
                owner: SchemaId(7),
                position: SlotPosition::Branch(1)
            }
        );
    }

    #[test]
    fn test_resolve_patches_self_reference() {
        let node = AvroSchema::Record(RecordSchema::new(
            "Node",
            vec![FieldSchema::new("next", pending("Node", 2), at(2))],
        ));
        let mut refs = pending_slots(SchemaId(0), &node);
        let mut schemas = vec![Located::new(node, at(1))];
        let named = HashMap::from([("Node".to_string(), SchemaId(0))]);

        let patched = resolve_pending(&mut schemas, &named, &mut refs).unwrap();
        assert_eq!(patched, 1);
        assert!(refs.is_empty());
        match schemas[0].value() {
            AvroSchema::Record(r) => assert_eq!(r.fields[0].schema, SchemaRef::Resolved(SchemaId(0))),
            other => panic!("Expected Record, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_name_reports_all_locations_and_patches_nothing() {
        let union = AvroSchema::Union(vec![pending("Known", 5), pending("Missing", 3)]);
        let array = AvroSchema::Array(pending("Missing", 9));
        let mut refs = pending_slots(SchemaId(0), &union);
        refs.extend(pending_slots(SchemaId(1), &array));
        let mut schemas = vec![Located::new(union, at(1)), Located::new(array, at(8))];
        let named = HashMap::from([("Known".to_string(), SchemaId(0))]);

        let err = resolve_pending(&mut schemas, &named, &mut refs).unwrap_err();
        match err {
            SchemaError::UnresolvedReference { name, locations } => {
                assert_eq!(name, "Missing");
                assert_eq!(locations, vec![at(3), at(9)]);
            }
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
        assert_eq!(refs.len(), 3);
        assert!(schemas[0].value().slots()[0].1.is_pending());
    }

    #[test]
    fn test_earliest_missing_name_is_reported() {
        let union = AvroSchema::Union(vec![pending("Later", 20), pending("Earlier", 2)]);
        let mut refs = pending_slots(SchemaId(0), &union);
        let mut schemas = vec![Located::new(union, at(1))];

        let err = resolve_pending(&mut schemas, &HashMap::new(), &mut refs).unwrap_err();
        match err {
            SchemaError::UnresolvedReference { name, .. } => assert_eq!(name, "Earlier"),
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
    }
}
