//! Registry diffing.
//!
//! Compares two registry snapshots and produces a structured list of the
//! changes between them, in the later snapshot's insertion order.

use std::collections::HashMap;

use crate::model::{
    AttributeType, Cardinality, EnumElementDef, Guid, TypeDef, TypeDefAttribute,
    TypeDefCategory, TypeDefStatus, TypeName,
};
use crate::registry::TypeRegistry;

/// Complete diff between two registry snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDiff {
    /// Changes, one entry per affected type definition.
    pub changes: Vec<TypeDefChange>,
}

/// Change to a single type definition.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefChange {
    /// Definition is new in the later snapshot.
    Added(TypeDef),
    /// Definition is missing from the later snapshot.
    Removed(TypeDef),
    /// Definition exists in both snapshots with a different body.
    Modified {
        /// Definition name.
        name: TypeName,
        /// Definition category in the later snapshot.
        category: TypeDefCategory,
        /// Version before.
        from_version: u64,
        /// Version after.
        to_version: u64,
        /// Shape changes; empty when only provenance or description moved.
        changes: Vec<ShapeChange>,
    },
}

impl TypeDefChange {
    /// Name of the affected definition.
    pub fn name(&self) -> &TypeName {
        match self {
            TypeDefChange::Added(def) | TypeDefChange::Removed(def) => def.name(),
            TypeDefChange::Modified { name, .. } => name,
        }
    }
}

/// A single structural change inside a modified definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeChange {
    /// GUID differs for the same name.
    GuidChanged { from: Guid, to: Guid },
    /// Category differs for the same name.
    CategoryChanged {
        from: TypeDefCategory,
        to: TypeDefCategory,
    },
    /// Lifecycle status moved.
    Status {
        from: TypeDefStatus,
        to: TypeDefStatus,
    },
    /// superType reference moved.
    SuperType {
        from: Option<TypeName>,
        to: Option<TypeName>,
    },
    /// Attribute-level change.
    Attribute(AttributeChange),
    /// Relationship end cardinality moved. `end` is 1 or 2.
    EndCardinality {
        end: u8,
        from: Cardinality,
        to: Cardinality,
    },
    /// Relationship end now points at another entity type.
    EndRetargeted { end: u8, from: TypeName, to: TypeName },
    /// multiLink flag moved.
    MultiLink { from: bool, to: bool },
    /// Classification attachment list moved.
    ValidEntityDefs {
        added: Vec<TypeName>,
        removed: Vec<TypeName>,
    },
    /// Enum element added.
    ElementAdded(EnumElementDef),
    /// Enum element missing.
    ElementRemoved(EnumElementDef),
    /// Enum ordinal now carries a different value.
    ElementRenamed {
        ordinal: i32,
        from: String,
        to: String,
    },
}

/// Change to a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeChange {
    /// Attribute is new.
    Added(TypeDefAttribute),
    /// Attribute disappeared from the declared shape.
    Removed(TypeDefAttribute),
    /// Attribute moved to DEPRECATED.
    Deprecated {
        name: String,
        replaced_by: Option<String>,
    },
    /// Attribute moved back to ACTIVE.
    Reactivated { name: String },
    /// Attribute data type changed.
    TypeChanged {
        name: String,
        from: AttributeType,
        to: AttributeType,
    },
}

impl TypeDiff {
    /// Compute the diff from `from` to `to`.
    pub fn compute(from: &TypeRegistry, to: &TypeRegistry) -> Self {
        let mut changes = Vec::new();

        for after in to.iter() {
            match from.get(after.name().as_str()) {
                None => changes.push(TypeDefChange::Added(after.clone())),
                Some(before) if before != after => {
                    changes.push(TypeDefChange::Modified {
                        name: after.name().clone(),
                        category: after.category(),
                        from_version: before.header().version,
                        to_version: after.header().version,
                        changes: Self::diff_def(before, after),
                    });
                }
                Some(_) => {}
            }
        }

        for before in from.iter() {
            if !to.contains(before.name().as_str()) {
                changes.push(TypeDefChange::Removed(before.clone()));
            }
        }

        TypeDiff { changes }
    }

    /// Check if there are any changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Get the total number of changed definitions.
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    fn diff_def(before: &TypeDef, after: &TypeDef) -> Vec<ShapeChange> {
        let mut changes = Vec::new();

        if before.guid() != after.guid() {
            changes.push(ShapeChange::GuidChanged {
                from: before.guid(),
                to: after.guid(),
            });
        }
        if before.category() != after.category() {
            changes.push(ShapeChange::CategoryChanged {
                from: before.category(),
                to: after.category(),
            });
            return changes;
        }

        let (from_status, to_status) = (before.header().status, after.header().status);
        if from_status != to_status {
            changes.push(ShapeChange::Status {
                from: from_status,
                to: to_status,
            });
        }

        if before.super_type() != after.super_type() {
            changes.push(ShapeChange::SuperType {
                from: before.super_type().cloned(),
                to: after.super_type().cloned(),
            });
        }

        changes.extend(
            Self::diff_attributes(before.attributes(), after.attributes())
                .into_iter()
                .map(ShapeChange::Attribute),
        );

        match (before, after) {
            (TypeDef::RelationshipDef(b), TypeDef::RelationshipDef(a)) => {
                for (end, old, new) in [(1, &b.end1, &a.end1), (2, &b.end2, &a.end2)] {
                    if old.entity_type != new.entity_type {
                        changes.push(ShapeChange::EndRetargeted {
                            end,
                            from: old.entity_type.clone(),
                            to: new.entity_type.clone(),
                        });
                    }
                    if old.cardinality != new.cardinality {
                        changes.push(ShapeChange::EndCardinality {
                            end,
                            from: old.cardinality,
                            to: new.cardinality,
                        });
                    }
                }
                if b.multi_link != a.multi_link {
                    changes.push(ShapeChange::MultiLink {
                        from: b.multi_link,
                        to: a.multi_link,
                    });
                }
            }
            (TypeDef::ClassificationDef(b), TypeDef::ClassificationDef(a)) => {
                let added: Vec<_> = a
                    .valid_entity_defs
                    .iter()
                    .filter(|n| !b.valid_entity_defs.contains(n))
                    .cloned()
                    .collect();
                let removed: Vec<_> = b
                    .valid_entity_defs
                    .iter()
                    .filter(|n| !a.valid_entity_defs.contains(n))
                    .cloned()
                    .collect();
                if !added.is_empty() || !removed.is_empty() {
                    changes.push(ShapeChange::ValidEntityDefs { added, removed });
                }
            }
            (TypeDef::EnumDef(b), TypeDef::EnumDef(a)) => {
                for new in &a.elements {
                    match b.element(new.ordinal) {
                        None => changes.push(ShapeChange::ElementAdded(new.clone())),
                        Some(old) if old.value != new.value => {
                            changes.push(ShapeChange::ElementRenamed {
                                ordinal: new.ordinal,
                                from: old.value.clone(),
                                to: new.value.clone(),
                            })
                        }
                        Some(_) => {}
                    }
                }
                for old in &b.elements {
                    if a.element(old.ordinal).is_none() {
                        changes.push(ShapeChange::ElementRemoved(old.clone()));
                    }
                }
            }
            _ => {}
        }

        changes
    }

    fn diff_attributes(from: &[TypeDefAttribute], to: &[TypeDefAttribute]) -> Vec<AttributeChange> {
        let mut changes = Vec::new();
        let from_map: HashMap<_, _> = from.iter().map(|a| (a.name.as_str(), a)).collect();
        let to_map: HashMap<_, _> = to.iter().map(|a| (a.name.as_str(), a)).collect();

        for new in to {
            let Some(old) = from_map.get(new.name.as_str()) else {
                changes.push(AttributeChange::Added(new.clone()));
                continue;
            };
            if old.data_type != new.data_type {
                changes.push(AttributeChange::TypeChanged {
                    name: new.name.clone(),
                    from: old.data_type.clone(),
                    to: new.data_type.clone(),
                });
            }
            match (old.status, new.status) {
                (TypeDefStatus::Active, TypeDefStatus::Deprecated) => {
                    changes.push(AttributeChange::Deprecated {
                        name: new.name.clone(),
                        replaced_by: new.replaced_by_attribute.clone(),
                    })
                }
                (TypeDefStatus::Deprecated, TypeDefStatus::Active) => {
                    changes.push(AttributeChange::Reactivated {
                        name: new.name.clone(),
                    })
                }
                _ => {}
            }
        }

        for old in from {
            if !to_map.contains_key(old.name.as_str()) {
                changes.push(AttributeChange::Removed(old.clone()));
            }
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityDef, EnumDef, RelationshipDef, RelationshipEndDef};

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    #[test]
    fn test_empty_diff() {
        let registry = TypeRegistry::new();
        let diff = TypeDiff::compute(&registry, &registry);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_added_and_modified() {
        let mut before = TypeRegistry::new();
        before
            .add_entity_def(EntityDef::new(guid(1), "Asset"))
            .unwrap();

        let mut after = before.clone();
        let patch = after
            .get_patch_for_type("Asset")
            .unwrap()
            .with_attribute(TypeDefAttribute::string("displayName"));
        after.apply_patch(patch).unwrap();
        after
            .add_entity_def(EntityDef::new(guid(2), "DataSet").with_super_type("Asset"))
            .unwrap();

        let diff = TypeDiff::compute(&before, &after);
        assert_eq!(diff.change_count(), 2);
        match &diff.changes[0] {
            TypeDefChange::Modified {
                name,
                from_version,
                to_version,
                changes,
                ..
            } => {
                assert_eq!(name.as_str(), "Asset");
                assert_eq!((*from_version, *to_version), (1, 2));
                assert!(matches!(
                    &changes[..],
                    [ShapeChange::Attribute(AttributeChange::Added(a))] if a.name == "displayName"
                ));
            }
            other => panic!("expected modification, got {other:?}"),
        }
        assert!(matches!(&diff.changes[1], TypeDefChange::Added(d) if d.name() == "DataSet"));
    }

    #[test]
    fn test_removed_and_tightened() {
        let mut before = TypeRegistry::new();
        before.add_entity_def(EntityDef::new(guid(1), "Asset")).unwrap();
        before
            .add_relationship_def(RelationshipDef::new(
                guid(2),
                "AssetLink",
                RelationshipEndDef::new("Asset", "from", Cardinality::AnyNumber),
                RelationshipEndDef::new("Asset", "to", Cardinality::AnyNumber),
            ))
            .unwrap();

        let mut after = TypeRegistry::new();
        after.add_entity_def(EntityDef::new(guid(1), "Asset")).unwrap();
        after
            .add_relationship_def(RelationshipDef::new(
                guid(2),
                "AssetLink",
                RelationshipEndDef::new("Asset", "from", Cardinality::AtMostOne),
                RelationshipEndDef::new("Asset", "to", Cardinality::AnyNumber),
            ))
            .unwrap();

        let diff = TypeDiff::compute(&before, &after);
        assert!(matches!(
            &diff.changes[0],
            TypeDefChange::Modified { changes, .. }
                if changes == &vec![ShapeChange::EndCardinality {
                    end: 1,
                    from: Cardinality::AnyNumber,
                    to: Cardinality::AtMostOne,
                }]
        ));

        let diff = TypeDiff::compute(&after, &TypeRegistry::new());
        assert_eq!(diff.change_count(), 2);
        assert!(diff
            .changes
            .iter()
            .all(|c| matches!(c, TypeDefChange::Removed(_))));
    }

    #[test]
    fn test_enum_element_changes() {
        let mut before = TypeRegistry::new();
        before
            .add_enum_def(
                EnumDef::new(guid(1), "OrderBy")
                    .with_element(EnumElementDef::new(0, "Name", ""))
                    .with_element(EnumElementDef::new(1, "Owner", "")),
            )
            .unwrap();
        let mut after = TypeRegistry::new();
        after
            .add_enum_def(
                EnumDef::new(guid(1), "OrderBy")
                    .with_element(EnumElementDef::new(0, "DisplayName", ""))
                    .with_element(EnumElementDef::new(99, "Other", "")),
            )
            .unwrap();

        let diff = TypeDiff::compute(&before, &after);
        let TypeDefChange::Modified { changes, .. } = &diff.changes[0] else {
            panic!("expected modification");
        };
        assert_eq!(changes.len(), 3);
        assert!(matches!(&changes[0], ShapeChange::ElementRenamed { ordinal: 0, .. }));
        assert!(matches!(&changes[1], ShapeChange::ElementAdded(e) if e.ordinal == 99));
        assert!(matches!(&changes[2], ShapeChange::ElementRemoved(e) if e.ordinal == 1));
    }
}
