//! Patch engine.
//!
//! Merges a [`TypeDefPatch`] into a copy of the current definition. The
//! result is a candidate only; the registry commits it after the
//! consistency validator has compared it with the definition it replaces.
//!
//! # Merge semantics
//!
//! | Field | Applies to | Merge |
//! |-------|-----------|-------|
//! | `new_attributes` | entity, relationship, classification | upsert by name, new names appended |
//! | `new_elements` | enum | upsert by ordinal, new ordinals appended |
//! | `new_end1` / `new_end2` | relationship | replace the end in full |
//! | `new_super_type` | entity, classification | replace |
//! | `new_valid_entity_defs` | classification | replace (deduplicated) |
//! | `multi_link`, `propagation_rule` | relationship | replace |
//! | `propagatable` | classification | replace |
//! | `new_default_value` | enum | replace |
//! | `status`, `description`, `new_version_name` | all | replace |
//!
//! A patch may name each attribute (or ordinal) at most once.
//!
//! Every applied patch increments `version` and records `updated_by` and
//! `update_time`.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::model::{TypeDef, TypeDefPatch, TypeDefStatus, TypeName};

/// Applies patches to type definitions.
pub struct PatchEngine;

impl PatchEngine {
    /// Produce the patched form of `current`.
    ///
    /// Fails with [`Error::InvalidPatch`] when the patch targets another
    /// definition, sets a field the category does not carry, or changes the
    /// shape of a deprecated definition.
    pub fn apply(current: &TypeDef, patch: &TypeDefPatch) -> Result<TypeDef> {
        let name = current.name();

        if patch.target_type_name != *name || patch.target_guid != current.guid() {
            return Err(Error::invalid_patch(
                name,
                format!(
                    "patch was issued for '{}' ({})",
                    patch.target_type_name, patch.target_guid
                ),
            ));
        }

        if current.is_deprecated() {
            if patch.mutates_shape() {
                return Err(Error::invalid_patch(
                    name,
                    "type is deprecated; only provenance may be updated",
                ));
            }
            if patch.status == Some(TypeDefStatus::Active) {
                return Err(Error::invalid_patch(
                    name,
                    "deprecated types cannot be reactivated",
                ));
            }
        }

        Self::check_applicable(current, patch)?;

        if let Some(attributes) = &patch.new_attributes {
            if let Some(dup) = first_duplicate(attributes, |a| a.name.as_str()) {
                return Err(Error::invalid_patch(
                    name,
                    format!("attribute '{}' appears more than once in the patch", dup.name),
                ));
            }
        }
        if let Some(elements) = &patch.new_elements {
            if let Some(dup) = first_duplicate(elements, |e| e.ordinal) {
                return Err(Error::invalid_patch(
                    name,
                    format!("element ordinal {} appears more than once in the patch", dup.ordinal),
                ));
            }
        }

        let mut next = current.clone();

        if let Some(attributes) = &patch.new_attributes {
            if let Some(existing) = next.attributes_mut() {
                upsert(existing, attributes, |a| a.name.clone());
            }
        }

        match &mut next {
            TypeDef::EntityDef(def) => {
                if let Some(super_type) = &patch.new_super_type {
                    def.super_type = Some(super_type.clone());
                }
            }
            TypeDef::ClassificationDef(def) => {
                if let Some(super_type) = &patch.new_super_type {
                    def.super_type = Some(super_type.clone());
                }
                if let Some(entities) = &patch.new_valid_entity_defs {
                    def.valid_entity_defs = dedupe(entities);
                }
                if let Some(propagatable) = patch.propagatable {
                    def.propagatable = propagatable;
                }
            }
            TypeDef::RelationshipDef(def) => {
                if let Some(end) = &patch.new_end1 {
                    def.end1 = end.clone();
                }
                if let Some(end) = &patch.new_end2 {
                    def.end2 = end.clone();
                }
                if let Some(multi_link) = patch.multi_link {
                    def.multi_link = multi_link;
                }
                if let Some(rule) = patch.propagation_rule {
                    def.propagation_rule = rule;
                }
            }
            TypeDef::EnumDef(def) => {
                if let Some(elements) = &patch.new_elements {
                    upsert(&mut def.elements, elements, |e| e.ordinal);
                }
                if let Some(ordinal) = patch.new_default_value {
                    def.default_value = Some(ordinal);
                }
            }
        }

        let header = next.header_mut();
        if let Some(description) = &patch.description {
            header.description = description.clone();
        }
        if let Some(status) = patch.status {
            header.status = status;
        }
        if let Some(version_name) = &patch.new_version_name {
            header.version_name = version_name.clone();
        }
        if let Some(updated_by) = &patch.updated_by {
            header.updated_by = updated_by.clone();
        }
        if patch.update_time.is_some() {
            header.update_time = patch.update_time;
        }
        header.version += 1;

        Ok(next)
    }

    fn check_applicable(current: &TypeDef, patch: &TypeDefPatch) -> Result<()> {
        let name = current.name();
        let category = current.category();
        let reject = |field: &str| -> Result<()> {
            Err(Error::invalid_patch(
                name,
                format!("{} does not apply to a {}", field, category),
            ))
        };

        let is_entity = matches!(current, TypeDef::EntityDef(_));
        let is_relationship = matches!(current, TypeDef::RelationshipDef(_));
        let is_classification = matches!(current, TypeDef::ClassificationDef(_));
        let is_enum = matches!(current, TypeDef::EnumDef(_));

        if patch.new_super_type.is_some() && !(is_entity || is_classification) {
            return reject("newSuperType");
        }
        if patch.new_attributes.is_some() && is_enum {
            return reject("newAttributes");
        }
        if (patch.new_end1.is_some() || patch.new_end2.is_some()) && !is_relationship {
            return reject("newEnd1/newEnd2");
        }
        if (patch.multi_link.is_some() || patch.propagation_rule.is_some()) && !is_relationship {
            return reject("multiLink/propagationRule");
        }
        if (patch.new_valid_entity_defs.is_some() || patch.propagatable.is_some())
            && !is_classification
        {
            return reject("newValidEntityDefs/propagatable");
        }
        if (patch.new_elements.is_some() || patch.new_default_value.is_some()) && !is_enum {
            return reject("newElements/defaultValue");
        }
        Ok(())
    }
}

/// Replace entries whose key already exists, in place, and append the rest
/// in the order given.
fn upsert<T: Clone, K: PartialEq>(existing: &mut Vec<T>, incoming: &[T], key: impl Fn(&T) -> K) {
    for item in incoming {
        let k = key(item);
        match existing.iter().position(|e| key(e) == k) {
            Some(slot) => existing[slot] = item.clone(),
            None => existing.push(item.clone()),
        }
    }
}

/// The first entry whose key was already used by an earlier entry.
fn first_duplicate<'a, T, K: Eq + Hash>(items: &'a [T], key: impl Fn(&'a T) -> K) -> Option<&'a T> {
    let mut seen = HashSet::new();
    items.iter().find(|&item| !seen.insert(key(item)))
}

fn dedupe(names: &[TypeName]) -> Vec<TypeName> {
    let mut out: Vec<TypeName> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AttributeType, Cardinality, EntityDef, EnumDef, EnumElementDef, Guid, RelationshipDef,
        PrimitiveKind, RelationshipEndDef, TypeDefAttribute,
    };
    use chrono::{TimeZone, Utc};

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    fn data_set() -> TypeDef {
        EntityDef::new(guid(1), "DataSet")
            .with_super_type("Asset")
            .with_attribute(TypeDefAttribute::string("formula"))
            .into()
    }

    fn patch_for(def: &TypeDef) -> TypeDefPatch {
        TypeDefPatch::new(def.guid(), def.name().clone())
    }

    #[test]
    fn test_attributes_upsert_by_name() {
        let def = data_set();
        let patch = patch_for(&def)
            .with_attribute(TypeDefAttribute::string("formulaType"))
            .with_attribute(
                TypeDefAttribute::string("formula").with_description("Derivation expression"),
            );

        let patched = PatchEngine::apply(&def, &patch).unwrap();
        let names: Vec<_> = patched.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["formula", "formulaType"]);
        assert_eq!(patched.attributes()[0].description, "Derivation expression");
        assert_eq!(patched.guid(), def.guid());
    }

    #[test]
    fn test_provenance_recorded() {
        let def = data_set();
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let patch = patch_for(&def)
            .updated_by("archive-builder", when)
            .with_version_name("1.1");

        let patched = PatchEngine::apply(&def, &patch).unwrap();
        assert_eq!(patched.header().version, 2);
        assert_eq!(patched.header().version_name, "1.1");
        assert_eq!(patched.header().updated_by, "archive-builder");
        assert_eq!(patched.header().update_time, Some(when));
    }

    #[test]
    fn test_mismatched_target_rejected() {
        let def = data_set();
        let patch = TypeDefPatch::new(guid(9), "DataSet");
        assert!(matches!(
            PatchEngine::apply(&def, &patch),
            Err(Error::InvalidPatch { .. })
        ));
    }

    #[test]
    fn test_inapplicable_field_rejected() {
        let def = data_set();
        let patch = patch_for(&def).with_multi_link(true);
        let err = PatchEngine::apply(&def, &patch).unwrap_err();
        assert!(err.to_string().contains("multiLink"));
    }

    #[test]
    fn test_deprecated_accepts_only_provenance() {
        let def = data_set();
        let deprecated = PatchEngine::apply(&def, &patch_for(&def).deprecate()).unwrap();
        assert!(deprecated.is_deprecated());

        let shape = patch_for(&deprecated).with_attribute(TypeDefAttribute::string("extra"));
        assert!(matches!(
            PatchEngine::apply(&deprecated, &shape),
            Err(Error::InvalidPatch { .. })
        ));

        let reactivate = patch_for(&deprecated).with_status(TypeDefStatus::Active);
        assert!(PatchEngine::apply(&deprecated, &reactivate).is_err());

        let when = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let provenance = patch_for(&deprecated).updated_by("steward", when);
        let patched = PatchEngine::apply(&deprecated, &provenance).unwrap();
        assert_eq!(patched.header().updated_by, "steward");
        assert!(patched.is_deprecated());
    }

    #[test]
    fn test_relationship_end_replaced() {
        let def: TypeDef = RelationshipDef::new(
            guid(2),
            "AssetLocation",
            RelationshipEndDef::new("Asset", "assets", Cardinality::AtMostOne),
            RelationshipEndDef::new("Location", "location", Cardinality::AtMostOne),
        )
        .into();

        let patch = patch_for(&def)
            .with_end1(RelationshipEndDef::new(
                "Asset",
                "assets",
                Cardinality::AnyNumber,
            ))
            .with_multi_link(true);

        let patched = PatchEngine::apply(&def, &patch).unwrap();
        let rel = patched.as_relationship().unwrap();
        assert_eq!(rel.end1.cardinality, Cardinality::AnyNumber);
        assert_eq!(rel.end2.cardinality, Cardinality::AtMostOne);
        assert!(rel.multi_link);
    }

    #[test]
    fn test_enum_elements_upsert_by_ordinal() {
        let def: TypeDef = EnumDef::new(guid(3), "ContactMethodType")
            .with_element(EnumElementDef::new(0, "Email", "Contact via email."))
            .with_element(EnumElementDef::new(99, "Other", "Another usage."))
            .with_default(0)
            .into();

        let patch = patch_for(&def)
            .with_element(EnumElementDef::new(1, "Phone", "Contact via phone."))
            .with_element(EnumElementDef::new(0, "Email", "Contact via e-mail."));

        let patched = PatchEngine::apply(&def, &patch).unwrap();
        let e = patched.as_enum().unwrap();
        let ordinals: Vec<_> = e.elements.iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![0, 99, 1]);
        assert_eq!(e.elements[0].description, "Contact via e-mail.");
    }

    #[test]
    fn test_repeated_attribute_in_one_patch_rejected() {
        let def = data_set();
        let patch = patch_for(&def)
            .with_attribute(TypeDefAttribute::string("formulaType"))
            .with_attribute(TypeDefAttribute::new(
                "formulaType",
                AttributeType::primitive(PrimitiveKind::Int),
            ));

        let err = PatchEngine::apply(&def, &patch).unwrap_err();
        assert!(matches!(err, Error::InvalidPatch { .. }));
        assert!(err.to_string().contains("'formulaType' appears more than once"));
    }

    #[test]
    fn test_repeated_ordinal_in_one_patch_rejected() {
        let def: TypeDef = EnumDef::new(guid(3), "ContactMethodType")
            .with_element(EnumElementDef::new(0, "Email", "Contact via email."))
            .into();

        let patch = patch_for(&def)
            .with_element(EnumElementDef::new(1, "Phone", "Contact via phone."))
            .with_element(EnumElementDef::new(1, "Fax", "Contact via fax."));

        assert!(matches!(
            PatchEngine::apply(&def, &patch),
            Err(Error::InvalidPatch { .. })
        ));
    }

    #[test]
    fn test_enum_typed_attribute_patch() {
        let def = data_set();
        let patch = patch_for(&def).with_attribute(TypeDefAttribute::new(
            "keyPattern",
            AttributeType::enumeration("KeyPattern"),
        ));
        let patched = PatchEngine::apply(&def, &patch).unwrap();
        assert_eq!(patched.attributes().len(), 2);
    }

    #[test]
    fn test_valid_entity_defs_deduplicated() {
        let def: TypeDef = crate::model::ClassificationDef::new(guid(4), "Memento")
            .with_valid_entity_def("Referenceable")
            .into();
        let patch = patch_for(&def).with_valid_entity_defs(["Asset", "Referenceable", "Asset"]);
        let patched = PatchEngine::apply(&def, &patch).unwrap();
        assert_eq!(
            patched.as_classification().unwrap().valid_entity_defs,
            vec![TypeName::new("Asset"), TypeName::new("Referenceable")]
        );
    }
}
