//! The type registry.
//!
//! An append-only arena of type definitions indexed by name and by GUID.
//! Definitions are never removed; patches replace a definition in place,
//! keeping its arena slot so insertion order (and therefore export order)
//! is stable across the whole history.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{
    ClassificationDef, EntityDef, EnumDef, Guid, RelationshipDef, TypeDef, TypeDefCategory,
    TypeDefPatch, TypeName,
};
use crate::patch::PatchEngine;
use crate::validator::ConsistencyValidator;

/// In-memory registry of type definitions.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Definitions in insertion order.
    defs: Vec<TypeDef>,
    /// Name to arena slot.
    by_name: HashMap<TypeName, usize>,
    /// GUID to arena slot.
    by_guid: HashMap<Guid, usize>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterate over all definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.defs.iter()
    }

    /// Iterate over the definitions of one category in insertion order.
    pub fn iter_category(&self, category: TypeDefCategory) -> impl Iterator<Item = &TypeDef> {
        self.defs.iter().filter(move |d| d.category() == category)
    }

    /// Check whether a name has been added.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a definition by name without raising an error.
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.by_name.get(name).map(|&slot| &self.defs[slot])
    }

    /// Look up a definition by GUID.
    pub fn get_by_guid(&self, guid: &Guid) -> Option<&TypeDef> {
        self.by_guid.get(guid).map(|&slot| &self.defs[slot])
    }

    /// Add an entity definition.
    pub fn add_entity_def(&mut self, def: EntityDef) -> Result<()> {
        self.add_type_def(def.into())
    }

    /// Add a relationship definition.
    pub fn add_relationship_def(&mut self, def: RelationshipDef) -> Result<()> {
        self.add_type_def(def.into())
    }

    /// Add a classification definition.
    pub fn add_classification_def(&mut self, def: ClassificationDef) -> Result<()> {
        self.add_type_def(def.into())
    }

    /// Add an enumeration definition.
    pub fn add_enum_def(&mut self, def: EnumDef) -> Result<()> {
        self.add_type_def(def.into())
    }

    /// Add a definition of any category.
    ///
    /// Re-adding a definition identical to the registered one is a no-op.
    /// Any other reuse of a registered GUID or name is a [`Error::Conflict`].
    pub fn add_type_def(&mut self, def: TypeDef) -> Result<()> {
        let name = def.name().clone();
        let guid = def.guid();

        if let Some(&slot) = self.by_guid.get(&guid) {
            let existing = &self.defs[slot];
            if *existing == def {
                warn!(name = %name, guid = %guid, "ignoring identical re-add");
                return Ok(());
            }
            let reason = if *existing.name() != name {
                format!(
                    "guid already registered to {} '{}'",
                    existing.category(),
                    existing.name()
                )
            } else {
                "already added with a different definition".to_string()
            };
            return Err(Error::Conflict { name, guid, reason });
        }

        if let Some(&slot) = self.by_name.get(&name) {
            let existing = &self.defs[slot];
            return Err(Error::Conflict {
                name,
                guid,
                reason: format!(
                    "name already registered as {} with guid {}",
                    existing.category(),
                    existing.guid()
                ),
            });
        }

        ConsistencyValidator::new(self).validate_new(&def)?;

        debug!(
            name = %name,
            guid = %guid,
            category = %def.category(),
            version = def.header().version,
            "added type definition"
        );

        let slot = self.defs.len();
        self.defs.push(def);
        self.by_name.insert(name, slot);
        self.by_guid.insert(guid, slot);
        Ok(())
    }

    /// Resolve a definition of any category by name.
    pub fn get_type_def_by_name(&self, name: &str) -> Result<&TypeDef> {
        self.get(name)
            .ok_or_else(|| Error::not_found(&TypeName::new(name)))
    }

    /// Resolve an entity definition by name.
    pub fn get_entity_def(&self, name: &str) -> Result<&EntityDef> {
        let def = self.get_type_def_by_name(name)?;
        def.as_entity()
            .ok_or_else(|| mismatch(def, TypeDefCategory::EntityDef))
    }

    /// Resolve a relationship definition by name.
    pub fn get_relationship_def(&self, name: &str) -> Result<&RelationshipDef> {
        let def = self.get_type_def_by_name(name)?;
        def.as_relationship()
            .ok_or_else(|| mismatch(def, TypeDefCategory::RelationshipDef))
    }

    /// Resolve a classification definition by name.
    pub fn get_classification_def(&self, name: &str) -> Result<&ClassificationDef> {
        let def = self.get_type_def_by_name(name)?;
        def.as_classification()
            .ok_or_else(|| mismatch(def, TypeDefCategory::ClassificationDef))
    }

    /// Resolve an enumeration definition by name.
    pub fn get_enum_def(&self, name: &str) -> Result<&EnumDef> {
        let def = self.get_type_def_by_name(name)?;
        def.as_enum()
            .ok_or_else(|| mismatch(def, TypeDefCategory::EnumDef))
    }

    /// Issue an empty patch seeded with the named definition's identity.
    pub fn get_patch_for_type(&self, name: &str) -> Result<TypeDefPatch> {
        let def = self.get_type_def_by_name(name)?;
        Ok(TypeDefPatch::new(def.guid(), def.name().clone()))
    }

    /// Apply a patch atomically.
    ///
    /// The patched candidate is built and validated off to the side; the
    /// registry changes only if both steps succeed.
    pub fn apply_patch(&mut self, patch: TypeDefPatch) -> Result<&TypeDef> {
        let slot = *self
            .by_name
            .get(patch.target_type_name.as_str())
            .ok_or_else(|| Error::not_found(&patch.target_type_name))?;

        let before = &self.defs[slot];
        let after = PatchEngine::apply(before, &patch)?;
        ConsistencyValidator::new(self).validate_patch(before, &after)?;

        debug!(
            name = %after.name(),
            guid = %after.guid(),
            version = after.header().version,
            status = %after.header().status,
            "applied patch"
        );

        self.defs[slot] = after;
        Ok(&self.defs[slot])
    }

    /// The superType chain of a definition, nearest ancestor first.
    pub fn super_type_chain(&self, name: &str) -> Result<Vec<TypeName>> {
        let mut chain = Vec::new();
        let mut current = self.get_type_def_by_name(name)?.super_type();
        while let Some(parent) = current {
            if chain.len() >= self.defs.len() {
                return Err(Error::Cycle {
                    name: TypeName::new(name),
                    path: chain,
                });
            }
            chain.push(parent.clone());
            current = self.get_type_def_by_name(parent.as_str())?.super_type();
        }
        Ok(chain)
    }

    /// All definitions whose superType chain passes through `name`.
    pub fn subtypes_of(&self, name: &str) -> Vec<&TypeDef> {
        self.defs
            .iter()
            .filter(|d| d.name() != name)
            .filter(|d| {
                self.super_type_chain(d.name().as_str())
                    .map(|chain| chain.iter().any(|n| n == name))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Attributes of a definition and all its ancestors, ancestors first.
    pub fn all_attributes(&self, name: &str) -> Result<Vec<&crate::model::TypeDefAttribute>> {
        let mut lineage = self.super_type_chain(name)?;
        lineage.reverse();
        let mut attributes = Vec::new();
        for ancestor in &lineage {
            attributes.extend(self.get_type_def_by_name(ancestor.as_str())?.attributes());
        }
        attributes.extend(self.get_type_def_by_name(name)?.attributes());
        Ok(attributes)
    }
}

fn mismatch(def: &TypeDef, expected: TypeDefCategory) -> Error {
    Error::CategoryMismatch {
        name: def.name().clone(),
        expected,
        actual: def.category(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, RelationshipEndDef, TypeDefAttribute, TypeDefStatus};

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    fn sample_registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .add_entity_def(EntityDef::new(guid(1), "Referenceable"))
            .unwrap();
        registry
            .add_entity_def(EntityDef::new(guid(2), "Asset").with_super_type("Referenceable"))
            .unwrap();
        registry
            .add_entity_def(
                EntityDef::new(guid(3), "DataSet")
                    .with_super_type("Asset")
                    .with_attribute(TypeDefAttribute::string("deployedImplementationType")),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_add_and_lookup() {
        let registry = sample_registry();

        assert_eq!(registry.len(), 3);
        assert!(registry.contains("Asset"));
        assert_eq!(registry.get_entity_def("Asset").unwrap().header.guid, guid(2));
        assert_eq!(
            registry.get_by_guid(&guid(3)).map(|d| d.name().as_str()),
            Some("DataSet")
        );
    }

    #[test]
    fn test_lookup_unknown_name() {
        let registry = sample_registry();
        assert!(matches!(
            registry.get_type_def_by_name("NoSuchType"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            registry.get_patch_for_type("NoSuchType"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_typed_lookup_wrong_category() {
        let registry = sample_registry();
        assert!(matches!(
            registry.get_classification_def("Asset"),
            Err(Error::CategoryMismatch {
                expected: TypeDefCategory::ClassificationDef,
                actual: TypeDefCategory::EntityDef,
                ..
            })
        ));
    }

    #[test]
    fn test_guid_conflict() {
        let mut registry = sample_registry();
        let err = registry
            .add_entity_def(EntityDef::new(guid(2), "Process"))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert!(err.to_string().contains("'Asset'"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_name_conflict_across_categories() {
        let mut registry = sample_registry();
        let err = registry
            .add_classification_def(ClassificationDef::new(guid(9), "Asset"))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[test]
    fn test_identical_readd_is_noop() {
        let mut registry = sample_registry();
        registry
            .add_entity_def(EntityDef::new(guid(1), "Referenceable"))
            .unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_super_type_chain() {
        let registry = sample_registry();
        let chain = registry.super_type_chain("DataSet").unwrap();
        assert_eq!(
            chain,
            vec![TypeName::new("Asset"), TypeName::new("Referenceable")]
        );
        assert!(registry.super_type_chain("Referenceable").unwrap().is_empty());
    }

    #[test]
    fn test_subtypes_of() {
        let registry = sample_registry();
        let names: Vec<_> = registry
            .subtypes_of("Referenceable")
            .into_iter()
            .map(|d| d.name().as_str())
            .collect();
        assert_eq!(names, vec!["Asset", "DataSet"]);
    }

    #[test]
    fn test_apply_patch_keeps_slot_and_guid() {
        let mut registry = sample_registry();
        let patch = registry
            .get_patch_for_type("Asset")
            .unwrap()
            .with_attribute(TypeDefAttribute::string("displayName"));
        registry.apply_patch(patch).unwrap();

        let asset = registry.get_entity_def("Asset").unwrap();
        assert_eq!(asset.header.guid, guid(2));
        assert_eq!(asset.header.version, 2);
        let order: Vec<_> = registry.iter().map(|d| d.name().as_str()).collect();
        assert_eq!(order, vec!["Referenceable", "Asset", "DataSet"]);
    }

    #[test]
    fn test_failed_patch_leaves_registry_untouched() {
        let mut registry = sample_registry();
        registry
            .add_entity_def(EntityDef::new(guid(4), "Location"))
            .unwrap();
        registry
            .add_relationship_def(RelationshipDef::new(
                guid(5),
                "AssetLocation",
                RelationshipEndDef::new("Asset", "assets", Cardinality::AnyNumber),
                RelationshipEndDef::new("Location", "locations", Cardinality::AnyNumber),
            ))
            .unwrap();
        let before = registry.get("AssetLocation").unwrap().clone();

        let patch = registry
            .get_patch_for_type("AssetLocation")
            .unwrap()
            .with_multi_link(true)
            .with_end1(RelationshipEndDef::new(
                "Asset",
                "assets",
                Cardinality::AtMostOne,
            ));
        assert!(matches!(
            registry.apply_patch(patch),
            Err(Error::InvalidPatch { .. })
        ));
        assert_eq!(registry.get("AssetLocation"), Some(&before));
    }

    #[test]
    fn test_all_attributes_ancestors_first() {
        let mut registry = sample_registry();
        let patch = registry
            .get_patch_for_type("Referenceable")
            .unwrap()
            .with_attribute(TypeDefAttribute::string("qualifiedName"));
        registry.apply_patch(patch).unwrap();

        let names: Vec<_> = registry
            .all_attributes("DataSet")
            .unwrap()
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["qualifiedName", "deployedImplementationType"]);
    }

    #[test]
    fn test_deprecate_then_patch_rejected() {
        let mut registry = sample_registry();
        let patch = registry.get_patch_for_type("DataSet").unwrap().deprecate();
        registry.apply_patch(patch).unwrap();
        assert_eq!(
            registry.get("DataSet").unwrap().header().status,
            TypeDefStatus::Deprecated
        );

        let patch = registry
            .get_patch_for_type("DataSet")
            .unwrap()
            .with_attribute(TypeDefAttribute::string("formula"));
        assert!(matches!(
            registry.apply_patch(patch),
            Err(Error::InvalidPatch { .. })
        ));
    }
}
