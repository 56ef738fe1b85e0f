//! Consistency validation.
//!
//! The validator checks a candidate definition against the registry it is
//! about to enter. It runs synchronously before every add and patch commit,
//! so a rejected candidate never becomes visible.
//!
//! Checks, in order:
//! - definition shape (names, duplicate attributes, enum ordinals and default)
//! - patch monotonicity (status, attributes, end cardinality, multiLink, enum elements)
//! - acyclicity of the superType + classification-attachment graph
//! - reference resolvability (existing, right category, not deprecated when first referenced)
//! - replacement targets of every deprecated attribute, and inherited-attribute clashes

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{ReferenceKind, TypeDef, TypeDefCategory, TypeName};
use crate::registry::TypeRegistry;

/// Whether the candidate is a new definition or a patched one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Patch,
}

/// Validates candidate definitions against a registry.
pub struct ConsistencyValidator<'a> {
    registry: &'a TypeRegistry,
    mode: Mode,
}

impl<'a> ConsistencyValidator<'a> {
    /// Create a validator over the given registry.
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            mode: Mode::Create,
        }
    }

    /// Validate a definition that is about to be added.
    pub fn validate_new(mut self, def: &TypeDef) -> Result<()> {
        self.mode = Mode::Create;

        if def.guid().is_nil() {
            return Err(Error::invalid_definition(def.name(), "guid must not be nil"));
        }
        self.check_shape(def)?;
        self.check_acyclic(def)?;
        self.check_references(def, None)?;
        self.check_attribute_deprecations(def)?;
        self.check_inherited_clashes(def)?;
        Ok(())
    }

    /// Validate the patched form `after` of the registered definition `before`.
    pub fn validate_patch(mut self, before: &TypeDef, after: &TypeDef) -> Result<()> {
        self.mode = Mode::Patch;

        let name = before.name();
        if after.guid() != before.guid()
            || after.name() != before.name()
            || after.category() != before.category()
        {
            return Err(Error::invalid_patch(
                name,
                "guid, name and category are permanent",
            ));
        }

        self.check_shape(after)?;
        Self::check_monotonic(before, after)?;
        self.check_acyclic(after)?;
        self.check_references(after, Some(before))?;
        self.check_attribute_deprecations(after)?;
        self.check_inherited_clashes(after)?;
        Ok(())
    }

    fn shape_error(&self, name: &TypeName, reason: impl Into<String>) -> Error {
        match self.mode {
            Mode::Create => Error::invalid_definition(name, reason),
            Mode::Patch => Error::invalid_patch(name, reason),
        }
    }

    fn check_shape(&self, def: &TypeDef) -> Result<()> {
        let name = def.name();
        if name.as_str().trim().is_empty() {
            return Err(self.shape_error(name, "name must not be empty"));
        }

        let mut seen = HashSet::new();
        for attribute in def.attributes() {
            if attribute.name.trim().is_empty() {
                return Err(self.shape_error(name, "attribute name must not be empty"));
            }
            if !seen.insert(attribute.name.as_str()) {
                return Err(self.shape_error(
                    name,
                    format!("attribute '{}' declared twice", attribute.name),
                ));
            }
        }

        match def {
            TypeDef::RelationshipDef(rel) => {
                for (label, end) in [("end1", &rel.end1), ("end2", &rel.end2)] {
                    if end.attribute_name.trim().is_empty() {
                        return Err(
                            self.shape_error(name, format!("{} attribute name is empty", label))
                        );
                    }
                }
                if rel.end1.entity_type == rel.end2.entity_type
                    && rel.end1.attribute_name == rel.end2.attribute_name
                {
                    return Err(self.shape_error(
                        name,
                        format!(
                            "both ends of a self-relationship use attribute name '{}'",
                            rel.end1.attribute_name
                        ),
                    ));
                }
            }
            TypeDef::EnumDef(e) => {
                let mut ordinals = HashSet::new();
                let mut values = HashSet::new();
                for element in &e.elements {
                    if !ordinals.insert(element.ordinal) {
                        return Err(self.shape_error(
                            name,
                            format!("ordinal {} used twice", element.ordinal),
                        ));
                    }
                    if !values.insert(element.value.as_str()) {
                        return Err(self.shape_error(
                            name,
                            format!("value '{}' used twice", element.value),
                        ));
                    }
                }
                if let Some(default) = e.default_value {
                    if !ordinals.contains(&default) {
                        return Err(self.shape_error(
                            name,
                            format!("default value {} is not an element ordinal", default),
                        ));
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn check_monotonic(before: &TypeDef, after: &TypeDef) -> Result<()> {
        let name = before.name();
        let (from, to) = (before.header().status, after.header().status);
        if !from.can_transition_to(to) {
            return Err(Error::invalid_patch(
                name,
                format!("status cannot move from {} to {}", from, to),
            ));
        }

        for old in before.attributes() {
            let Some(new) = after.attributes().iter().find(|a| a.name == old.name) else {
                return Err(Error::invalid_patch(
                    name,
                    format!("attribute '{}' cannot be removed", old.name),
                ));
            };
            if new.data_type != old.data_type {
                return Err(Error::invalid_patch(
                    name,
                    format!(
                        "attribute '{}' type cannot change from {} to {}",
                        old.name, old.data_type, new.data_type
                    ),
                ));
            }
            if !old.status.can_transition_to(new.status) {
                return Err(Error::invalid_patch(
                    name,
                    format!("attribute '{}' cannot be reactivated", old.name),
                ));
            }
        }

        match (before, after) {
            (TypeDef::RelationshipDef(b), TypeDef::RelationshipDef(a)) => {
                for (label, old, new) in [("end1", &b.end1, &a.end1), ("end2", &b.end2, &a.end2)] {
                    if !old.cardinality.allows_transition_to(new.cardinality) {
                        return Err(Error::invalid_patch(
                            name,
                            format!(
                                "{} cardinality cannot tighten from {} to {}",
                                label, old.cardinality, new.cardinality
                            ),
                        ));
                    }
                }
                if b.multi_link && !a.multi_link {
                    return Err(Error::invalid_patch(
                        name,
                        "multiLink cannot be switched off",
                    ));
                }
            }
            (TypeDef::EnumDef(b), TypeDef::EnumDef(a)) => {
                for old in &b.elements {
                    match a.element(old.ordinal) {
                        None => {
                            return Err(Error::invalid_patch(
                                name,
                                format!("element {} ('{}') cannot be removed", old.ordinal, old.value),
                            ))
                        }
                        Some(new) if new.value != old.value => {
                            return Err(Error::invalid_patch(
                                name,
                                format!(
                                    "element {} cannot be renamed from '{}' to '{}'",
                                    old.ordinal, old.value, new.value
                                ),
                            ))
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Walk the superType + classification-attachment graph from `candidate`
    /// and fail if the walk returns to it.
    fn check_acyclic(&self, candidate: &TypeDef) -> Result<()> {
        let start = candidate.name();
        let max_depth = self.registry.len() + 1;
        let mut visited: HashSet<&TypeName> = HashSet::new();
        let mut stack: Vec<(&TypeName, Vec<&TypeName>)> = candidate
            .hierarchy_edges()
            .into_iter()
            .map(|next| (next, vec![start, next]))
            .collect();

        while let Some((node, path)) = stack.pop() {
            if node == start {
                return Err(Error::Cycle {
                    name: start.clone(),
                    path: path.into_iter().cloned().collect(),
                });
            }
            if path.len() > max_depth + 1 {
                return Err(Error::Cycle {
                    name: start.clone(),
                    path: path.into_iter().cloned().collect(),
                });
            }
            if !visited.insert(node) {
                continue;
            }
            // Unresolvable names are reported by the reference check.
            let Some(def) = self.registry.get(node.as_str()) else {
                continue;
            };
            for next in def.hierarchy_edges() {
                let mut next_path = path.clone();
                next_path.push(next);
                stack.push((next, next_path));
            }
        }

        Ok(())
    }

    /// Every reference must name an existing definition of the right
    /// category. A reference newly introduced by this mutation must also
    /// name a definition that is not deprecated.
    fn check_references(&self, def: &TypeDef, before: Option<&TypeDef>) -> Result<()> {
        let from = def.name();
        let previous: Vec<(ReferenceKind, &TypeName)> =
            before.map(TypeDef::references).unwrap_or_default();

        for (kind, target) in def.references() {
            let expected = kind.expected_category(def.category());
            let Some(referenced) = self.registry.get(target.as_str()) else {
                return Err(Error::dangling(
                    from,
                    target,
                    format!("{} has not been added yet", kind),
                ));
            };
            if referenced.category() != expected {
                return Err(Error::dangling(
                    from,
                    target,
                    format!(
                        "{} must be a {}, found a {}",
                        kind,
                        expected,
                        referenced.category()
                    ),
                ));
            }
            let newly_referenced = !previous.iter().any(|(k, t)| *k == kind && *t == target);
            if newly_referenced && referenced.is_deprecated() {
                return Err(Error::dangling(
                    from,
                    target,
                    format!("{} is deprecated", kind),
                ));
            }
        }

        Ok(())
    }

    /// Every deprecated attribute must name another attribute declared on
    /// the same definition that is active in the candidate. Inherited
    /// attributes do not count. Deprecating a replacement target therefore
    /// requires re-pointing its dependents in the same mutation.
    fn check_attribute_deprecations(&self, def: &TypeDef) -> Result<()> {
        let name = def.name();
        let attributes = def.attributes();

        for attribute in attributes.iter().filter(|a| !a.is_active()) {
            let Some(replacement) = attribute.replaced_by_attribute.as_deref() else {
                return Err(self.shape_error(
                    name,
                    format!(
                        "deprecated attribute '{}' has no replacedByAttribute",
                        attribute.name
                    ),
                ));
            };
            let valid = replacement != attribute.name
                && attributes
                    .iter()
                    .any(|a| a.name == replacement && a.is_active());
            if !valid {
                return Err(self.shape_error(
                    name,
                    format!(
                        "attribute '{}' is replaced by '{}', which is not an active attribute of this type",
                        attribute.name, replacement
                    ),
                ));
            }
        }

        Ok(())
    }

    /// An attribute name may appear only once along a superType chain.
    fn check_inherited_clashes(&self, def: &TypeDef) -> Result<()> {
        let name = def.name();
        if !matches!(
            def.category(),
            TypeDefCategory::EntityDef | TypeDefCategory::ClassificationDef
        ) {
            return Ok(());
        }

        let own: HashSet<&str> = def.attributes().iter().map(|a| a.name.as_str()).collect();

        // Upward: ancestors of the candidate.
        let mut lineage: HashSet<&str> = own.clone();
        let mut current = def.super_type();
        let mut depth = 0;
        while let Some(parent_name) = current {
            if parent_name == name || depth > self.registry.len() {
                break;
            }
            let Some(parent) = self.registry.get(parent_name.as_str()) else {
                break;
            };
            for attribute in parent.attributes() {
                if own.contains(attribute.name.as_str()) {
                    return Err(self.shape_error(
                        name,
                        format!(
                            "attribute '{}' is already inherited from '{}'",
                            attribute.name, parent_name
                        ),
                    ));
                }
                lineage.insert(attribute.name.as_str());
            }
            current = parent.super_type();
            depth += 1;
        }

        // Downward: registered subtypes must not redeclare anything the
        // candidate now contributes to their lineage.
        for subtype in self.registry.subtypes_of(name.as_str()) {
            for attribute in subtype.attributes() {
                if lineage.contains(attribute.name.as_str()) {
                    return Err(self.shape_error(
                        name,
                        format!(
                            "attribute '{}' clashes with the same attribute on subtype '{}'",
                            attribute.name,
                            subtype.name()
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}
