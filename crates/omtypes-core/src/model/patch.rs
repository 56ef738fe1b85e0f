//! Patch requests against existing type definitions.

use super::attribute::TypeDefAttribute;
use super::enumeration::EnumElementDef;
use super::relationship::RelationshipEndDef;
use super::types::{Guid, PropagationRule, TypeDefStatus, TypeName};
use chrono::{DateTime, Utc};

/// A transient mutation request for one type definition.
///
/// Obtained from [`crate::TypeRegistry::get_patch_for_type`], populated with
/// the builder methods and consumed by [`crate::TypeRegistry::apply_patch`].
///
/// `new_attributes` and `new_elements` are merged by key into the current
/// lists: an entry whose name (or ordinal) already exists replaces that
/// entry in place, any other entry is appended. Omitted entries are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefPatch {
    /// Name of the definition to patch.
    pub target_type_name: TypeName,
    /// GUID of the definition to patch, captured when the patch was issued.
    pub target_guid: Guid,
    /// Who is making the change.
    pub updated_by: Option<String>,
    /// When the change is made.
    pub update_time: Option<DateTime<Utc>>,
    /// New release label.
    pub new_version_name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New supertype (entities and classifications).
    pub new_super_type: Option<TypeName>,
    /// Attributes to upsert.
    pub new_attributes: Option<Vec<TypeDefAttribute>>,
    /// Replacement for relationship end 1.
    pub new_end1: Option<RelationshipEndDef>,
    /// Replacement for relationship end 2.
    pub new_end2: Option<RelationshipEndDef>,
    /// Replacement set of attachable entities (classifications).
    pub new_valid_entity_defs: Option<Vec<TypeName>>,
    /// New multi-link flag (relationships).
    pub multi_link: Option<bool>,
    /// New propagation rule (relationships).
    pub propagation_rule: Option<PropagationRule>,
    /// New propagatable flag (classifications).
    pub propagatable: Option<bool>,
    /// Enum elements to upsert, keyed by ordinal.
    pub new_elements: Option<Vec<EnumElementDef>>,
    /// New default ordinal (enumerations).
    pub new_default_value: Option<i32>,
    /// New status.
    pub status: Option<TypeDefStatus>,
}

impl TypeDefPatch {
    /// Create an empty patch for the given definition identity.
    pub fn new(target_guid: Guid, target_type_name: impl Into<TypeName>) -> Self {
        Self {
            target_type_name: target_type_name.into(),
            target_guid,
            updated_by: None,
            update_time: None,
            new_version_name: None,
            description: None,
            new_super_type: None,
            new_attributes: None,
            new_end1: None,
            new_end2: None,
            new_valid_entity_defs: None,
            multi_link: None,
            propagation_rule: None,
            propagatable: None,
            new_elements: None,
            new_default_value: None,
            status: None,
        }
    }

    /// Record who made the change and when.
    pub fn updated_by(mut self, who: impl Into<String>, when: DateTime<Utc>) -> Self {
        self.updated_by = Some(who.into());
        self.update_time = Some(when);
        self
    }

    /// Set the release label.
    pub fn with_version_name(mut self, version_name: impl Into<String>) -> Self {
        self.new_version_name = Some(version_name.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the supertype.
    pub fn with_super_type(mut self, super_type: impl Into<TypeName>) -> Self {
        self.new_super_type = Some(super_type.into());
        self
    }

    /// Upsert one attribute.
    pub fn with_attribute(mut self, attribute: TypeDefAttribute) -> Self {
        self.new_attributes.get_or_insert_with(Vec::new).push(attribute);
        self
    }

    /// Upsert several attributes.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = TypeDefAttribute>) -> Self {
        self.new_attributes
            .get_or_insert_with(Vec::new)
            .extend(attributes);
        self
    }

    /// Replace relationship end 1.
    pub fn with_end1(mut self, end: RelationshipEndDef) -> Self {
        self.new_end1 = Some(end);
        self
    }

    /// Replace relationship end 2.
    pub fn with_end2(mut self, end: RelationshipEndDef) -> Self {
        self.new_end2 = Some(end);
        self
    }

    /// Replace the set of attachable entities.
    pub fn with_valid_entity_defs(
        mut self,
        entities: impl IntoIterator<Item = impl Into<TypeName>>,
    ) -> Self {
        self.new_valid_entity_defs = Some(entities.into_iter().map(Into::into).collect());
        self
    }

    /// Set the multi-link flag.
    pub fn with_multi_link(mut self, multi_link: bool) -> Self {
        self.multi_link = Some(multi_link);
        self
    }

    /// Set the propagation rule.
    pub fn with_propagation_rule(mut self, rule: PropagationRule) -> Self {
        self.propagation_rule = Some(rule);
        self
    }

    /// Set the propagatable flag.
    pub fn with_propagatable(mut self, propagatable: bool) -> Self {
        self.propagatable = Some(propagatable);
        self
    }

    /// Upsert one enum element.
    pub fn with_element(mut self, element: EnumElementDef) -> Self {
        self.new_elements.get_or_insert_with(Vec::new).push(element);
        self
    }

    /// Set the default enum ordinal.
    pub fn with_default_value(mut self, ordinal: i32) -> Self {
        self.new_default_value = Some(ordinal);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TypeDefStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Mark the definition deprecated.
    pub fn deprecate(self) -> Self {
        self.with_status(TypeDefStatus::Deprecated)
    }

    /// Check whether the patch changes the shape of the definition, as
    /// opposed to only recording provenance or the release label.
    pub fn mutates_shape(&self) -> bool {
        self.description.is_some()
            || self.new_super_type.is_some()
            || self.new_attributes.is_some()
            || self.new_end1.is_some()
            || self.new_end2.is_some()
            || self.new_valid_entity_defs.is_some()
            || self.multi_link.is_some()
            || self.propagation_rule.is_some()
            || self.propagatable.is_some()
            || self.new_elements.is_some()
            || self.new_default_value.is_some()
    }
}
