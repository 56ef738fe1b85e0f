//! Classification type definitions.

use super::attribute::TypeDefAttribute;
use super::header::TypeDefHeader;
use super::types::{Guid, TypeName};
use serde::{Deserialize, Serialize};

/// A classification type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDef {
    /// Identity and provenance.
    #[serde(flatten)]
    pub header: TypeDefHeader,
    /// Classification this one specialises.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub super_type: Option<TypeName>,
    /// Declared attributes, in wire order.
    pub attributes: Vec<TypeDefAttribute>,
    /// Entities the classification may attach to.
    ///
    /// Set semantics; kept in first-declared order so exports are stable.
    pub valid_entity_defs: Vec<TypeName>,
    /// Whether the classification propagates across relationships.
    pub propagatable: bool,
}

impl ClassificationDef {
    /// Create a new, non-propagatable classification.
    pub fn new(guid: Guid, name: impl Into<TypeName>) -> Self {
        Self {
            header: TypeDefHeader::new(guid, name),
            super_type: None,
            attributes: Vec::new(),
            valid_entity_defs: Vec::new(),
            propagatable: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.header.description = description.into();
        self
    }

    /// Set the supertype.
    pub fn with_super_type(mut self, super_type: impl Into<TypeName>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, attribute: TypeDefAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Allow attachment to an entity type. Duplicates are ignored.
    pub fn with_valid_entity_def(mut self, entity: impl Into<TypeName>) -> Self {
        let entity = entity.into();
        if !self.valid_entity_defs.contains(&entity) {
            self.valid_entity_defs.push(entity);
        }
        self
    }

    /// Mark the classification as propagatable.
    pub fn propagatable(mut self) -> Self {
        self.propagatable = true;
        self
    }

    /// Get an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&TypeDefAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
