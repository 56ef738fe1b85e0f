//! Entity type definitions.

use super::attribute::TypeDefAttribute;
use super::header::TypeDefHeader;
use super::types::{Guid, TypeName};
use serde::{Deserialize, Serialize};

/// An entity type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDef {
    /// Identity and provenance.
    #[serde(flatten)]
    pub header: TypeDefHeader,
    /// Entity this one specialises.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub super_type: Option<TypeName>,
    /// Declared attributes, in wire order.
    pub attributes: Vec<TypeDefAttribute>,
}

impl EntityDef {
    /// Create a new entity definition with no supertype.
    pub fn new(guid: Guid, name: impl Into<TypeName>) -> Self {
        Self {
            header: TypeDefHeader::new(guid, name),
            super_type: None,
            attributes: Vec::new(),
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

    /// Append several attributes.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = TypeDefAttribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Get an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&TypeDefAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
