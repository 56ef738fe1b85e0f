//! Enumeration type definitions.

use super::header::TypeDefHeader;
use super::types::{Guid, TypeName};
use serde::{Deserialize, Serialize};

/// Conventional ordinal for the "other/unknown" element.
pub const OTHER_ORDINAL: i32 = 99;

/// One valid value of an enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumElementDef {
    /// Stable ordinal.
    pub ordinal: i32,
    /// Symbolic value.
    pub value: String,
    /// Human readable description.
    pub description: String,
}

impl EnumElementDef {
    /// Create an element.
    pub fn new(ordinal: i32, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ordinal,
            value: value.into(),
            description: description.into(),
        }
    }
}

/// An enumeration type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    /// Identity and provenance.
    #[serde(flatten)]
    pub header: TypeDefHeader,
    /// Elements in wire order.
    pub elements: Vec<EnumElementDef>,
    /// Ordinal of the default element.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<i32>,
}

impl EnumDef {
    /// Create an enumeration with no elements.
    pub fn new(guid: Guid, name: impl Into<TypeName>) -> Self {
        Self {
            header: TypeDefHeader::new(guid, name),
            elements: Vec::new(),
            default_value: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.header.description = description.into();
        self
    }

    /// Append an element.
    pub fn with_element(mut self, element: EnumElementDef) -> Self {
        self.elements.push(element);
        self
    }

    /// Set the default element by ordinal.
    pub fn with_default(mut self, ordinal: i32) -> Self {
        self.default_value = Some(ordinal);
        self
    }

    /// Get an element by ordinal.
    pub fn element(&self, ordinal: i32) -> Option<&EnumElementDef> {
        self.elements.iter().find(|e| e.ordinal == ordinal)
    }

    /// The default element, if set and present.
    pub fn default_element(&self) -> Option<&EnumElementDef> {
        self.default_value.and_then(|o| self.element(o))
    }
}
