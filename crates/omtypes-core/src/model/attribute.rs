//! Attribute definitions for entity, relationship and classification types.

use super::types::{AttributeType, TypeDefStatus};
use serde::{Deserialize, Serialize};

/// How many values an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeCardinality {
    /// Optional single value.
    #[default]
    AtMostOne,
    /// Mandatory single value.
    ExactlyOne,
    /// One or more values.
    AtLeastOne,
    /// Zero or more values.
    AnyNumber,
}

/// An attribute declared by a type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefAttribute {
    /// Attribute name (unique along the superType chain).
    pub name: String,
    /// Data type.
    pub data_type: AttributeType,
    /// Human readable description.
    pub description: String,
    /// Value multiplicity.
    pub cardinality: AttributeCardinality,
    /// Lifecycle status.
    pub status: TypeDefStatus,
    /// Replacement attribute when deprecated.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub replaced_by_attribute: Option<String>,
}

impl TypeDefAttribute {
    /// Create an active, optional attribute.
    pub fn new(name: impl Into<String>, data_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            cardinality: AttributeCardinality::AtMostOne,
            status: TypeDefStatus::Active,
            replaced_by_attribute: None,
        }
    }

    /// Create an active `string` attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::string())
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the cardinality.
    pub fn with_cardinality(mut self, cardinality: AttributeCardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Mark the attribute deprecated in favour of `replacement`.
    pub fn deprecated_by(mut self, replacement: impl Into<String>) -> Self {
        self.status = TypeDefStatus::Deprecated;
        self.replaced_by_attribute = Some(replacement.into());
        self
    }

    /// Check whether the attribute is active.
    pub fn is_active(&self) -> bool {
        self.status == TypeDefStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveKind;

    #[test]
    fn test_attribute_builder() {
        let attr = TypeDefAttribute::new("retries", AttributeType::primitive(PrimitiveKind::Int))
            .with_description("Number of retries")
            .with_cardinality(AttributeCardinality::ExactlyOne);

        assert_eq!(attr.name, "retries");
        assert_eq!(attr.cardinality, AttributeCardinality::ExactlyOne);
        assert!(attr.is_active());
        assert!(attr.replaced_by_attribute.is_none());
    }

    #[test]
    fn test_deprecated_attribute() {
        let attr = TypeDefAttribute::string("owner").deprecated_by("ownerName");

        assert!(!attr.is_active());
        assert_eq!(attr.replaced_by_attribute.as_deref(), Some("ownerName"));
    }
}
