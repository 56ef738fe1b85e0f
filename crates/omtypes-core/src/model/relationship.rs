//! Relationship type definitions between entity types.

use super::attribute::TypeDefAttribute;
use super::header::TypeDefHeader;
use super::types::{Cardinality, Guid, PropagationRule, TypeName};
use serde::{Deserialize, Serialize};

/// One end of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEndDef {
    /// Entity type at this end.
    pub entity_type: TypeName,
    /// Name under which the other end sees this one.
    pub attribute_name: String,
    /// Description of that attribute.
    pub attribute_description: String,
    /// Multiplicity of this end.
    pub cardinality: Cardinality,
}

impl RelationshipEndDef {
    /// Create a relationship end.
    pub fn new(
        entity_type: impl Into<TypeName>,
        attribute_name: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            attribute_name: attribute_name.into(),
            attribute_description: String::new(),
            cardinality,
        }
    }

    /// Set the attribute description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.attribute_description = description.into();
        self
    }
}

/// A relationship type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDef {
    /// Identity and provenance.
    #[serde(flatten)]
    pub header: TypeDefHeader,
    /// First end.
    pub end1: RelationshipEndDef,
    /// Second end.
    pub end2: RelationshipEndDef,
    /// Attributes carried by relationship instances.
    pub attributes: Vec<TypeDefAttribute>,
    /// Classification propagation policy.
    pub propagation_rule: PropagationRule,
    /// Whether several instances may link the same two entities.
    pub multi_link: bool,
}

impl RelationshipDef {
    /// Create a relationship definition with no propagation and single links.
    pub fn new(
        guid: Guid,
        name: impl Into<TypeName>,
        end1: RelationshipEndDef,
        end2: RelationshipEndDef,
    ) -> Self {
        Self {
            header: TypeDefHeader::new(guid, name),
            end1,
            end2,
            attributes: Vec::new(),
            propagation_rule: PropagationRule::None,
            multi_link: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.header.description = description.into();
        self
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, attribute: TypeDefAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set the propagation rule.
    pub fn with_propagation_rule(mut self, rule: PropagationRule) -> Self {
        self.propagation_rule = rule;
        self
    }

    /// Allow multiple links between the same two entities.
    pub fn multi_link(mut self) -> Self {
        self.multi_link = true;
        self
    }

    /// Both ends, in order.
    pub fn ends(&self) -> [&RelationshipEndDef; 2] {
        [&self.end1, &self.end2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_builder() {
        let guid = Guid::parse("2cd1a1ff-1f8b-4ef6-9d1e-4bd1c7a1c0a2").unwrap();
        let rel = RelationshipDef::new(
            guid,
            "AssetSchemaType",
            RelationshipEndDef::new("Asset", "describesAssets", Cardinality::AnyNumber),
            RelationshipEndDef::new("SchemaType", "schema", Cardinality::AtMostOne)
                .with_description("Structure of the asset's content."),
        )
        .with_propagation_rule(PropagationRule::OneToTwo);

        assert!(!rel.multi_link);
        assert_eq!(rel.end2.cardinality, Cardinality::AtMostOne);
        assert_eq!(rel.ends()[0].entity_type, "Asset");
        assert_eq!(rel.propagation_rule, PropagationRule::OneToTwo);
    }
}
