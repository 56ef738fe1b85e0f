//! The tagged union over the four type definition categories.

use super::attribute::TypeDefAttribute;
use super::classification::ClassificationDef;
use super::entity::EntityDef;
use super::enumeration::EnumDef;
use super::header::TypeDefHeader;
use super::relationship::RelationshipDef;
use super::types::{Guid, TypeDefCategory, TypeName};
use serde::{Deserialize, Serialize};

/// Role a name reference plays inside a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// The `superType` of an entity or classification.
    SuperType,
    /// The entity type of relationship end 1.
    End1,
    /// The entity type of relationship end 2.
    End2,
    /// A member of a classification's `validEntityDefs`.
    ValidEntityDef,
    /// The EnumDef behind an enum-typed attribute.
    AttributeEnum,
}

impl ReferenceKind {
    /// The category the referenced definition must belong to, given the
    /// category of the referring definition.
    pub fn expected_category(&self, referrer: TypeDefCategory) -> TypeDefCategory {
        match self {
            ReferenceKind::SuperType => referrer,
            ReferenceKind::End1 | ReferenceKind::End2 | ReferenceKind::ValidEntityDef => {
                TypeDefCategory::EntityDef
            }
            ReferenceKind::AttributeEnum => TypeDefCategory::EnumDef,
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::SuperType => write!(f, "superType"),
            ReferenceKind::End1 => write!(f, "end1"),
            ReferenceKind::End2 => write!(f, "end2"),
            ReferenceKind::ValidEntityDef => write!(f, "validEntityDefs"),
            ReferenceKind::AttributeEnum => write!(f, "attribute type"),
        }
    }
}

/// A type definition of any category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDef {
    /// An entity definition.
    EntityDef(EntityDef),
    /// A relationship definition.
    RelationshipDef(RelationshipDef),
    /// A classification definition.
    ClassificationDef(ClassificationDef),
    /// An enumeration definition.
    EnumDef(EnumDef),
}

impl TypeDef {
    /// Identity and provenance fields.
    pub fn header(&self) -> &TypeDefHeader {
        match self {
            TypeDef::EntityDef(d) => &d.header,
            TypeDef::RelationshipDef(d) => &d.header,
            TypeDef::ClassificationDef(d) => &d.header,
            TypeDef::EnumDef(d) => &d.header,
        }
    }

    /// Mutable identity and provenance fields.
    pub fn header_mut(&mut self) -> &mut TypeDefHeader {
        match self {
            TypeDef::EntityDef(d) => &mut d.header,
            TypeDef::RelationshipDef(d) => &mut d.header,
            TypeDef::ClassificationDef(d) => &mut d.header,
            TypeDef::EnumDef(d) => &mut d.header,
        }
    }

    /// The definition's category.
    pub fn category(&self) -> TypeDefCategory {
        match self {
            TypeDef::EntityDef(_) => TypeDefCategory::EntityDef,
            TypeDef::RelationshipDef(_) => TypeDefCategory::RelationshipDef,
            TypeDef::ClassificationDef(_) => TypeDefCategory::ClassificationDef,
            TypeDef::EnumDef(_) => TypeDefCategory::EnumDef,
        }
    }

    /// The definition's name.
    pub fn name(&self) -> &TypeName {
        &self.header().name
    }

    /// The definition's GUID.
    pub fn guid(&self) -> Guid {
        self.header().guid
    }

    /// Check whether the definition is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.header().is_deprecated()
    }

    /// The supertype, for entities and classifications.
    pub fn super_type(&self) -> Option<&TypeName> {
        match self {
            TypeDef::EntityDef(d) => d.super_type.as_ref(),
            TypeDef::ClassificationDef(d) => d.super_type.as_ref(),
            _ => None,
        }
    }

    /// Declared attributes. Enumerations have none.
    pub fn attributes(&self) -> &[TypeDefAttribute] {
        match self {
            TypeDef::EntityDef(d) => &d.attributes,
            TypeDef::RelationshipDef(d) => &d.attributes,
            TypeDef::ClassificationDef(d) => &d.attributes,
            TypeDef::EnumDef(_) => &[],
        }
    }

    /// Mutable attribute list, for categories that carry one.
    pub fn attributes_mut(&mut self) -> Option<&mut Vec<TypeDefAttribute>> {
        match self {
            TypeDef::EntityDef(d) => Some(&mut d.attributes),
            TypeDef::RelationshipDef(d) => Some(&mut d.attributes),
            TypeDef::ClassificationDef(d) => Some(&mut d.attributes),
            TypeDef::EnumDef(_) => None,
        }
    }

    /// Every by-name reference held by this definition.
    pub fn references(&self) -> Vec<(ReferenceKind, &TypeName)> {
        let mut refs = Vec::new();
        if let Some(super_type) = self.super_type() {
            refs.push((ReferenceKind::SuperType, super_type));
        }
        match self {
            TypeDef::RelationshipDef(d) => {
                refs.push((ReferenceKind::End1, &d.end1.entity_type));
                refs.push((ReferenceKind::End2, &d.end2.entity_type));
            }
            TypeDef::ClassificationDef(d) => {
                refs.extend(
                    d.valid_entity_defs
                        .iter()
                        .map(|e| (ReferenceKind::ValidEntityDef, e)),
                );
            }
            _ => {}
        }
        refs.extend(
            self.attributes()
                .iter()
                .filter_map(|a| a.data_type.enum_reference())
                .map(|e| (ReferenceKind::AttributeEnum, e)),
        );
        refs
    }

    /// Outgoing edges in the superType + classification-attachment graph.
    pub fn hierarchy_edges(&self) -> Vec<&TypeName> {
        let mut edges: Vec<&TypeName> = self.super_type().into_iter().collect();
        if let TypeDef::ClassificationDef(d) = self {
            edges.extend(d.valid_entity_defs.iter());
        }
        edges
    }

    /// Borrow as an entity definition.
    pub fn as_entity(&self) -> Option<&EntityDef> {
        match self {
            TypeDef::EntityDef(d) => Some(d),
            _ => None,
        }
    }

    /// Borrow as a relationship definition.
    pub fn as_relationship(&self) -> Option<&RelationshipDef> {
        match self {
            TypeDef::RelationshipDef(d) => Some(d),
            _ => None,
        }
    }

    /// Borrow as a classification definition.
    pub fn as_classification(&self) -> Option<&ClassificationDef> {
        match self {
            TypeDef::ClassificationDef(d) => Some(d),
            _ => None,
        }
    }

    /// Borrow as an enumeration definition.
    pub fn as_enum(&self) -> Option<&EnumDef> {
        match self {
            TypeDef::EnumDef(d) => Some(d),
            _ => None,
        }
    }
}

impl From<EntityDef> for TypeDef {
    fn from(def: EntityDef) -> Self {
        TypeDef::EntityDef(def)
    }
}

impl From<RelationshipDef> for TypeDef {
    fn from(def: RelationshipDef) -> Self {
        TypeDef::RelationshipDef(def)
    }
}

impl From<ClassificationDef> for TypeDef {
    fn from(def: ClassificationDef) -> Self {
        TypeDef::ClassificationDef(def)
    }
}

impl From<EnumDef> for TypeDef {
    fn from(def: EnumDef) -> Self {
        TypeDef::EnumDef(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeType, Cardinality, RelationshipEndDef};

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    #[test]
    fn test_references_cover_all_kinds() {
        let classification: TypeDef = ClassificationDef::new(guid(1), "Criticality")
            .with_super_type("GovernanceClassification")
            .with_valid_entity_def("Referenceable")
            .with_attribute(TypeDefAttribute::new(
                "level",
                AttributeType::enumeration("CriticalityLevel"),
            ))
            .into();

        let refs = classification.references();
        assert_eq!(refs.len(), 3);
        assert!(refs
            .iter()
            .any(|(k, n)| *k == ReferenceKind::SuperType && *n == "GovernanceClassification"));
        assert!(refs
            .iter()
            .any(|(k, n)| *k == ReferenceKind::ValidEntityDef && *n == "Referenceable"));
        assert!(refs
            .iter()
            .any(|(k, n)| *k == ReferenceKind::AttributeEnum && *n == "CriticalityLevel"));

        assert_eq!(classification.hierarchy_edges().len(), 2);
    }

    #[test]
    fn test_relationship_references() {
        let rel: TypeDef = RelationshipDef::new(
            guid(2),
            "ProcessInput",
            RelationshipEndDef::new("Process", "consumers", Cardinality::AnyNumber),
            RelationshipEndDef::new("DataSet", "inputs", Cardinality::AnyNumber),
        )
        .into();

        let kinds: Vec<_> = rel.references().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ReferenceKind::End1, ReferenceKind::End2]);
        assert!(rel.hierarchy_edges().is_empty());
        assert_eq!(rel.category(), TypeDefCategory::RelationshipDef);
    }

    #[test]
    fn test_category_tag_on_the_wire() {
        let entity: TypeDef = EntityDef::new(guid(3), "Asset").into();
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["category"], "ENTITY_DEF");
        assert_eq!(json["name"], "Asset");
    }

    #[test]
    fn test_expected_category() {
        assert_eq!(
            ReferenceKind::SuperType.expected_category(TypeDefCategory::ClassificationDef),
            TypeDefCategory::ClassificationDef
        );
        assert_eq!(
            ReferenceKind::AttributeEnum.expected_category(TypeDefCategory::EntityDef),
            TypeDefCategory::EnumDef
        );
    }
}
