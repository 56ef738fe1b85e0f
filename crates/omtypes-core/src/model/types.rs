//! Core value types shared by every type definition.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

use crate::error::Error;

/// Permanent identity of a type definition.
///
/// Assigned once when the definition is created and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(Uuid);

impl Guid {
    /// Parse a GUID from its hyphenated string form.
    pub fn parse(value: &str) -> Result<Self, Error> {
        let uuid = Uuid::parse_str(value).map_err(|e| Error::InvalidDefinition {
            name: value.to_string(),
            reason: format!("malformed guid: {}", e),
        })?;
        Ok(Self(uuid))
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Check whether this is the all-zero GUID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Name of a type definition, used as the lookup key for every reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The four categories of type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDefCategory {
    /// Enumeration of valid values.
    EnumDef,
    /// Entity shape.
    EntityDef,
    /// Relationship between two entities.
    RelationshipDef,
    /// Classification attachable to entities.
    ClassificationDef,
}

impl TypeDefCategory {
    /// All categories in archive export order.
    pub const EXPORT_ORDER: [TypeDefCategory; 4] = [
        TypeDefCategory::EnumDef,
        TypeDefCategory::EntityDef,
        TypeDefCategory::RelationshipDef,
        TypeDefCategory::ClassificationDef,
    ];

    /// Parse a category from its wire name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().replace('-', "_").as_str() {
            "ENUM_DEF" | "ENUM" => Some(TypeDefCategory::EnumDef),
            "ENTITY_DEF" | "ENTITY" => Some(TypeDefCategory::EntityDef),
            "RELATIONSHIP_DEF" | "RELATIONSHIP" => Some(TypeDefCategory::RelationshipDef),
            "CLASSIFICATION_DEF" | "CLASSIFICATION" => Some(TypeDefCategory::ClassificationDef),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDefCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDefCategory::EnumDef => write!(f, "ENUM_DEF"),
            TypeDefCategory::EntityDef => write!(f, "ENTITY_DEF"),
            TypeDefCategory::RelationshipDef => write!(f, "RELATIONSHIP_DEF"),
            TypeDefCategory::ClassificationDef => write!(f, "CLASSIFICATION_DEF"),
        }
    }
}

/// Lifecycle status of a type definition or attribute.
///
/// `Deprecated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDefStatus {
    /// In use.
    #[default]
    Active,
    /// Retired in favour of a replacement.
    Deprecated,
}

impl TypeDefStatus {
    /// Check whether moving from `self` to `to` is a legal transition.
    pub fn can_transition_to(&self, to: TypeDefStatus) -> bool {
        !matches!((self, to), (TypeDefStatus::Deprecated, TypeDefStatus::Active))
    }
}

impl fmt::Display for TypeDefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDefStatus::Active => write!(f, "ACTIVE"),
            TypeDefStatus::Deprecated => write!(f, "DEPRECATED"),
        }
    }
}

/// Multiplicity of a relationship end.
///
/// Ordered from tightest to loosest, so a legal patch never decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    /// Zero or one instance at this end.
    AtMostOne,
    /// Any number of instances at this end.
    AnyNumber,
}

impl Cardinality {
    /// Check whether `to` is the same as or looser than `self`.
    pub fn allows_transition_to(&self, to: Cardinality) -> bool {
        to >= *self
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::AtMostOne => write!(f, "AT_MOST_ONE"),
            Cardinality::AnyNumber => write!(f, "ANY_NUMBER"),
        }
    }
}

/// Whether classifications travel across a relationship, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropagationRule {
    /// Classifications never propagate.
    #[default]
    None,
    /// From the end-1 entity to the end-2 entity.
    OneToTwo,
    /// From the end-2 entity to the end-1 entity.
    TwoToOne,
    /// In both directions.
    BothDirections,
}

/// Primitive data types usable in attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 16-bit integer.
    Short,
    /// Single byte.
    Byte,
    /// Single character.
    Char,
    /// Boolean.
    Boolean,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Arbitrary precision integer.
    BigInteger,
    /// Arbitrary precision decimal.
    BigDecimal,
    /// Timestamp.
    Date,
    /// Opaque object.
    Object,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::BigInteger => "biginteger",
            PrimitiveKind::BigDecimal => "bigdecimal",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Data type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributeType {
    /// A single primitive value.
    Primitive {
        /// The primitive kind.
        primitive: PrimitiveKind,
    },
    /// An array of primitive values.
    Array {
        /// Element kind.
        element: PrimitiveKind,
    },
    /// A map between primitive values.
    Map {
        /// Key kind.
        key: PrimitiveKind,
        /// Value kind.
        value: PrimitiveKind,
    },
    /// A value drawn from an enumeration.
    Enum {
        /// Name of the EnumDef.
        enum_def: TypeName,
    },
}

impl AttributeType {
    /// Shorthand for a primitive type.
    pub fn primitive(primitive: PrimitiveKind) -> Self {
        AttributeType::Primitive { primitive }
    }

    /// Shorthand for `string`.
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Shorthand for `array<element>`.
    pub fn array(element: PrimitiveKind) -> Self {
        AttributeType::Array { element }
    }

    /// Shorthand for `map<key,value>`.
    pub fn map(key: PrimitiveKind, value: PrimitiveKind) -> Self {
        AttributeType::Map { key, value }
    }

    /// Shorthand for an enum-typed attribute.
    pub fn enumeration(enum_def: impl Into<TypeName>) -> Self {
        AttributeType::Enum {
            enum_def: enum_def.into(),
        }
    }

    /// The EnumDef this type refers to, if any.
    pub fn enum_reference(&self) -> Option<&TypeName> {
        match self {
            AttributeType::Enum { enum_def } => Some(enum_def),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::Primitive { primitive } => write!(f, "{}", primitive),
            AttributeType::Array { element } => write!(f, "array<{}>", element),
            AttributeType::Map { key, value } => write!(f, "map<{},{}>", key, value),
            AttributeType::Enum { enum_def } => write!(f, "{}", enum_def),
        }
    }
}
