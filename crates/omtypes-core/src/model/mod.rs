//! Type definition model.
//!
//! Entity, relationship, classification and enumeration definitions, their
//! attributes, and the transient patch objects that mutate them.

mod attribute;
mod classification;
mod entity;
mod enumeration;
mod header;
mod patch;
mod relationship;
mod typedef;
mod types;

pub use attribute::{AttributeCardinality, TypeDefAttribute};
pub use classification::ClassificationDef;
pub use entity::EntityDef;
pub use enumeration::{EnumDef, EnumElementDef, OTHER_ORDINAL};
pub use header::TypeDefHeader;
pub use patch::TypeDefPatch;
pub use relationship::{RelationshipDef, RelationshipEndDef};
pub use typedef::{ReferenceKind, TypeDef};
pub use types::{
    AttributeType, Cardinality, Guid, PrimitiveKind, PropagationRule, TypeDefCategory,
    TypeDefStatus, TypeName,
};
