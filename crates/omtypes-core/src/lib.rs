//! omtypes core - type registry, patch engine and archive exporter for the
//! open metadata type model.
//!
//! Release history is expressed as a [`VersionChain`] of [`VersionDelta`]s.
//! Replaying the chain drives a [`TypeRegistry`]: every add and patch is
//! merged by the [`PatchEngine`] and checked by the [`ConsistencyValidator`]
//! before it becomes visible. The finished registry is rendered by the
//! [`ArchiveExporter`].
//!
//! ```
//! use omtypes_core::{EntityDef, Guid, TypeDefAttribute, TypeName, VersionChain, VersionDelta};
//!
//! let referenceable = Guid::parse("a32316b8-dc8c-48c5-b12b-71c1b2a080bf").unwrap();
//! let asset = Guid::parse("896d14c2-7522-4f6c-8519-757711943fe6").unwrap();
//!
//! let chain = VersionChain::new()
//!     .with_delta(
//!         VersionDelta::new("1.0")
//!             .add(EntityDef::new(referenceable, "Referenceable"))
//!             .add(EntityDef::new(asset, "Asset").with_super_type("Referenceable")),
//!     )
//!     .with_delta(VersionDelta::new("1.1").patch("Asset", |p| {
//!         p.with_attribute(TypeDefAttribute::string("displayName"))
//!     }));
//!
//! let registry = chain.replay().unwrap();
//! assert_eq!(registry.super_type_chain("Asset").unwrap(), vec![TypeName::new("Referenceable")]);
//! ```

pub mod catalog;
pub mod chain;
pub mod error;
pub mod export;
pub mod history;
pub mod model;
pub mod patch;
pub mod registry;
pub mod validator;

pub use catalog::TypeCatalog;
pub use chain::{DeltaOp, PatchBuilder, VersionChain, VersionDelta};
pub use error::{Error, Result};
pub use export::{Archive, ArchiveExporter, ArchiveHeader, ArchiveType};
pub use history::{
    AuditFinding, ChainHistory, ChangeGrade, Compatibility, CompatibilityGrader, DeltaReport,
    DiffGrade, Snapshot, TypeDiff,
};
pub use model::{
    AttributeCardinality, AttributeType, Cardinality, ClassificationDef, EntityDef, EnumDef,
    EnumElementDef, Guid, PrimitiveKind, PropagationRule, RelationshipDef, RelationshipEndDef,
    TypeDef, TypeDefAttribute, TypeDefCategory, TypeDefHeader, TypeDefPatch, TypeDefStatus,
    TypeName, OTHER_ORDINAL,
};
pub use patch::PatchEngine;
pub use registry::TypeRegistry;
pub use validator::ConsistencyValidator;
