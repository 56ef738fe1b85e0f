//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use omtypes_core::{
    ArchiveHeader, AttributeType, Cardinality, ClassificationDef, EntityDef, EnumDef,
    EnumElementDef, Guid, PrimitiveKind, RelationshipDef, RelationshipEndDef, TypeDefAttribute,
    VersionChain, VersionDelta,
};

pub fn guid(n: u64) -> Guid {
    Guid::parse(&format!("00000000-0000-4000-8000-{:012x}", n)).unwrap()
}

pub fn when() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn header() -> ArchiveHeader {
    ArchiveHeader::new(
        guid(9000),
        "Test Foundation",
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .with_description("Fixture archive")
    .with_originator("Test Suite", "Test Org", "Apache-2.0")
}

/// Three releases over a small foundation model.
pub fn foundation() -> VersionChain {
    VersionChain::new()
        .with_delta(release_1_0())
        .with_delta(release_1_1())
        .with_delta(release_1_2())
}

fn release_1_0() -> VersionDelta {
    VersionDelta::new("1.0")
        .add(
            EnumDef::new(guid(1), "OrderBy")
                .with_element(EnumElementDef::new(0, "Name", "Order by name"))
                .with_element(EnumElementDef::new(1, "Owner", "Order by owner"))
                .with_element(EnumElementDef::new(99, "Other", "Another order"))
                .with_default(0),
        )
        .add(
            EntityDef::new(guid(10), "Referenceable")
                .with_attribute(TypeDefAttribute::string("qualifiedName"))
                .with_attribute(TypeDefAttribute::new(
                    "additionalProperties",
                    AttributeType::map(PrimitiveKind::String, PrimitiveKind::String),
                )),
        )
        .add(
            EntityDef::new(guid(11), "Asset")
                .with_super_type("Referenceable")
                .with_attribute(TypeDefAttribute::string("name"))
                .with_attribute(TypeDefAttribute::string("description")),
        )
        .add(EntityDef::new(guid(12), "DataSet").with_super_type("Asset"))
        .add(EntityDef::new(guid(13), "Process").with_super_type("Asset"))
        .add(EntityDef::new(guid(14), "Location").with_super_type("Referenceable"))
        .add(RelationshipDef::new(
            guid(20),
            "AssetLocation",
            RelationshipEndDef::new("Asset", "localAssets", Cardinality::AnyNumber),
            RelationshipEndDef::new("Location", "knownLocations", Cardinality::AtMostOne),
        ))
        .add(RelationshipDef::new(
            guid(21),
            "DataFlow",
            RelationshipEndDef::new("Process", "consumers", Cardinality::AnyNumber),
            RelationshipEndDef::new("DataSet", "inputs", Cardinality::AnyNumber),
        ))
        .add(
            ClassificationDef::new(guid(30), "Confidentiality")
                .with_valid_entity_def("Referenceable")
                .with_attribute(TypeDefAttribute::new(
                    "level",
                    AttributeType::primitive(PrimitiveKind::Int),
                )),
        )
        .add(
            ClassificationDef::new(guid(31), "AssetOwnership")
                .with_valid_entity_def("Asset")
                .with_attribute(TypeDefAttribute::string("owner")),
        )
}

fn release_1_1() -> VersionDelta {
    VersionDelta::new("1.1")
        .patch("DataSet", |p| {
            p.updated_by("fixture", when())
                .with_attribute(TypeDefAttribute::string("formula"))
        })
        .patch("AssetLocation", |p| {
            p.with_end2(RelationshipEndDef::new(
                "Location",
                "knownLocations",
                Cardinality::AnyNumber,
            ))
        })
        .patch("DataFlow", |p| p.with_multi_link(true))
        .add(
            EntityDef::new(guid(15), "Collection")
                .with_super_type("Referenceable")
                .with_attribute(TypeDefAttribute::new(
                    "orderBy",
                    AttributeType::enumeration("OrderBy"),
                )),
        )
}

fn release_1_2() -> VersionDelta {
    VersionDelta::new("1.2")
        .patch("Asset", |p| {
            p.with_version_name("1.2").with_attributes([
                TypeDefAttribute::string("displayName"),
                TypeDefAttribute::string("name").deprecated_by("displayName"),
            ])
        })
        .patch("AssetOwnership", |p| p.deprecate())
        .patch("DataSet", |p| {
            p.with_attribute(TypeDefAttribute::string("deployedImplementationType"))
        })
}
