//! Bundled reference release series.
//!
//! A small open metadata foundation model spread over three releases. Each
//! release is a [`VersionDelta`]; replaying them in order rebuilds the
//! catalog that `omtypes build` exports.

use chrono::{DateTime, TimeZone, Utc};
use omtypes_core::{
    AttributeCardinality, AttributeType, Cardinality, ClassificationDef, EntityDef, EnumDef,
    EnumElementDef, Guid, PrimitiveKind, PropagationRule, RelationshipDef, RelationshipEndDef,
    TypeDefAttribute, VersionChain, VersionDelta, OTHER_ORDINAL,
};

use crate::error::{Error, Result};

/// Author recorded on every patch.
pub const RELEASE_AUTHOR: &str = "omtypes";

/// The full reference chain, oldest release first.
pub fn reference_chain() -> Result<VersionChain> {
    Ok(VersionChain::new()
        .with_delta(release_1_0()?)
        .with_delta(release_1_1()?)
        .with_delta(release_1_2()?))
}

fn guid(value: &str) -> Result<Guid> {
    Ok(Guid::parse(value)?)
}

fn released(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::Config(format!("invalid release date {}-{}-{}", year, month, day)))
}

fn string(name: &str, description: &str) -> TypeDefAttribute {
    TypeDefAttribute::string(name).with_description(description)
}

fn release_1_0() -> Result<VersionDelta> {
    let key_pattern = EnumDef::new(guid("8904df8f-1aca-4de8-9abd-1ef2aadba300")?, "KeyPattern")
        .with_description("Defines the type of identifier used for an asset.")
        .with_element(EnumElementDef::new(0, "LocalKey", "Unique key allocated and used within the scope of a single system."))
        .with_element(EnumElementDef::new(1, "RecycledKey", "Key allocated and used within the scope of a single system that is periodically reused for different records."))
        .with_element(EnumElementDef::new(2, "NaturalKey", "Key derived from an attribute of the entity, such as email address, passport number."))
        .with_element(EnumElementDef::new(3, "MirrorKey", "Key value copied from another system."))
        .with_element(EnumElementDef::new(4, "AggregateKey", "Key formed by combining keys from multiple systems."))
        .with_element(EnumElementDef::new(OTHER_ORDINAL, "Other", "Another key pattern."))
        .with_default(0);

    let order_by = EnumDef::new(guid("1d412439-4272-4a7e-a940-1065f889fc56")?, "OrderBy")
        .with_description("Defines the sequencing for a collection.")
        .with_element(EnumElementDef::new(0, "Name", "Order by name property."))
        .with_element(EnumElementDef::new(1, "Owner", "Order by owner property."))
        .with_element(EnumElementDef::new(2, "DateAdded", "Order by date added to the metadata collection."))
        .with_element(EnumElementDef::new(3, "DateUpdated", "Order by date that the asset was updated."))
        .with_element(EnumElementDef::new(OTHER_ORDINAL, "Other", "Order by another property."))
        .with_default(0);

    let referenceable = EntityDef::new(guid("a32316b8-dc8c-48c5-b12b-71c1b2a080bf")?, "Referenceable")
        .with_description("An open metadata entity that has a unique identifier.")
        .with_attribute(
            string("qualifiedName", "Unique identifier for the entity.")
                .with_cardinality(AttributeCardinality::ExactlyOne),
        )
        .with_attribute(
            TypeDefAttribute::new(
                "additionalProperties",
                AttributeType::map(PrimitiveKind::String, PrimitiveKind::String),
            )
            .with_description("Additional properties for the element."),
        );

    let asset = EntityDef::new(guid("896d14c2-7522-4f6c-8519-757711943fe6")?, "Asset")
        .with_description("The description of an asset that needs to be catalogued and governed.")
        .with_super_type("Referenceable")
        .with_attributes([
            string("name", "Display name for the asset."),
            string("description", "Description of the asset."),
            string("owner", "User identifier for the person responsible for the asset."),
        ]);

    let data_set = EntityDef::new(guid("1449911c-4f44-4c22-abc0-7540154feefb")?, "DataSet")
        .with_description("A collection of related data.")
        .with_super_type("Asset");

    let process = EntityDef::new(guid("d8f33bd7-afa9-4a11-a8c7-07dcec83c050")?, "Process")
        .with_description("Well-defined sequence of activities performed by people or software components.")
        .with_super_type("Asset")
        .with_attribute(string("formula", "Function that determines the subset of the data that flows."));

    let location = EntityDef::new(guid("3e09cb2b-5f15-4fd2-b004-fe0146ad8628")?, "Location")
        .with_description("A physical or virtual location.")
        .with_super_type("Referenceable")
        .with_attributes([
            string("displayName", "Display name for the location."),
            string("description", "Description of the location."),
        ]);

    let collection = EntityDef::new(guid("347005ba-2b35-4670-b5a7-12c9ebed0cd6")?, "Collection")
        .with_description("A group of related items.")
        .with_super_type("Referenceable")
        .with_attributes([
            string("name", "Name of the collection."),
            string("description", "Description of the collection."),
        ]);

    let asset_location = RelationshipDef::new(
        guid("bc236b62-d0e6-4c5c-93a1-3a35c3dba7b1")?,
        "AssetLocation",
        RelationshipEndDef::new("Location", "knownLocations", Cardinality::AtMostOne)
            .with_description("Places where this asset is sited."),
        RelationshipEndDef::new("Asset", "localAssets", Cardinality::AnyNumber)
            .with_description("Assets sited at this location."),
    )
    .with_description("Location of an Asset.");

    let collection_membership = RelationshipDef::new(
        guid("5cabb76a-e25b-4bb5-8b93-768bbac005af")?,
        "CollectionMembership",
        RelationshipEndDef::new("Collection", "foundInCollections", Cardinality::AnyNumber)
            .with_description("Collections that link to this element."),
        RelationshipEndDef::new("Referenceable", "members", Cardinality::AnyNumber)
            .with_description("Members of this collection."),
    )
    .with_description("Identifies a member of a collection.");

    let data_flow = RelationshipDef::new(
        guid("d2490c0c-06cc-458a-add2-33cf2f5dd724")?,
        "DataFlow",
        RelationshipEndDef::new("Referenceable", "dataSupplier", Cardinality::AnyNumber)
            .with_description("Provides the data."),
        RelationshipEndDef::new("Referenceable", "dataConsumer", Cardinality::AnyNumber)
            .with_description("Uses the data."),
    )
    .with_description("A movement of data between two elements.")
    .with_attribute(string("formula", "Function that determines the subset of the data that flows."));

    let confidentiality = ClassificationDef::new(guid("742ddb7d-9a4a-4eb5-8ac2-1d69953bd2b6")?, "Confidentiality")
        .with_description("Defines the level of confidentiality of related data items.")
        .with_valid_entity_def("Referenceable")
        .with_attribute(
            TypeDefAttribute::new("level", AttributeType::primitive(PrimitiveKind::Int))
                .with_description("Level of confidentiality."),
        )
        .with_attribute(string("notes", "Information relating to the classification."));

    let asset_ownership = ClassificationDef::new(guid("d531c986-4bf3-4867-b09a-04d13a4c4a3d")?, "AssetOwnership")
        .with_description("Defines the owner of an asset.")
        .with_valid_entity_def("Asset")
        .with_attribute(string("owner", "Identifier of the owner."));

    Ok(VersionDelta::new("1.0")
        .add(key_pattern)
        .add(order_by)
        .add(referenceable)
        .add(asset)
        .add(data_set)
        .add(process)
        .add(location)
        .add(collection)
        .add(asset_location)
        .add(collection_membership)
        .add(data_flow)
        .add(confidentiality)
        .add(asset_ownership))
}

fn release_1_1() -> Result<VersionDelta> {
    let when = released(2024, 3, 1)?;

    let memento = ClassificationDef::new(guid("ecdcd472-6701-4ec4-a0ca-c1b2a7d9ba1b")?, "Memento")
        .with_description("An element whose real-world counterpart has been deleted or archived.")
        .with_valid_entity_def("Referenceable")
        .with_attribute(string("archiveUser", "Name of the user that archived the element."));

    let data_item_sort_order = EnumDef::new(guid("aaa4df8f-1aca-4de8-9abd-1ef2aadba300")?, "DataItemSortOrder")
        .with_description("Specifies the sort order of a data item.")
        .with_element(EnumElementDef::new(0, "Unknown", "The sort order is not specified."))
        .with_element(EnumElementDef::new(1, "Ascending", "The sort order is lowest to highest."))
        .with_element(EnumElementDef::new(2, "Descending", "The sort order is highest to lowest."))
        .with_element(EnumElementDef::new(OTHER_ORDINAL, "Other", "The sort order is not one of the above."))
        .with_default(0);

    Ok(VersionDelta::new("1.1")
        .add(data_item_sort_order)
        .patch("DataSet", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.1")
                .with_attribute(string("formula", "Function that determines the subset of the data."))
        })
        .patch("Collection", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.1")
                .with_attribute(
                    TypeDefAttribute::new("orderBy", AttributeType::enumeration("OrderBy"))
                        .with_description("Sequencing of the collection members."),
                )
        })
        .patch("AssetLocation", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.1")
                .with_description("Location of an Asset. An asset may be sited at several locations.")
                .with_end1(
                    RelationshipEndDef::new("Location", "knownLocations", Cardinality::AnyNumber)
                        .with_description("Places where this asset is sited."),
                )
        })
        .patch("Confidentiality", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.1")
                .with_propagatable(true)
        })
        .add(memento))
}

fn release_1_2() -> Result<VersionDelta> {
    let when = released(2024, 9, 1)?;

    let ownership = ClassificationDef::new(guid("8139a911-a4bd-432b-a9f4-f6d11c511abe")?, "Ownership")
        .with_description("Who is responsible for making decisions on the management and governance of this element.")
        .with_valid_entity_def("Referenceable")
        .with_attribute(string("owner", "Identifier of the owner."))
        .with_attribute(string("ownerTypeName", "Type of element representing the owner."));

    let process_output = RelationshipDef::new(
        guid("e1b8c0a6-4f3b-4d9e-9e2f-6c0d3b5a7f21")?,
        "ProcessOutput",
        RelationshipEndDef::new("Process", "producedBy", Cardinality::AnyNumber)
            .with_description("Processes that create this data set."),
        RelationshipEndDef::new("DataSet", "outputs", Cardinality::AnyNumber)
            .with_description("Data sets created by this process."),
    )
    .with_description("A data set produced by a process.")
    .with_propagation_rule(PropagationRule::OneToTwo);

    Ok(VersionDelta::new("1.2")
        .add(ownership)
        .add(process_output)
        .patch("Asset", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.2")
                .with_attributes([
                    string("displayName", "Display name for the asset."),
                    string("name", "Display name for the asset.").deprecated_by("displayName"),
                ])
        })
        .patch("AssetOwnership", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.2")
                .deprecate()
        })
        .patch("DataFlow", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.2")
                .with_multi_link(true)
        })
        .patch("KeyPattern", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.2")
                .with_element(EnumElementDef::new(5, "CallersKey", "Key provided by the caller of the service."))
                .with_element(EnumElementDef::new(6, "StableKey", "Key that is never changed once allocated."))
        })
        .patch("DataSet", move |p| {
            p.updated_by(RELEASE_AUTHOR, when)
                .with_version_name("1.2")
                .with_attribute(string(
                    "deployedImplementationType",
                    "Name of the technology used to implement the data set.",
                ))
        }))
}
