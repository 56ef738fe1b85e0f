//! Archive export.
//!
//! Renders a finished registry into the archive output contract: a fixed
//! header plus every definition grouped by category. Export is a pure
//! function of the registry and the header, so rebuilding from the same
//! chain always yields the same bytes and the same fingerprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{Guid, TypeDef, TypeDefCategory};
use crate::registry::TypeRegistry;

/// Kind of archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchiveType {
    /// A self-contained bundle of type definitions.
    #[default]
    ContentPack,
}

/// Archive identity and provenance.
///
/// `guid` and `creation_date` are part of the archive identity and must be
/// fixed by the caller, never derived from the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveHeader {
    pub guid: Guid,
    pub name: String,
    pub description: String,
    pub archive_type: ArchiveType,
    pub version: u64,
    pub originator_name: String,
    pub originator_organization: String,
    pub originator_license: String,
    pub creation_date: DateTime<Utc>,
    /// GUIDs of archives this one builds on.
    pub depends_on_archives: Vec<Guid>,
}

impl ArchiveHeader {
    /// Create a header with the given identity and empty provenance.
    pub fn new(guid: Guid, name: impl Into<String>, creation_date: DateTime<Utc>) -> Self {
        Self {
            guid,
            name: name.into(),
            description: String::new(),
            archive_type: ArchiveType::ContentPack,
            version: 1,
            originator_name: String::new(),
            originator_organization: String::new(),
            originator_license: String::new(),
            creation_date,
            depends_on_archives: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn with_originator(
        mut self,
        name: impl Into<String>,
        organization: impl Into<String>,
        license: impl Into<String>,
    ) -> Self {
        self.originator_name = name.into();
        self.originator_organization = organization.into();
        self.originator_license = license.into();
        self
    }

    pub fn depends_on(mut self, archive: Guid) -> Self {
        if !self.depends_on_archives.contains(&archive) {
            self.depends_on_archives.push(archive);
        }
        self
    }
}

/// An exported archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    /// Identity and provenance.
    pub header: ArchiveHeader,
    /// Definitions: enums, entities, relationships, classifications; each
    /// group in registry insertion order.
    pub content: Vec<TypeDef>,
}

impl Archive {
    /// Render as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse a previously rendered archive.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lowercase hex BLAKE3 digest of the compact JSON rendering.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
    }

    /// Number of exported definitions.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check whether the archive has no definitions.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Exports registries as archives.
pub struct ArchiveExporter;

impl ArchiveExporter {
    /// Export `registry` under `header`.
    pub fn export(registry: &TypeRegistry, header: ArchiveHeader) -> Result<Archive> {
        if header.guid.is_nil() {
            return Err(Error::Build("archive guid must not be nil".to_string()));
        }

        let content: Vec<TypeDef> = TypeDefCategory::EXPORT_ORDER
            .iter()
            .flat_map(|&category| registry.iter_category(category).cloned())
            .collect();

        let archive = Archive { header, content };
        info!(
            archive = %archive.header.name,
            type_count = archive.len(),
            fingerprint = %archive.fingerprint()?,
            "exported archive"
        );
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Cardinality, ClassificationDef, EntityDef, EnumDef, EnumElementDef, RelationshipDef,
        RelationshipEndDef,
    };

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    fn header() -> ArchiveHeader {
        let created = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ArchiveHeader::new(guid(200), "Test Archive", created)
            .with_originator("Test", "Test Org", "Apache-2.0")
    }

    fn mixed_registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.add_entity_def(EntityDef::new(guid(1), "Asset")).unwrap();
        registry
            .add_classification_def(
                ClassificationDef::new(guid(2), "Confidentiality").with_valid_entity_def("Asset"),
            )
            .unwrap();
        registry
            .add_relationship_def(RelationshipDef::new(
                guid(3),
                "AssetLink",
                RelationshipEndDef::new("Asset", "from", Cardinality::AnyNumber),
                RelationshipEndDef::new("Asset", "to", Cardinality::AnyNumber),
            ))
            .unwrap();
        registry
            .add_enum_def(
                EnumDef::new(guid(4), "OrderBy").with_element(EnumElementDef::new(0, "Name", "")),
            )
            .unwrap();
        registry
            .add_entity_def(EntityDef::new(guid(5), "DataSet").with_super_type("Asset"))
            .unwrap();
        registry
    }

    #[test]
    fn test_category_order() {
        let archive = ArchiveExporter::export(&mixed_registry(), header()).unwrap();
        let names: Vec<_> = archive.content.iter().map(|d| d.name().as_str()).collect();
        assert_eq!(
            names,
            vec!["OrderBy", "Asset", "DataSet", "AssetLink", "Confidentiality"]
        );
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = ArchiveExporter::export(&mixed_registry(), header()).unwrap();
        let b = ArchiveExporter::export(&mixed_registry(), header()).unwrap();
        assert_eq!(a.to_json(false).unwrap(), b.to_json(false).unwrap());
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);

        let c = ArchiveExporter::export(&mixed_registry(), header().with_version(2)).unwrap();
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
    }

    #[test]
    fn test_header_shape() {
        let archive = ArchiveExporter::export(&TypeRegistry::new(), header()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&archive.to_json(false).unwrap()).unwrap();
        assert_eq!(value["header"]["archiveType"], "CONTENT_PACK");
        assert_eq!(value["header"]["originatorOrganization"], "Test Org");
        assert_eq!(value["header"]["creationDate"], "2024-01-01T00:00:00Z");
        assert!(value["content"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_nil_archive_guid_rejected() {
        let mut header = header();
        header.guid = Guid::from_uuid(uuid::Uuid::nil());
        assert!(matches!(
            ArchiveExporter::export(&TypeRegistry::new(), header),
            Err(Error::Build(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let archive = ArchiveExporter::export(&mixed_registry(), header()).unwrap();
        let parsed = Archive::from_json(&archive.to_json(true).unwrap()).unwrap();
        assert_eq!(parsed, archive);
    }
}
