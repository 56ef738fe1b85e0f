//! Identity and provenance fields common to every type definition.

use super::types::{Guid, TypeDefStatus, TypeName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields shared by all four categories of type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefHeader {
    /// Permanent identity.
    pub guid: Guid,
    /// Name, unique across the registry.
    pub name: TypeName,
    /// Human readable description.
    pub description: String,
    /// Lifecycle status.
    pub status: TypeDefStatus,
    /// Version number, incremented by every applied patch.
    pub version: u64,
    /// Release label for the current version.
    pub version_name: String,
    /// Who last changed the definition.
    pub updated_by: String,
    /// When the definition was last changed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub update_time: Option<DateTime<Utc>>,
}

impl TypeDefHeader {
    /// Create a header for a new, active definition at version 1.
    pub fn new(guid: Guid, name: impl Into<TypeName>) -> Self {
        Self {
            guid,
            name: name.into(),
            description: String::new(),
            status: TypeDefStatus::Active,
            version: 1,
            version_name: "1.0".to_string(),
            updated_by: String::new(),
            update_time: None,
        }
    }

    /// Check whether the definition is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.status == TypeDefStatus::Deprecated
    }
}
