//! Core error types.

use crate::model::{Guid, TypeDefCategory, TypeName};
use thiserror::Error;

/// Errors raised while building, patching, validating or exporting a type registry.
///
/// None of these are retried inside the core; every one aborts the build
/// that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A name was referenced before any delta added it.
    #[error("type '{name}' has not been added to the registry")]
    NotFound {
        /// The unresolved name.
        name: TypeName,
    },

    /// A GUID or name collides with an existing definition.
    #[error("conflict adding '{name}' ({guid}): {reason}")]
    Conflict {
        /// Name of the definition being added.
        name: TypeName,
        /// GUID of the definition being added.
        guid: Guid,
        /// What it collided with.
        reason: String,
    },

    /// A typed lookup found the name under a different category.
    #[error("type '{name}' is a {actual}, expected {expected}")]
    CategoryMismatch {
        /// The requested name.
        name: TypeName,
        /// The category the caller asked for.
        expected: TypeDefCategory,
        /// The category actually registered.
        actual: TypeDefCategory,
    },

    /// A reference inside a definition does not resolve to a usable type.
    #[error("'{from}' references '{to}': {reason}")]
    DanglingReference {
        /// The definition holding the reference.
        from: TypeName,
        /// The referenced name.
        to: TypeName,
        /// Why the reference is unusable.
        reason: String,
    },

    /// The superType or classification-attachment graph would contain a cycle.
    #[error("cycle detected through '{name}': {}", format_path(.path))]
    Cycle {
        /// The mutated definition.
        name: TypeName,
        /// The path walked from the mutated definition back to itself.
        path: Vec<TypeName>,
    },

    /// A patch attempts a disallowed transition.
    #[error("invalid patch to '{name}': {reason}")]
    InvalidPatch {
        /// The patch target.
        name: TypeName,
        /// The disallowed transition.
        reason: String,
    },

    /// A definition is malformed on its own terms.
    #[error("invalid definition '{name}': {reason}")]
    InvalidDefinition {
        /// The definition name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The registry build itself failed.
    #[error("build failed: {0}")]
    Build(String),

    /// Archive rendering failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(name: &TypeName) -> Self {
        Error::NotFound { name: name.clone() }
    }

    /// Shorthand for [`Error::InvalidPatch`].
    pub fn invalid_patch(name: &TypeName, reason: impl Into<String>) -> Self {
        Error::InvalidPatch {
            name: name.clone(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::InvalidDefinition`].
    pub fn invalid_definition(name: &TypeName, reason: impl Into<String>) -> Self {
        Error::InvalidDefinition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::DanglingReference`].
    pub fn dangling(from: &TypeName, to: &TypeName, reason: impl Into<String>) -> Self {
        Error::DanglingReference {
            from: from.clone(),
            to: to.clone(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

fn format_path(path: &[TypeName]) -> String {
    path.iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found(&TypeName::new("NoSuchType"));
        assert_eq!(
            err.to_string(),
            "type 'NoSuchType' has not been added to the registry"
        );

        let err = Error::Cycle {
            name: TypeName::new("A"),
            path: vec![TypeName::new("A"), TypeName::new("B"), TypeName::new("A")],
        };
        assert!(err.to_string().contains("A -> B -> A"));

        let err = Error::invalid_patch(&TypeName::new("Owns"), "end1 cardinality tightened");
        assert!(err.to_string().contains("Owns"));
        assert!(err.to_string().contains("tightened"));
    }
}
