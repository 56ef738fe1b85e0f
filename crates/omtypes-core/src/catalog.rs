//! Shared type catalog.
//!
//! Long-lived holder of published registry snapshots. Writers are
//! serialized; readers get an `Arc` to a completed snapshot and never see a
//! registry mid-build.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::chain::VersionChain;
use crate::error::Result;
use crate::registry::TypeRegistry;

/// Versioned, snapshot-publishing registry store.
pub struct TypeCatalog {
    /// Serializes writers.
    writer: Mutex<()>,
    /// Published snapshots; version `n` lives at index `n - 1`.
    snapshots: RwLock<Vec<Arc<TypeRegistry>>>,
    /// Latest published version (cached).
    current_version: AtomicU64,
}

impl TypeCatalog {
    /// Create an empty catalog at version 0.
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(()),
            snapshots: RwLock::new(Vec::new()),
            current_version: AtomicU64::new(0),
        }
    }

    /// Get the current published version; 0 before the first publish.
    pub fn current_version(&self) -> u64 {
        self.current_version.load(Ordering::SeqCst)
    }

    /// Get the current snapshot. Empty before the first publish.
    pub fn current(&self) -> Arc<TypeRegistry> {
        self.snapshots
            .read()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    /// Get the snapshot published as `version`.
    pub fn snapshot_at(&self, version: u64) -> Option<Arc<TypeRegistry>> {
        let index = usize::try_from(version).ok()?.checked_sub(1)?;
        self.snapshots.read().get(index).cloned()
    }

    /// List all published versions.
    pub fn list_versions(&self) -> Vec<u64> {
        (1..=self.current_version()).collect()
    }

    /// Replay `chain` on top of the current snapshot and publish the result.
    ///
    /// Returns the new version. On failure nothing is published and the
    /// current snapshot is unchanged.
    pub fn apply(&self, chain: &VersionChain) -> Result<u64> {
        let _guard = self.writer.lock();

        let mut working = self.current().as_ref().clone();
        chain.replay_into(&mut working)?;

        let type_count = working.len();
        let mut snapshots = self.snapshots.write();
        snapshots.push(Arc::new(working));
        let version = snapshots.len() as u64;
        self.current_version.store(version, Ordering::SeqCst);

        info!(version, type_count, deltas = chain.len(), "published catalog snapshot");
        Ok(version)
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
