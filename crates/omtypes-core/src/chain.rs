//! Version chain replay.
//!
//! Release history is data: an ordered list of [`VersionDelta`]s, each an
//! ordered list of add and patch operations. Replaying the chain against a
//! fresh [`TypeRegistry`] rebuilds the accumulated type model.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::error::Result;
use crate::history::{ChainHistory, Snapshot};
use crate::model::{TypeDef, TypeDefPatch, TypeName};
use crate::registry::TypeRegistry;

/// Populates a seeded patch.
pub type PatchBuilder = Box<dyn Fn(TypeDefPatch) -> TypeDefPatch + Send + Sync>;

/// One operation inside a delta.
pub enum DeltaOp {
    /// Add a new definition.
    Add(TypeDef),
    /// Patch an existing definition. The builder receives the patch issued
    /// by [`TypeRegistry::get_patch_for_type`] for `target`.
    Patch {
        /// Name of the definition to patch.
        target: TypeName,
        /// Fills in the patch fields.
        build: PatchBuilder,
    },
}

impl DeltaOp {
    fn target(&self) -> &TypeName {
        match self {
            DeltaOp::Add(def) => def.name(),
            DeltaOp::Patch { target, .. } => target,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DeltaOp::Add(_) => "add",
            DeltaOp::Patch { .. } => "patch",
        }
    }

    fn apply(&self, registry: &mut TypeRegistry) -> Result<()> {
        match self {
            DeltaOp::Add(def) => registry.add_type_def(def.clone()),
            DeltaOp::Patch { target, build } => {
                let seed = registry.get_patch_for_type(target.as_str())?;
                registry.apply_patch(build(seed))?;
                Ok(())
            }
        }
    }
}

impl fmt::Debug for DeltaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaOp::Add(def) => f
                .debug_tuple("Add")
                .field(&def.category())
                .field(def.name())
                .finish(),
            DeltaOp::Patch { target, .. } => f.debug_struct("Patch").field("target", target).finish(),
        }
    }
}

/// A named, ordered batch of operations, typically one release.
#[derive(Debug)]
pub struct VersionDelta {
    /// Release name, e.g. `"1.1"`.
    pub name: String,
    /// Operations in application order.
    pub operations: Vec<DeltaOp>,
}

impl VersionDelta {
    /// Create an empty delta.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }

    /// Append an add operation.
    pub fn add(mut self, def: impl Into<TypeDef>) -> Self {
        self.operations.push(DeltaOp::Add(def.into()));
        self
    }

    /// Append a patch operation.
    pub fn patch<F>(mut self, target: impl Into<TypeName>, build: F) -> Self
    where
        F: Fn(TypeDefPatch) -> TypeDefPatch + Send + Sync + 'static,
    {
        self.operations.push(DeltaOp::Patch {
            target: target.into(),
            build: Box::new(build),
        });
        self
    }

    /// Apply every operation in order, stopping at the first failure.
    ///
    /// The registry may hold a partial delta on error; callers that need
    /// atomicity go through [`VersionChain::replay_into`].
    pub fn apply_to(&self, registry: &mut TypeRegistry) -> Result<()> {
        for (index, op) in self.operations.iter().enumerate() {
            if let Err(e) = op.apply(registry) {
                error!(
                    delta = %self.name,
                    operation = index,
                    kind = op.kind(),
                    target = %op.target(),
                    error = %e,
                    "delta operation failed"
                );
                return Err(e);
            }
        }
        info!(
            delta = %self.name,
            operations = self.operations.len(),
            type_count = registry.len(),
            "applied delta"
        );
        Ok(())
    }
}

/// An ordered release history.
#[derive(Debug, Default)]
pub struct VersionChain {
    deltas: Vec<VersionDelta>,
}

impl VersionChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta.
    pub fn push(&mut self, delta: VersionDelta) {
        self.deltas.push(delta);
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_delta(mut self, delta: VersionDelta) -> Self {
        self.push(delta);
        self
    }

    /// The deltas in replay order.
    pub fn deltas(&self) -> &[VersionDelta] {
        &self.deltas
    }

    /// Take the deltas out of the chain.
    pub fn into_deltas(self) -> Vec<VersionDelta> {
        self.deltas
    }

    /// Number of deltas.
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Check whether the chain has no deltas.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Replay the whole chain against a fresh registry.
    pub fn replay(&self) -> Result<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        self.replay_into(&mut registry)?;
        Ok(registry)
    }

    /// Replay the whole chain on top of `registry`.
    ///
    /// Works on a private copy; `registry` is replaced only if every delta
    /// succeeds.
    pub fn replay_into(&self, registry: &mut TypeRegistry) -> Result<()> {
        let mut working = registry.clone();
        for delta in &self.deltas {
            delta.apply_to(&mut working)?;
        }
        *registry = working;
        Ok(())
    }

    /// Replay against a fresh registry, keeping a snapshot after each delta.
    pub fn replay_with_history(&self) -> Result<ChainHistory> {
        let mut working = TypeRegistry::new();
        let mut snapshots = Vec::with_capacity(self.deltas.len());
        for delta in &self.deltas {
            delta.apply_to(&mut working)?;
            snapshots.push(Snapshot {
                delta: delta.name.clone(),
                registry: Arc::new(working.clone()),
            });
        }
        Ok(ChainHistory::new(snapshots))
    }
}
