//! Evolution history.
//!
//! A [`ChainHistory`] keeps one immutable registry snapshot per replayed
//! delta. Consecutive snapshots are diffed and graded so that the whole
//! release history can be audited for breaking changes.

mod diff;
mod grader;

use std::sync::Arc;

use crate::registry::TypeRegistry;

pub use diff::{AttributeChange, ShapeChange, TypeDefChange, TypeDiff};
pub use grader::{ChangeGrade, Compatibility, CompatibilityGrader, DiffGrade};

/// Registry state after one delta.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Name of the delta that produced this state.
    pub delta: String,
    /// The registry as it stood after the delta.
    pub registry: Arc<TypeRegistry>,
}

/// What one delta changed, and how disruptive it was.
#[derive(Debug, Clone)]
pub struct DeltaReport {
    /// Delta name.
    pub delta: String,
    /// Changes relative to the previous snapshot.
    pub diff: TypeDiff,
    /// Grades of those changes.
    pub grade: DiffGrade,
}

/// A breaking change found by [`ChainHistory::audit`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuditFinding {
    /// Delta that introduced the change.
    pub delta: String,
    /// The graded change.
    pub change: ChangeGrade,
}

/// Ordered per-delta snapshots of a replayed chain.
#[derive(Debug, Clone, Default)]
pub struct ChainHistory {
    snapshots: Vec<Snapshot>,
}

impl ChainHistory {
    /// Wrap snapshots in replay order.
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// All snapshots in replay order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// The final snapshot.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Diff and grade every delta against the state before it. The first
    /// delta is compared with an empty registry.
    pub fn reports(&self) -> Vec<DeltaReport> {
        let empty = TypeRegistry::new();
        let mut previous = &empty;
        let mut reports = Vec::with_capacity(self.snapshots.len());

        for snapshot in &self.snapshots {
            let diff = TypeDiff::compute(previous, &snapshot.registry);
            let grade = CompatibilityGrader::grade(&diff);
            reports.push(DeltaReport {
                delta: snapshot.delta.clone(),
                diff,
                grade,
            });
            previous = snapshot.registry.as_ref();
        }

        reports
    }

    /// Every breaking change across the history. Empty for a history that
    /// only ever added, loosened or deprecated.
    pub fn audit(&self) -> Vec<AuditFinding> {
        self.reports()
            .into_iter()
            .flat_map(|report| {
                let delta = report.delta;
                report
                    .grade
                    .change_grades
                    .into_iter()
                    .filter(|g| g.compatibility == Compatibility::Breaking)
                    .map(move |change| AuditFinding {
                        delta: delta.clone(),
                        change,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityDef, Guid, TypeDefAttribute};

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    #[test]
    fn test_reports_and_clean_audit() {
        let mut first = TypeRegistry::new();
        first.add_entity_def(EntityDef::new(guid(1), "Asset")).unwrap();
        let mut second = first.clone();
        let patch = second
            .get_patch_for_type("Asset")
            .unwrap()
            .with_attribute(TypeDefAttribute::string("displayName"));
        second.apply_patch(patch).unwrap();

        let history = ChainHistory::new(vec![
            Snapshot {
                delta: "1.0".into(),
                registry: Arc::new(first),
            },
            Snapshot {
                delta: "1.1".into(),
                registry: Arc::new(second),
            },
        ]);

        let reports = history.reports();
        assert_eq!(reports.len(), 2);
        assert!(matches!(&reports[0].diff.changes[0], TypeDefChange::Added(_)));
        assert_eq!(reports[1].grade.overall, Compatibility::Additive);
        assert!(history.audit().is_empty());
    }

    #[test]
    fn test_audit_flags_removal() {
        let mut first = TypeRegistry::new();
        first.add_entity_def(EntityDef::new(guid(1), "Asset")).unwrap();

        let history = ChainHistory::new(vec![
            Snapshot {
                delta: "1.0".into(),
                registry: Arc::new(first),
            },
            Snapshot {
                delta: "2.0".into(),
                registry: Arc::new(TypeRegistry::new()),
            },
        ]);

        let findings = history.audit();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].delta, "2.0");
        assert_eq!(findings[0].change.type_name.as_str(), "Asset");
    }
}
