//! Compatibility grading for registry diffs.
//!
//! Each change is graded by what it does to metadata already stored under
//! the earlier shape:
//! - `Additive`: nothing stored becomes invalid.
//! - `Deprecating`: stored data stays valid but is steered towards a replacement.
//! - `Breaking`: stored data may no longer conform.

use std::fmt;

use super::diff::{AttributeChange, ShapeChange, TypeDefChange, TypeDiff};
use crate::model::{TypeDefStatus, TypeName};

/// Compatibility grade, ordered from safest to most disruptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compatibility {
    /// Only adds or loosens.
    Additive,
    /// Retires something in favour of a replacement.
    Deprecating,
    /// Removes, tightens, retypes or reverses.
    Breaking,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Additive => write!(f, "additive"),
            Compatibility::Deprecating => write!(f, "deprecating"),
            Compatibility::Breaking => write!(f, "breaking"),
        }
    }
}

/// Grading result for a single change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeGrade {
    /// The grade for this change.
    pub compatibility: Compatibility,
    /// The affected type definition.
    pub type_name: TypeName,
    /// Description of the change.
    pub description: String,
    /// Reasoning for the grade.
    pub reasoning: String,
}

impl ChangeGrade {
    fn new(
        compatibility: Compatibility,
        type_name: &TypeName,
        description: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            compatibility,
            type_name: type_name.clone(),
            description: description.into(),
            reasoning: reasoning.into(),
        }
    }
}

/// Grading result for a whole diff.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffGrade {
    /// The worst grade among all changes; `Additive` for an empty diff.
    pub overall: Compatibility,
    /// Individual grades in diff order.
    pub change_grades: Vec<ChangeGrade>,
}

impl DiffGrade {
    /// Changes graded `Breaking`.
    pub fn breaking_changes(&self) -> impl Iterator<Item = &ChangeGrade> {
        self.change_grades
            .iter()
            .filter(|g| g.compatibility == Compatibility::Breaking)
    }

    /// Check whether any change is breaking.
    pub fn is_breaking(&self) -> bool {
        self.overall == Compatibility::Breaking
    }
}

/// Grades registry diffs.
pub struct CompatibilityGrader;

impl CompatibilityGrader {
    /// Grade a diff.
    pub fn grade(diff: &TypeDiff) -> DiffGrade {
        let mut change_grades = Vec::new();

        for change in &diff.changes {
            match change {
                TypeDefChange::Added(def) => change_grades.push(ChangeGrade::new(
                    Compatibility::Additive,
                    def.name(),
                    format!("Add {} '{}'", def.category(), def.name()),
                    "New definitions do not affect existing metadata",
                )),
                TypeDefChange::Removed(def) => change_grades.push(ChangeGrade::new(
                    Compatibility::Breaking,
                    def.name(),
                    format!("Remove {} '{}'", def.category(), def.name()),
                    "Definitions are never removed; deprecate instead",
                )),
                TypeDefChange::Modified {
                    name,
                    to_version,
                    changes,
                    ..
                } => {
                    if changes.is_empty() {
                        change_grades.push(ChangeGrade::new(
                            Compatibility::Additive,
                            name,
                            format!("Update '{}' to version {}", name, to_version),
                            "Provenance or description only",
                        ));
                    }
                    for shape in changes {
                        change_grades.push(Self::grade_shape_change(name, shape));
                    }
                }
            }
        }

        let overall = change_grades
            .iter()
            .map(|g| g.compatibility)
            .max()
            .unwrap_or(Compatibility::Additive);

        DiffGrade {
            overall,
            change_grades,
        }
    }

    fn grade_shape_change(name: &TypeName, change: &ShapeChange) -> ChangeGrade {
        use Compatibility::*;

        match change {
            ShapeChange::GuidChanged { from, to } => ChangeGrade::new(
                Breaking,
                name,
                format!("Change guid of '{}' from {} to {}", name, from, to),
                "GUIDs are permanent identity",
            ),
            ShapeChange::CategoryChanged { from, to } => ChangeGrade::new(
                Breaking,
                name,
                format!("Change category of '{}' from {} to {}", name, from, to),
                "Category is permanent",
            ),
            ShapeChange::Status { from, to } => {
                if *to == TypeDefStatus::Deprecated {
                    ChangeGrade::new(
                        Deprecating,
                        name,
                        format!("Deprecate '{}'", name),
                        "Existing instances remain valid",
                    )
                } else {
                    ChangeGrade::new(
                        Breaking,
                        name,
                        format!("Change status of '{}' from {} to {}", name, from, to),
                        "Deprecation is terminal",
                    )
                }
            }
            ShapeChange::SuperType { from: None, to: Some(to) } => ChangeGrade::new(
                Additive,
                name,
                format!("Give '{}' superType '{}'", name, to),
                "Only adds inherited attributes",
            ),
            ShapeChange::SuperType { from, to } => ChangeGrade::new(
                Breaking,
                name,
                format!(
                    "Change superType of '{}' from {} to {}",
                    name,
                    display_opt(from.as_ref()),
                    display_opt(to.as_ref())
                ),
                "Inherited attributes may disappear",
            ),
            ShapeChange::Attribute(change) => Self::grade_attribute_change(name, change),
            ShapeChange::EndCardinality { end, from, to } => {
                let grade = if from.allows_transition_to(*to) {
                    Additive
                } else {
                    Breaking
                };
                ChangeGrade::new(
                    grade,
                    name,
                    format!("Change end{} cardinality of '{}' from {} to {}", end, name, from, to),
                    match grade {
                        Additive => "Loosening admits every existing relationship",
                        _ => "Tightening may reject existing relationships",
                    },
                )
            }
            ShapeChange::EndRetargeted { end, from, to } => ChangeGrade::new(
                Breaking,
                name,
                format!("Retarget end{} of '{}' from '{}' to '{}'", end, name, from, to),
                "Existing relationships reference the old entity type",
            ),
            ShapeChange::MultiLink { from, to } => {
                let grade = if *to || !*from { Additive } else { Breaking };
                ChangeGrade::new(
                    grade,
                    name,
                    format!("Change multiLink of '{}' from {} to {}", name, from, to),
                    match grade {
                        Additive => "Duplicate links become permitted",
                        _ => "Existing duplicate links would become invalid",
                    },
                )
            }
            ShapeChange::ValidEntityDefs { added, removed } => {
                let grade = if removed.is_empty() { Additive } else { Breaking };
                ChangeGrade::new(
                    grade,
                    name,
                    format!(
                        "Change validEntityDefs of '{}' (+{} -{})",
                        name,
                        added.len(),
                        removed.len()
                    ),
                    match grade {
                        Additive => "Classification may attach to more entity types",
                        _ => "Existing attachments may become invalid",
                    },
                )
            }
            ShapeChange::ElementAdded(element) => ChangeGrade::new(
                Additive,
                name,
                format!("Add element {} '{}' to '{}'", element.ordinal, element.value, name),
                "New enum values do not affect stored values",
            ),
            ShapeChange::ElementRemoved(element) => ChangeGrade::new(
                Breaking,
                name,
                format!(
                    "Remove element {} '{}' from '{}'",
                    element.ordinal, element.value, name
                ),
                "Stored values may use the removed element",
            ),
            ShapeChange::ElementRenamed { ordinal, from, to } => ChangeGrade::new(
                Breaking,
                name,
                format!(
                    "Rename element {} of '{}' from '{}' to '{}'",
                    ordinal, name, from, to
                ),
                "Ordinals are never reused for another value",
            ),
        }
    }

    fn grade_attribute_change(name: &TypeName, change: &AttributeChange) -> ChangeGrade {
        match change {
            AttributeChange::Added(attribute) => ChangeGrade::new(
                Compatibility::Additive,
                name,
                format!(
                    "Add attribute '{}.{}' ({})",
                    name, attribute.name, attribute.data_type
                ),
                "New attributes do not affect existing metadata",
            ),
            AttributeChange::Deprecated {
                name: attribute,
                replaced_by,
            } => ChangeGrade::new(
                Compatibility::Deprecating,
                name,
                format!(
                    "Deprecate attribute '{}.{}' in favour of '{}'",
                    name,
                    attribute,
                    replaced_by.as_deref().unwrap_or("<none>")
                ),
                "Attribute stays in the declared shape",
            ),
            AttributeChange::Reactivated { name: attribute } => ChangeGrade::new(
                Compatibility::Breaking,
                name,
                format!("Reactivate attribute '{}.{}'", name, attribute),
                "Deprecation is terminal",
            ),
            AttributeChange::TypeChanged {
                name: attribute,
                from,
                to,
            } => ChangeGrade::new(
                Compatibility::Breaking,
                name,
                format!(
                    "Change type of '{}.{}' from {} to {}",
                    name, attribute, from, to
                ),
                "Stored values were written with the old type",
            ),
            AttributeChange::Removed(attribute) => ChangeGrade::new(
                Compatibility::Breaking,
                name,
                format!("Remove attribute '{}.{}'", name, attribute.name),
                "Attributes are never removed; deprecate instead",
            ),
        }
    }
}

fn display_opt(name: Option<&TypeName>) -> String {
    name.map_or_else(|| "<none>".to_string(), |n| format!("'{}'", n))
}
