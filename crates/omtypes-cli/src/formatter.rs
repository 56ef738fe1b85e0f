//! Output formatters for catalog listings and release history.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use omtypes_core::{DeltaReport, TypeDef};
use serde::Serialize;
use tracing::warn;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a list of type definitions.
    fn format_catalog(&self, defs: &[&TypeDef]) -> String;

    /// Format per-release change reports.
    fn format_history(&self, reports: &[DeltaReport]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_catalog(&self, defs: &[&TypeDef]) -> String {
        if defs.is_empty() {
            return "No type definitions".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec![
            "Category", "Name", "GUID", "Version", "Status", "Super type", "Attributes",
        ]);

        for def in defs {
            let header = def.header();
            table.add_row(vec![
                Cell::new(def.category()),
                Cell::new(def.name()),
                Cell::new(def.guid()),
                Cell::new(format!("{} ({})", header.version, header.version_name)),
                Cell::new(header.status),
                Cell::new(def.super_type().map(|s| s.as_str()).unwrap_or("-")),
                Cell::new(summarize_attributes(def)),
            ]);
        }

        format!("{}\n{} type(s)", table, defs.len())
    }

    fn format_history(&self, reports: &[DeltaReport]) -> String {
        let mut output = String::new();

        for report in reports {
            if !output.is_empty() {
                output.push_str("\n\n");
            }
            output.push_str(&format!(
                "Release {} ({}, {} change(s))\n",
                report.delta,
                report.grade.overall,
                report.grade.change_grades.len()
            ));

            let mut table = Table::new();
            table.set_header(vec!["Grade", "Type", "Change"]);
            for grade in &report.grade.change_grades {
                table.add_row(vec![
                    Cell::new(grade.compatibility),
                    Cell::new(&grade.type_name),
                    Cell::new(&grade.description),
                ]);
            }
            output.push_str(&table.to_string());
        }

        if output.is_empty() {
            output = "No releases".to_string();
        }

        output
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_catalog(&self, defs: &[&TypeDef]) -> String {
        to_json_or_empty(defs, "catalog")
    }

    fn format_history(&self, reports: &[DeltaReport]) -> String {
        let releases: Vec<serde_json::Value> = reports
            .iter()
            .map(|report| {
                let changes: Vec<serde_json::Value> = report
                    .grade
                    .change_grades
                    .iter()
                    .map(|grade| {
                        serde_json::json!({
                            "grade": grade.compatibility.to_string(),
                            "type": grade.type_name.as_str(),
                            "change": grade.description,
                            "reasoning": grade.reasoning,
                        })
                    })
                    .collect();
                serde_json::json!({
                    "release": report.delta,
                    "overall": report.grade.overall.to_string(),
                    "changes": changes,
                })
            })
            .collect();

        to_json_or_empty(&releases, "history")
    }
}

/// Pretty JSON, or an empty array after logging the serialization failure.
fn to_json_or_empty<T: Serialize + ?Sized>(value: &T, what: &str) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(output = what, error = %e, "failed to render JSON output");
            "[]".to_string()
        }
    }
}

/// Attribute names, with deprecated ones marked.
fn summarize_attributes(def: &TypeDef) -> String {
    let names: Vec<String> = def
        .attributes()
        .iter()
        .map(|a| {
            if a.is_active() {
                a.name.clone()
            } else {
                format!("{} (deprecated)", a.name)
            }
        })
        .collect();

    if names.is_empty() {
        match def {
            TypeDef::EnumDef(e) => format!("{} element(s)", e.elements.len()),
            _ => "-".to_string(),
        }
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omtypes_core::{
        EntityDef, EnumDef, EnumElementDef, Guid, TypeDefAttribute, VersionChain, VersionDelta,
    };

    fn guid(n: u8) -> Guid {
        Guid::parse(&format!("00000000-0000-4000-8000-0000000000{:02x}", n)).unwrap()
    }

    fn sample() -> Vec<TypeDef> {
        vec![
            EnumDef::new(guid(1), "OrderBy")
                .with_element(EnumElementDef::new(0, "Name", ""))
                .into(),
            EntityDef::new(guid(2), "Asset")
                .with_attribute(TypeDefAttribute::string("displayName"))
                .with_attribute(TypeDefAttribute::string("name").deprecated_by("displayName"))
                .into(),
        ]
    }

    #[test]
    fn test_table_catalog() {
        let defs = sample();
        let refs: Vec<_> = defs.iter().collect();
        let output = TableFormatter.format_catalog(&refs);

        assert!(output.contains("OrderBy"));
        assert!(output.contains("1 element(s)"));
        assert!(output.contains("name (deprecated)"));
        assert!(output.ends_with("2 type(s)"));
    }

    #[test]
    fn test_json_catalog() {
        let defs = sample();
        let refs: Vec<_> = defs.iter().collect();
        let output = JsonFormatter.format_catalog(&refs);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["category"], "ENUM_DEF");
        assert_eq!(parsed[1]["name"], "Asset");
    }

    #[test]
    fn test_history_formats() {
        let history = VersionChain::new()
            .with_delta(VersionDelta::new("1.0").add(EntityDef::new(guid(2), "Asset")))
            .replay_with_history()
            .unwrap();
        let reports = history.reports();

        let table = TableFormatter.format_history(&reports);
        assert!(table.starts_with("Release 1.0 (additive, 1 change(s))"));

        let json: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_history(&reports)).unwrap();
        assert_eq!(json[0]["release"], "1.0");
        assert_eq!(json[0]["changes"][0]["grade"], "additive");
    }

    #[test]
    fn test_empty_outputs() {
        assert_eq!(TableFormatter.format_catalog(&[]), "No type definitions");
        assert_eq!(TableFormatter.format_history(&[]), "No releases");
    }

    #[test]
    fn test_unserializable_json_falls_back() {
        let mut keyed = std::collections::HashMap::new();
        keyed.insert((1, 2), "pair keys are not valid JSON object keys");
        assert_eq!(to_json_or_empty(&keyed, "test"), "[]");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(create_formatter(OutputFormat::Json).format_catalog(&[]), "[]");
    }
}
