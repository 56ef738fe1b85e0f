//! Subcommand implementations.
//!
//! Each command writes its user-facing output to the supplied writer and
//! logs progress through `tracing`.

use std::fs;
use std::io::Write;

use omtypes_core::{Archive, ArchiveExporter, TypeDef, VersionChain};
use tracing::{info, warn};

use crate::config::{parse_category, ArchiveConfig};
use crate::error::{Error, Result};
use crate::formatter::{create_formatter, OutputFormat};
use crate::releases::reference_chain;

/// Replay the reference releases and write the archive.
///
/// The archive goes to `config.output` when set, otherwise to `out`.
pub fn build(config: &ArchiveConfig, out: &mut impl Write) -> Result<Archive> {
    let archive = export(&reference_chain()?, config)?;
    let json = archive.to_json(config.pretty)?;

    match &config.output {
        Some(path) => {
            fs::write(path, &json)?;
            info!(path = %path.display(), types = archive.len(), "Archive written");
        }
        None => {
            writeln!(out, "{}", json)?;
        }
    }

    info!(fingerprint = %archive.fingerprint()?, "Archive built");
    Ok(archive)
}

/// Rebuild the archive twice and compare fingerprints, then audit the
/// release history for breaking changes.
pub fn verify(config: &ArchiveConfig, out: &mut impl Write) -> Result<()> {
    let chain = reference_chain()?;

    let first = export(&chain, config)?.fingerprint()?;
    let second = export(&chain, config)?.fingerprint()?;
    if first != second {
        return Err(omtypes_core::Error::Build(format!(
            "rebuild is not reproducible: {} != {}",
            first, second
        ))
        .into());
    }

    let findings = chain.replay_with_history()?.audit();
    if !findings.is_empty() {
        for finding in &findings {
            warn!(
                delta = %finding.delta,
                type_name = %finding.change.type_name,
                change = %finding.change.description,
                "Breaking change"
            );
        }
        return Err(Error::Audit(format!(
            "{} breaking change(s) in release history",
            findings.len()
        )));
    }

    writeln!(out, "Reproducible build: {}", first)?;
    writeln!(out, "Releases audited: {} (no breaking changes)", chain.len())?;
    Ok(())
}

/// Print the final type catalog, optionally restricted to one category.
pub fn list(format: OutputFormat, category: Option<&str>, out: &mut impl Write) -> Result<()> {
    let category = category.map(parse_category).transpose()?;
    let registry = reference_chain()?.replay()?;

    let defs: Vec<&TypeDef> = match category {
        Some(category) => registry.iter_category(category).collect(),
        None => registry.iter().collect(),
    };

    writeln!(out, "{}", create_formatter(format).format_catalog(&defs))?;
    Ok(())
}

/// Print what each release changed and how it was graded.
pub fn history(format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let reports = reference_chain()?.replay_with_history()?.reports();
    writeln!(out, "{}", create_formatter(format).format_history(&reports))?;
    Ok(())
}

fn export(chain: &VersionChain, config: &ArchiveConfig) -> Result<Archive> {
    let registry = chain.replay()?;
    Ok(ArchiveExporter::export(&registry, config.header())?)
}
