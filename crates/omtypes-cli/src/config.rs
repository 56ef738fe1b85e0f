//! Archive configuration and command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use omtypes_core::{ArchiveHeader, Guid, TypeDefCategory};

use crate::error::{Error, Result};
use crate::formatter::OutputFormat;

/// Default archive GUID. Part of the archive identity; keep it fixed.
pub const DEFAULT_ARCHIVE_GUID: &str = "bce3b0a0-662a-4f87-b8dc-844078a11a6e";

/// Default archive name.
pub const DEFAULT_ARCHIVE_NAME: &str = "Open Metadata Foundation Types";

/// Default archive description.
pub const DEFAULT_ARCHIVE_DESCRIPTION: &str =
    "Foundation entity, relationship, classification and enumeration types.";

/// Default archive version.
pub const DEFAULT_ARCHIVE_VERSION: u64 = 1;

/// Default originator name.
pub const DEFAULT_ORIGINATOR_NAME: &str = "omtypes";

/// Default originator organization.
pub const DEFAULT_ORIGINATOR_ORGANIZATION: &str = "omtypes contributors";

/// Default originator license.
pub const DEFAULT_ORIGINATOR_LICENSE: &str = "Apache-2.0";

/// Default creation date (RFC 3339). Fixed so rebuilds are reproducible.
pub const DEFAULT_CREATION_DATE: &str = "2024-01-01T00:00:00Z";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "omtypes=info,omtypes_cli=info,omtypes_core=info";

/// Archive identity and output options.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConfig {
    /// Archive GUID.
    pub guid: Guid,

    /// Archive name.
    pub name: String,

    /// Archive description.
    pub description: String,

    /// Archive version.
    pub version: u64,

    /// Originator name.
    pub originator_name: String,

    /// Originator organization.
    pub originator_organization: String,

    /// Originator license.
    pub originator_license: String,

    /// Fixed creation date.
    pub creation_date: DateTime<Utc>,

    /// Archives this one depends on.
    pub depends_on: Vec<Guid>,

    /// Where to write the archive. None writes to stdout.
    pub output: Option<PathBuf>,

    /// Pretty-print the archive JSON.
    pub pretty: bool,
}

impl ArchiveConfig {
    /// Create a configuration with the given identity and default provenance.
    pub fn new(guid: Guid, name: impl Into<String>, creation_date: DateTime<Utc>) -> Self {
        Self {
            guid,
            name: name.into(),
            description: DEFAULT_ARCHIVE_DESCRIPTION.to_string(),
            version: DEFAULT_ARCHIVE_VERSION,
            originator_name: DEFAULT_ORIGINATOR_NAME.to_string(),
            originator_organization: DEFAULT_ORIGINATOR_ORGANIZATION.to_string(),
            originator_license: DEFAULT_ORIGINATOR_LICENSE.to_string(),
            creation_date,
            depends_on: Vec::new(),
            output: None,
            pretty: false,
        }
    }

    /// The default identity of the bundled reference archive.
    pub fn reference() -> Result<Self> {
        Ok(Self::new(
            parse_guid(DEFAULT_ARCHIVE_GUID)?,
            DEFAULT_ARCHIVE_NAME,
            parse_creation_date(DEFAULT_CREATION_DATE)?,
        ))
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the archive version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Set the originator.
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

    /// Add an archive dependency.
    pub fn with_dependency(mut self, archive: Guid) -> Self {
        self.depends_on.push(archive);
        self
    }

    /// Set the output path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Enable pretty-printing.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Build the archive header.
    pub fn header(&self) -> ArchiveHeader {
        let header = ArchiveHeader::new(self.guid, self.name.clone(), self.creation_date)
            .with_description(self.description.clone())
            .with_version(self.version)
            .with_originator(
                self.originator_name.clone(),
                self.originator_organization.clone(),
                self.originator_license.clone(),
            );
        self.depends_on
            .iter()
            .fold(header, |header, guid| header.depends_on(*guid))
    }
}

/// Parse a GUID argument.
pub fn parse_guid(value: &str) -> Result<Guid> {
    Guid::parse(value).map_err(|e| Error::Config(e.to_string()))
}

/// Parse an RFC 3339 creation date argument.
pub fn parse_creation_date(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| Error::Config(format!("invalid creation date '{}': {}", value, e)))
}

/// Parse a category filter.
pub fn parse_category(value: &str) -> Result<TypeDefCategory> {
    TypeDefCategory::parse(value)
        .ok_or_else(|| Error::Config(format!("unknown category '{}'", value)))
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "omtypes")]
#[command(version, about = "Open metadata type archive builder", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Archive GUID.
    #[arg(long, global = true, default_value = DEFAULT_ARCHIVE_GUID)]
    pub archive_guid: String,

    /// Archive name.
    #[arg(long, global = true, default_value = DEFAULT_ARCHIVE_NAME)]
    pub archive_name: String,

    /// Archive version.
    #[arg(long, global = true, default_value_t = DEFAULT_ARCHIVE_VERSION)]
    pub archive_version: u64,

    /// Archive creation date (RFC 3339).
    #[arg(long, global = true, default_value = DEFAULT_CREATION_DATE)]
    pub creation_date: String,

    /// Originator name.
    #[arg(long, global = true, default_value = DEFAULT_ORIGINATOR_NAME)]
    pub originator: String,

    /// Originator organization.
    #[arg(long, global = true, default_value = DEFAULT_ORIGINATOR_ORGANIZATION)]
    pub organization: String,

    /// Originator license.
    #[arg(long, global = true, default_value = DEFAULT_ORIGINATOR_LICENSE)]
    pub license: String,

    /// GUID of an archive this one depends on (repeatable).
    #[arg(long = "depends-on", global = true)]
    pub depends_on: Vec<String>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Replay the reference releases and write the archive.
    Build {
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Check that rebuilds are byte-identical and that history has no breaking change.
    Verify,

    /// Print the final type catalog.
    List {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only show one category (entity, relationship, classification, enum).
        #[arg(long)]
        category: Option<String>,
    },

    /// Print what each release changed and how it was graded.
    History {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

impl Args {
    /// Convert command-line arguments to archive configuration.
    pub fn into_config(self) -> Result<ArchiveConfig> {
        let mut config = ArchiveConfig::new(
            parse_guid(&self.archive_guid)?,
            self.archive_name,
            parse_creation_date(&self.creation_date)?,
        )
        .with_version(self.archive_version)
        .with_originator(self.originator, self.organization, self.license);

        for dependency in &self.depends_on {
            config = config.with_dependency(parse_guid(dependency)?);
        }

        if let Command::Build { output, pretty } = self.command {
            config.output = output;
            config.pretty = pretty;
        }

        Ok(config)
    }
}
