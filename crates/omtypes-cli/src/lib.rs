//! Command-line front end for the omtypes type archive builder.
//!
//! Replays the bundled reference releases, exports the resulting catalog as
//! a content-pack archive, and reports on release history.

pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod releases;

use std::io::Write;

pub use config::{ArchiveConfig, Args, Command, DEFAULT_LOG_FILTER};
pub use error::{Error, Result};
pub use formatter::{create_formatter, Formatter, OutputFormat};
pub use releases::reference_chain;

/// Run a parsed command line, writing user output to `out`.
pub fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let command = args.command.clone();
    let config = args.into_config()?;

    match command {
        Command::Build { .. } => commands::build(&config, out).map(|_| ()),
        Command::Verify => commands::verify(&config, out),
        Command::List { format, category } => commands::list(format, category.as_deref(), out),
        Command::History { format } => commands::history(format, out),
    }
}
