//! # Breakdance CLI
//!
//! Command-line front end: batch baseline generation, baseline comparison
//! and snapshot path lookup.

#![forbid(unsafe_code)]

pub mod args;
pub mod commands;

use std::io::Write;

use anyhow::Result;
use breakdance_config::BreakdanceConfig;
use breakdance_surface::PublicApi;

pub use args::{Args, ArgsError, Command, HELP};
pub use commands::{compare, discover_metadata, generate, snapshot_path, GenerateSummary};

/// Version of the command-line tool.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs a parsed command, writing user-facing output to `output`.
///
/// Returns false only when `compare` finds a change; `generate` is best
/// effort and always succeeds.
pub fn run(command: &Command, config: &BreakdanceConfig, output: &mut impl Write) -> Result<bool> {
    let api = PublicApi::from_config(&config.surface);

    match command {
        Command::Help => write!(output, "{HELP}")?,
        Command::Version => writeln!(output, "breakdance {VERSION}")?,
        Command::Generate { dir, out } => {
            let summary = generate(&api, dir, out.as_deref());
            writeln!(
                output,
                "{} baseline(s) written, {} skipped",
                summary.written.len(),
                summary.failed.len()
            )?;
        }
        Command::Compare { metadata, baseline } => {
            return compare(&api, metadata, baseline, output);
        }
        Command::SnapshotPath { url, accept, root } => {
            let path = snapshot_path(config, url, accept.as_deref(), root.as_deref())?;
            writeln!(output, "{}", path.display())?;
        }
    }

    Ok(true)
}
