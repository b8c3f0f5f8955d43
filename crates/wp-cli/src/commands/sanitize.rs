//! Sanitize command for checking how a typed value is read.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use wp_core::{Format, sanitize};

use crate::Config;

#[derive(Debug, Args)]
pub struct SanitizeArgs {
    /// Text as typed, e.g. `112`, `:3` or `-930`.
    #[arg(allow_hyphen_values = true)]
    pub raw: String,

    /// Read as `time` or `decimal` (defaults to the configured format).
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Allow hours past 23 and a leading minus, as for totals.
    #[arg(long)]
    pub overflow: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &SanitizeArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.format);
    let canonical = sanitize(&args.raw, format, args.overflow)?;

    if canonical.is_empty() {
        writeln!(writer, "(empty)")?;
    } else {
        writeln!(writer, "{canonical}")?;
    }
    Ok(())
}
