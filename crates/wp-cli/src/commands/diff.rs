//! Diff command for the total between two clock times.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use wp_core::{ClockTime, Format, diff};

use crate::Config;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Start time, e.g. `930`.
    pub start: String,

    /// End time, e.g. `17:45`.
    pub end: String,

    /// Print the total as `time` or `decimal` (defaults to the configured format).
    #[arg(short, long)]
    pub format: Option<Format>,
}

pub fn run<W: Write>(writer: &mut W, args: &DiffArgs, config: &Config) -> Result<()> {
    let start: ClockTime = args
        .start
        .parse()
        .with_context(|| format!("invalid start time: {}", args.start))?;
    let end: ClockTime = args
        .end
        .parse()
        .with_context(|| format!("invalid end time: {}", args.end))?;

    let total = diff(start, end);
    tracing::debug!(%start, %end, %total, "computed total");
    writeln!(writer, "{}", total.render(args.format.unwrap_or(config.format)))?;
    Ok(())
}
