//! End and start commands for rebuilding an endpoint from a total.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use wp_core::{ClockDuration, ClockTime, Format, Reconstructed, reconstruct_end, reconstruct_start};

use crate::Config;

#[derive(Debug, Args)]
pub struct EndArgs {
    /// Start time, e.g. `2300`.
    #[arg(long)]
    pub start: String,

    /// Total, e.g. `25:00` or `-1:30`.
    #[arg(long, allow_hyphen_values = true)]
    pub total: String,

    /// Read the total as `time` or `decimal` (defaults to the configured format).
    #[arg(short, long)]
    pub format: Option<Format>,
}

#[derive(Debug, Args)]
pub struct StartArgs {
    /// End time, e.g. `0100`.
    #[arg(long)]
    pub end: String,

    /// Total, e.g. `2:00` or `8,50`.
    #[arg(long, allow_hyphen_values = true)]
    pub total: String,

    /// Read the total as `time` or `decimal` (defaults to the configured format).
    #[arg(short, long)]
    pub format: Option<Format>,
}

pub fn run_end<W: Write>(writer: &mut W, args: &EndArgs, config: &Config) -> Result<()> {
    let start = parse_clock("start", &args.start)?;
    let total = parse_total(&args.total, args.format.unwrap_or(config.format))?;
    print(writer, "end", reconstruct_end(total, start))
}

pub fn run_start<W: Write>(writer: &mut W, args: &StartArgs, config: &Config) -> Result<()> {
    let end = parse_clock("end", &args.end)?;
    let total = parse_total(&args.total, args.format.unwrap_or(config.format))?;
    print(writer, "start", reconstruct_start(total, end))
}

fn parse_clock(label: &str, raw: &str) -> Result<ClockTime> {
    raw.parse()
        .with_context(|| format!("invalid {label} time: {raw}"))
}

fn parse_total(raw: &str, format: Format) -> Result<ClockDuration> {
    ClockDuration::parse_total(raw, format)
        .with_context(|| format!("invalid {format} total: {raw}"))
}

fn print<W: Write>(writer: &mut W, label: &str, rebuilt: Reconstructed) -> Result<()> {
    writeln!(writer, "{label}: {}", rebuilt.time)?;
    writeln!(writer, "day carry: {:+}", rebuilt.day_carry)?;
    Ok(())
}
