//! Convert command for switching between clock time and decimal hours.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use wp_core::{ClockDuration, DecimalHours, Format, to_clock, to_decimal};

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Value to convert, e.g. `9:45` or `9,75`.
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Target representation.
    #[arg(long, default_value = "decimal")]
    pub to: Format,
}

pub fn run<W: Write>(writer: &mut W, args: &ConvertArgs) -> Result<()> {
    let converted = match args.to {
        Format::Decimal => {
            let span: ClockDuration = args
                .value
                .parse()
                .with_context(|| format!("invalid clock value: {}", args.value))?;
            to_decimal(span).to_string()
        }
        Format::Time => {
            let decimal: DecimalHours = args
                .value
                .parse()
                .with_context(|| format!("invalid decimal value: {}", args.value))?;
            to_clock(decimal).to_string()
        }
    };

    writeln!(writer, "{converted}")?;
    Ok(())
}
