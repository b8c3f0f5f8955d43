//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::convert::ConvertArgs;
use crate::commands::diff::DiffArgs;
use crate::commands::reconstruct::{EndArgs, StartArgs};
use crate::commands::sanitize::SanitizeArgs;
use crate::commands::session::SessionAction;

/// Working period calculator.
///
/// Type a start, an end or a total in loose shorthand and get the other two
/// back, including rollover onto the next day.
#[derive(Debug, Parser)]
#[command(name = "wp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize a typed time into its canonical spelling.
    Sanitize(SanitizeArgs),

    /// Total between a start and an end time.
    Diff(DiffArgs),

    /// End time from a start and a total.
    End(EndArgs),

    /// Start time from an end and a total.
    Start(StartArgs),

    /// Convert between clock time and decimal hours.
    Convert(ConvertArgs),

    /// Edit the saved working period.
    #[command(subcommand)]
    Session(SessionAction),
}
