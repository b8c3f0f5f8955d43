//! CLI subcommand implementations.

pub mod convert;
pub mod diff;
pub mod reconstruct;
pub mod sanitize;
pub mod session;
