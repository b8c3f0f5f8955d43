//! Working period calculator CLI library.
//!
//! This crate provides the CLI interface over `wp-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use commands::session::SessionAction;
pub use config::Config;
