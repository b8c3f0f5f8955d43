use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wp_cli::commands::{convert, diff, reconstruct, sanitize, session};
use wp_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Sanitize(args)) => sanitize::run(&mut stdout, args, &config)?,
        Some(Commands::Diff(args)) => diff::run(&mut stdout, args, &config)?,
        Some(Commands::End(args)) => reconstruct::run_end(&mut stdout, args, &config)?,
        Some(Commands::Start(args)) => reconstruct::run_start(&mut stdout, args, &config)?,
        Some(Commands::Convert(args)) => convert::run(&mut stdout, args)?,
        Some(Commands::Session(action)) => session::run(&mut stdout, action, &config)?,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
