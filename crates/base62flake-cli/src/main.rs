mod cli;
mod commands;

use crate::cli::{Command, CLI};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries only ids; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();
    let mut out = std::io::stdout().lock();

    match &config.command {
        Command::Generate(args) => commands::generate(args, &mut out)?,
        Command::Inspect(args) => commands::inspect(args, &mut out)?,
    }

    Ok(())
}
