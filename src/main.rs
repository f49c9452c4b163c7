mod catalog;
mod cli;
mod commands;
mod config;
mod reading_list;
mod session;
#[cfg(test)]
mod testing;
mod web;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "bookify=debug,info"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Serve { bind, config } => {
            commands::serve::run(bind.as_deref(), config.as_deref(), cli.quiet).await?;
        }
        Commands::Search {
            query,
            limit,
            json,
            config,
        } => {
            commands::search::run(&query, limit, json, config.as_deref()).await?;
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
        }
    }

    Ok(())
}
