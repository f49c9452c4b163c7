use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bookify")]
#[command(about = "Search a book catalog and keep a reading list in your browser session")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web app
    Serve {
        /// Address to listen on (uses config default if not specified)
        #[arg(long)]
        bind: Option<String>,

        /// Path to config file (default: ~/.config/bookify/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Search the catalog from the terminal
    Search {
        /// Title, author or keyword to search for
        query: String,

        /// Maximum number of results (uses config default if not specified)
        #[arg(long)]
        limit: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Path to config file (default: ~/.config/bookify/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a config file interactively
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}
