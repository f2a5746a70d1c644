//! CLI module for Agora
//!
//! Provides command-line interface parsing for the agora-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Agora - Multi-Source Research Team
///
/// Sends one research question to community, technical, scholarly and
/// microblog researchers and synthesizes a single report.
#[derive(Parser, Debug)]
#[command(
    name = "agora-server",
    version,
    about = "Agora - Multi-Source Research Team",
    long_about = "Runs a team of source-bound research workers over one question and\n\
                  synthesizes a six-section markdown report.\n\n\
                  Run without arguments to start the HTTP server.",
    after_help = "EXAMPLES:\n    \
                  agora-server                          # Start the server\n    \
                  agora-server ask \"Impact of AI on jobs\" # Research from the terminal\n    \
                  agora-server roster                   # Show the research workers\n    \
                  agora-server --config my.toml serve   # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "agora.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Research a question and print the report
    Ask {
        /// The research question
        query: String,

        /// Deadline in seconds (overrides research.timeout_secs)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// List the research workers
    Roster,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
