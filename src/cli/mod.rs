pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

/// Walk every channel's history. Report when each member last spoke.
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Bot token (falls back to the configured environment variable)
    #[arg(long, global = true, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl every accessible channel and export the last-seen report
    Audit {
        /// Where to write the report (default: from config)
        #[arg(long)]
        out: Option<String>,
    },

    /// Decode a platform ID into the moment it was minted
    Decode {
        /// Message, user, or channel ID
        id: String,
    },

    /// Write a starter rollcall.toml in the current directory
    Init,

    /// Show configuration, token presence, and the latest report
    Status,
}
