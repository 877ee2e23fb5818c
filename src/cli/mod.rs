pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "diario")]
#[command(about = "Daily snapshots of sectioned news feeds", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/diario/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers for fetching feeds
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every section and store today's snapshot
    Load,
    /// List dates that have a stored snapshot, newest first
    Dates,
    /// List the sections stored for a date
    Sections {
        /// Date key, e.g. 2026-02-07 (default: today)
        date: Option<String>,
    },
    /// List the items of one section on a date
    Items {
        /// Date key, e.g. 2026-02-07
        date: String,
        /// Section id, e.g. deportes/futbol
        section: String,
    },
}
