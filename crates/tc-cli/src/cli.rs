//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tipee timeclock pusher.
///
/// Merges a day's back-to-back time entries into minimal spans and reports
/// each span to a Tipee instance as a check-in/check-out pair.
#[derive(Debug, Parser)]
#[command(name = "tc", version, about, long_about = None)]
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
    /// Merge and push entries from a file to the timeclock.
    Push {
        /// Path to a JSON file of entries:
        /// [{"id", "date", "start", "hours"}, ...]
        file: PathBuf,
    },

    /// List the selectable projects and activities.
    Projects,
}
