//! Command-line interface definitions.
//!
//! Without a subcommand the full pipeline runs (scrape, then render).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # scrape the live page and render every day
/// ax_schedule
///
/// # scrape a saved copy of the page only
/// ax_schedule scrape --from-file ax_schedule.html
///
/// # re-render from existing CSV stores, with a JSON snapshot
/// ax_schedule --config ax2024.yaml render --snapshot
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML config file (defaults are built in)
    #[arg(short, long, global = true, env = "AX_SCHEDULE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the directory receiving dayN.html
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Override the directory holding the CSV stores
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch and extract the schedule (and activity listings) into CSV
    Scrape {
        /// Read the main schedule from a saved HTML file instead of fetching it
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Render per-day pages from the CSV stores
    Render {
        /// Also write schedule.json next to the pages
        #[arg(long)]
        snapshot: bool,
    },
    /// Scrape, then render
    Run {
        #[arg(long)]
        from_file: Option<PathBuf>,
        #[arg(long)]
        snapshot: bool,
    },
}

impl Cli {
    /// The subcommand to run; `run` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run {
            from_file: None,
            snapshot: false,
        })
    }
}
