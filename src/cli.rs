//! Command-line interface.
//!
//! `--server` and `--step` can also come from the environment, which is
//! handy when the viewer is started from a service wrapper next to the agent.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Highest `--start` accepted; keeps `start + step` well inside `u64`.
pub const MAX_START: u64 = u32::MAX as u64;

#[derive(Parser, Debug)]
#[command(name = "resultview")]
#[command(author, version, about = "Browse speedtest results collected by a Neubot agent")]
pub struct Cli {
    // =========================================================================
    // Agent
    // =========================================================================

    /// Base URL of the agent serving /api/results
    #[arg(long, env = "RESULTVIEW_SERVER", default_value = "http://127.0.0.1:9774", help_heading = "Agent")]
    pub server: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", help_heading = "Agent")]
    pub timeout: u64,

    // =========================================================================
    // Paging
    // =========================================================================

    /// Number of results per page
    #[arg(long, env = "RESULTVIEW_STEP", default_value = "10",
          value_parser = clap::value_parser!(u64).range(1..=1_000_000), help_heading = "Paging")]
    pub step: u64,

    /// Index of the first result to show
    #[arg(long, default_value = "0",
          value_parser = clap::value_parser!(u64).range(..=MAX_START), help_heading = "Paging")]
    pub start: u64,

    /// Print one page to stdout and exit instead of opening the viewer
    #[arg(long, default_value = "false", help_heading = "Paging")]
    pub print: bool,

    // =========================================================================
    // Logging
    // =========================================================================

    /// Log file (the terminal is taken by the viewer)
    #[arg(long, env = "RESULTVIEW_LOG", help_heading = "Logging")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `resultview=trace`; RUST_LOG wins if set
    #[arg(long, default_value = "info", help_heading = "Logging")]
    pub log_level: String,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("resultview.log"))
    }
}
