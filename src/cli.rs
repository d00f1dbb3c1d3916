//! Command-line interface for captiond
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Caption generation and subtitle burn-in service
#[derive(Parser, Debug)]
#[command(
    name = "captiond",
    version,
    about = "Caption generation and subtitle burn-in service"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Listen address override (e.g. 0.0.0.0:3000)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Work directory override for per-request temporary files
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter derived from the quiet/verbose flags.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "captiond=error"
        } else {
            match self.verbose {
                0 => "captiond=info",
                1 => "captiond=debug",
                _ => "captiond=trace",
            }
        }
    }
}
