//! CLI argument definitions using clap
//!
//! minisql [OPTIONS] <QUERIES>

use clap::Parser;
use std::path::PathBuf;

/// minisql - run select statements over CSV tables
#[derive(Parser, Debug)]
#[command(name = "minisql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// One or more statements separated by ';'
    pub queries: String,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Metadata file (overrides config)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Directory holding the table files (overrides config)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Minimum log severity: trace, info, warn, error, fatal (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the execution plan of each statement instead of running it
    #[arg(long)]
    pub explain: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
