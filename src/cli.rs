//! CLI interface for bikeshare
//!
//! This module defines the command-line flags using clap. All data
//! selections (city, month, day) are made at the interactive prompts; flags
//! only configure where data lives and how results are shown.
//!
//! # Example
//!
//! ```bash
//! # Explore the CSV files in ./data, browsing raw rows in random order
//! bikeshare --data-dir ./data --browse random
//!
//! # Print the statistics as JSON
//! BIKESHARE_DATA_DIR=./data bikeshare --json
//! ```

use bikeshare_core::pager::BrowseMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(name = "bikeshare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// How the raw data viewer picks rows
    #[arg(long, value_enum, default_value = "sequential")]
    pub browse: BrowseArg,

    /// Print dataset previews and statistics as JSON
    #[arg(long)]
    pub json: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Raw row selection policy accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseArg {
    /// Page through rows in file order
    Sequential,
    /// Sample rows at random without repeating
    Random,
}

impl From<BrowseArg> for BrowseMode {
    fn from(arg: BrowseArg) -> Self {
        match arg {
            BrowseArg::Sequential => BrowseMode::Sequential,
            BrowseArg::Random => BrowseMode::Random,
        }
    }
}
