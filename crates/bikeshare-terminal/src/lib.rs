//! Terminal output formatting for bikeshare
//!
//! This crate provides table and JSON output formatters for dataset
//! previews, raw row pages and the statistics reports.

pub mod output;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
