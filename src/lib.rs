//! bikeshare - Explore US bikeshare trip data from the command line
//!
//! This library provides functionality to:
//! - Resolve a city/month/day selection through interactive prompts
//! - Load and filter the city's trip CSV file
//! - Print popular travel times, stations, trip durations and rider statistics
//! - Page through the raw trip rows
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare::{console::StdConsole, session::Explorer};
//! use bikeshare_core::data_loader::DataLoader;
//!
//! fn main() -> bikeshare::Result<()> {
//!     let explorer = Explorer::new(DataLoader::new("./data"));
//!     explorer.run(&mut StdConsole::new())
//! }
//! ```

pub mod cli;
pub mod console;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use bikeshare_core::{BikeshareError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
