//! Error types for bikeshare
//!
//! This module defines the error types used throughout the bikeshare library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Two families exist:
//! - [`BikeshareError`] for data-source and console failures, which are fatal
//!   for the current run and propagate to the process boundary.
//! - [`ValidationError`] for rejected user input, which callers recover from
//!   by prompting again.
//!
//! # Example
//!
//! ```
//! use bikeshare_core::error::{BikeshareError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to BikeshareError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::City;

/// Main error type for bikeshare operations
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The backing file for a city does not exist
    #[error("No data file for {city} at {}", .path.display())]
    MissingDataFile {
        /// The city whose data was requested
        city: City,
        /// The path that was expected to hold the data
        path: PathBuf,
    },

    /// A required column is absent from the data file
    #[error("Missing column '{column}' in {}", .file.display())]
    MissingColumn {
        /// The file that lacks the column
        file: PathBuf,
        /// The column name
        column: &'static str,
    },

    /// Parse error with file context
    #[error("Parse error in {} at line {line}: {error}", .file.display())]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// 1-based line number, header included
        line: u64,
        /// The error message
        error: String,
    },

    /// The console input stream was closed while waiting for an answer
    #[error("Input closed before a valid answer was given")]
    InputClosed,
}

/// Rejected user input at one of the interactive prompts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("This is invalid city")]
    InvalidCity(String),

    #[error("This is invalid filter")]
    InvalidFilterMode(String),

    #[error("This is invalid month")]
    InvalidMonth(String),

    #[error("This is invalid day")]
    InvalidDay(String),

    #[error("This is invalid input.")]
    InvalidAnswer(String),
}

impl ValidationError {
    /// The raw input that was rejected
    pub fn input(&self) -> &str {
        match self {
            ValidationError::InvalidCity(s)
            | ValidationError::InvalidFilterMode(s)
            | ValidationError::InvalidMonth(s)
            | ValidationError::InvalidDay(s)
            | ValidationError::InvalidAnswer(s) => s,
        }
    }
}

/// Convenience type alias for Results in bikeshare
pub type Result<T> = std::result::Result<T, BikeshareError>;
