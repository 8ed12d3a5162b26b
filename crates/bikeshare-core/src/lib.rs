//! Core types, loading, filtering and statistics for bikeshare
//!
//! This crate provides the domain types, error handling, the per-city CSV
//! loader, the month/day filters, the statistics reports and the raw row
//! pager used by the `bikeshare` binary.

pub mod data_loader;
pub mod error;
pub mod filters;
pub mod pager;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{BikeshareError, Result, ValidationError};
pub use types::{Capabilities, City, Dataset, Demographics, FilterSpec, Month, TripRecord};
