//! Filtering module for trip records
//!
//! This module holds the pure validators behind every interactive prompt and
//! the month/day filter applied to a loaded dataset.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::filters::{TripFilter, parse_city, parse_month};
//! use bikeshare_core::types::{City, Month};
//! use chrono::Weekday;
//!
//! assert_eq!(parse_city(" Chicago ").unwrap(), City::Chicago);
//! assert_eq!(parse_month("FEB").unwrap(), Month::Feb);
//!
//! // Trips in February that started on a Monday
//! let filter = TripFilter::new()
//!     .with_month(Month::Feb)
//!     .with_day(Weekday::Mon);
//! ```

use crate::error::ValidationError;
use crate::types::{City, Dataset, FilterSpec, Month, TripRecord, WEEKDAYS, weekday_name};
use chrono::Weekday;
use std::fmt;

/// Which axes the user wants to filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Month,
    Day,
    Both,
    None,
}

impl FilterMode {
    pub fn wants_month(&self) -> bool {
        matches!(self, FilterMode::Month | FilterMode::Both)
    }

    pub fn wants_day(&self) -> bool {
        matches!(self, FilterMode::Day | FilterMode::Both)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Month => write!(f, "month"),
            FilterMode::Day => write!(f, "day"),
            FilterMode::Both => write!(f, "both"),
            FilterMode::None => write!(f, "none"),
        }
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Validate a city answer against the three supported city keys
pub fn parse_city(input: &str) -> Result<City, ValidationError> {
    City::from_key(&normalize(input)).ok_or_else(|| ValidationError::InvalidCity(input.to_string()))
}

/// Validate a filter mode answer: month, day, both or none
pub fn parse_filter_mode(input: &str) -> Result<FilterMode, ValidationError> {
    match normalize(input).as_str() {
        "month" => Ok(FilterMode::Month),
        "day" => Ok(FilterMode::Day),
        "both" => Ok(FilterMode::Both),
        "none" => Ok(FilterMode::None),
        _ => Err(ValidationError::InvalidFilterMode(input.to_string())),
    }
}

/// Validate a three-letter month code, jan through jun
///
/// The "all" wildcard is not accepted here; it is the default when month
/// filtering is skipped altogether.
pub fn parse_month(input: &str) -> Result<Month, ValidationError> {
    Month::from_code(&normalize(input))
        .ok_or_else(|| ValidationError::InvalidMonth(input.to_string()))
}

/// Validate a full weekday name, case-insensitively
pub fn parse_day(input: &str) -> Result<Weekday, ValidationError> {
    let wanted = normalize(input);
    WEEKDAYS
        .into_iter()
        .find(|day| weekday_name(*day).eq_ignore_ascii_case(&wanted))
        .ok_or_else(|| ValidationError::InvalidDay(input.to_string()))
}

/// Validate a yes/no answer (`y`, `yes`, `n`, `no`)
pub fn parse_yes_no(input: &str) -> Result<bool, ValidationError> {
    match normalize(input).as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err(ValidationError::InvalidAnswer(input.to_string())),
    }
}

/// Month and day filter for trip records
///
/// Unset axes do not restrict anything; set axes are combined with AND.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TripFilter {
    /// Month to keep
    pub month: Option<Month>,
    /// Weekday to keep
    pub day: Option<Weekday>,
}

impl TripFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the month filter
    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    /// Set the day filter
    pub fn with_day(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    /// Whether this filter lets every record through
    pub fn is_unrestricted(&self) -> bool {
        self.month.is_none() && self.day.is_none()
    }

    /// Check if a record passes the filter
    pub fn matches(&self, record: &TripRecord) -> bool {
        if let Some(month) = self.month {
            if record.month() != month.ordinal() {
                return false;
            }
        }

        if let Some(day) = self.day {
            if record.day_of_week() != day {
                return false;
            }
        }

        true
    }

    /// Keep only the records of `dataset` that pass the filter
    pub fn apply(&self, dataset: Dataset) -> Dataset {
        if self.is_unrestricted() {
            return dataset;
        }
        dataset.retain(|record| self.matches(record))
    }
}

impl From<&FilterSpec> for TripFilter {
    fn from(spec: &FilterSpec) -> Self {
        Self {
            month: spec.month,
            day: spec.day,
        }
    }
}
