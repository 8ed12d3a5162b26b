//! Interactive filter resolution
//!
//! Each `resolve_*` function keeps asking until the pure validator from
//! [`bikeshare_core::filters`] accepts the answer. A rejected answer prints
//! the validation message and the question is asked again, without a retry
//! limit. Only a closed input stream ends the loop early.

use crate::console::Console;
use bikeshare_core::error::{BikeshareError, Result, ValidationError};
use bikeshare_core::filters::{FilterMode, parse_city, parse_day, parse_filter_mode, parse_month};
use bikeshare_core::types::{City, FilterSpec, Month};
use chrono::Weekday;
use colored::Colorize;
use tracing::debug;

const CITY_PROMPT: &str =
    "Which city would you like to check: Chicago, New York City, or Washington?";
const FILTER_PROMPT: &str = "Would you like to filter the data by month, day, both, or none?";
const MONTH_PROMPT: &str = "Which month? Jan, Feb, Mar, Apr, May, or Jun.";
const MONTH_RETRY_PROMPT: &str = "Enter one of the following: Jan, Feb, Mar, Apr, May, or Jun.";
const DAY_PROMPT: &str =
    "Which day? Saturday, Sunday, Monday, Tuesday, Wednesday, Thursday, or Friday.";
const DAY_RETRY_PROMPT: &str =
    "Enter either: Saturday, Sunday, Monday, Tuesday, Wednesday, Thursday, or Friday.";

/// Print a rejected answer's message in red
pub fn report_invalid<C: Console>(console: &mut C, error: &ValidationError) -> Result<()> {
    debug!("Rejected input {:?}: {}", error.input(), error);
    console.write_line(&error.to_string().red().to_string())
}

/// Ask `prompt` until `validate` accepts the answer, then ask `retry_prompt`
/// after every rejection
pub fn ask_until_valid<C, T, F>(
    console: &mut C,
    prompt: &str,
    retry_prompt: &str,
    validate: F,
) -> Result<T>
where
    C: Console,
    F: Fn(&str) -> std::result::Result<T, ValidationError>,
{
    let mut question = prompt;
    loop {
        let Some(answer) = console.read_line(question)? else {
            return Err(BikeshareError::InputClosed);
        };

        match validate(&answer) {
            Ok(value) => return Ok(value),
            Err(error) => {
                report_invalid(console, &error)?;
                question = retry_prompt;
            }
        }
    }
}

pub fn resolve_city<C: Console>(console: &mut C) -> Result<City> {
    ask_until_valid(console, CITY_PROMPT, CITY_PROMPT, parse_city)
}

pub fn resolve_filter_mode<C: Console>(console: &mut C) -> Result<FilterMode> {
    ask_until_valid(console, FILTER_PROMPT, FILTER_PROMPT, parse_filter_mode)
}

pub fn resolve_month<C: Console>(console: &mut C) -> Result<Month> {
    ask_until_valid(console, MONTH_PROMPT, MONTH_RETRY_PROMPT, parse_month)
}

pub fn resolve_day<C: Console>(console: &mut C) -> Result<Weekday> {
    ask_until_valid(console, DAY_PROMPT, DAY_RETRY_PROMPT, parse_day)
}

/// Ask for city, filter mode and, depending on the mode, month and day
///
/// Month and day stay at "all" unless the mode asks for them.
pub fn resolve_filters<C: Console>(console: &mut C) -> Result<FilterSpec> {
    let city = resolve_city(console)?;
    let mode = resolve_filter_mode(console)?;

    let mut spec = FilterSpec::all(city);
    if mode.wants_month() {
        spec.month = Some(resolve_month(console)?);
    }
    if mode.wants_day() {
        spec.day = Some(resolve_day(console)?);
    }

    debug!("Resolved filters with mode {}: {}", mode, spec);
    Ok(spec)
}
