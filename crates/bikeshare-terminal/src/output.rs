//! Output formatting module for bikeshare
//!
//! This module provides formatters for displaying datasets and statistics:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! Every statistics block ends with the time it took and a separator line of
//! 40 dashes. A report computed over an empty dataset prints [`NO_DATA`]
//! instead of figures.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::stats::StatsReport;
//! use bikeshare_core::types::{Capabilities, City, Dataset};
//! use bikeshare_terminal::output::get_formatter;
//!
//! let dataset = Dataset::new(City::Washington, Capabilities::Basic, vec![]);
//! let report = StatsReport::compute(&dataset);
//!
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_report(&report));
//! ```

use bikeshare_core::stats::{
    DurationStats, StationStats, StatsReport, TimeStats, Timed, UserStats, ValueCount,
};
use bikeshare_core::types::{Dataset, TripRecord, weekday_name};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format, row};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Line printed after every statistics block
pub const SEPARATOR: &str = "----------------------------------------";

/// Message printed in place of a report over zero trips
pub const NO_DATA: &str = "No data available for the selected filters.";

/// Rows shown from each end of the dataset preview
const PREVIEW_ROWS: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for output formatters
///
/// Implementations provide the text for each block of an analysis session;
/// [`OutputFormatter::format_report`] assembles the four statistics blocks in
/// their fixed order.
pub trait OutputFormatter {
    /// Format a preview of the filtered dataset
    fn format_dataset(&self, dataset: &Dataset) -> String;

    /// Format one page of raw rows under the given column names
    fn format_rows(&self, rows: &[&TripRecord], columns: &[&str]) -> String;

    /// Format the most frequent times of travel
    fn format_time_stats(&self, stats: &Timed<Option<TimeStats>>) -> String;

    /// Format the most popular stations and trip
    fn format_station_stats(&self, stats: &Timed<Option<StationStats>>) -> String;

    /// Format total and mean trip duration
    fn format_duration_stats(&self, stats: &Timed<Option<DurationStats>>) -> String;

    /// Format rider statistics
    fn format_user_stats(&self, stats: &Timed<Option<UserStats>>) -> String;

    /// Format all four statistics blocks: time, stations, duration, users
    fn format_report(&self, report: &StatsReport) -> String {
        [
            self.format_time_stats(&report.time),
            self.format_station_stats(&report.stations),
            self.format_duration_stats(&report.duration),
            self.format_user_stats(&report.users),
        ]
        .join("\n")
    }
}

/// Cell values of a record for each of `columns`
///
/// Unknown column names yield an empty cell.
pub fn record_cells(record: &TripRecord, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .map(|column| record_cell(record, column))
        .collect()
}

fn record_cell(record: &TripRecord, column: &str) -> String {
    let demographics = record.demographics();
    match column {
        "Start Time" => record.start_time().format(TIMESTAMP_FORMAT).to_string(),
        "End Time" => record
            .end_time()
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        "Trip Duration" => record.trip_duration().to_string(),
        "Start Station" => record.start_station().to_string(),
        "End Station" => record.end_station().to_string(),
        "User Type" => record.user_type().unwrap_or_default().to_string(),
        "Gender" => demographics
            .and_then(|d| d.gender.clone())
            .unwrap_or_default(),
        "Birth Year" => demographics
            .and_then(|d| d.birth_year)
            .map(|y| y.to_string())
            .unwrap_or_default(),
        "month" => record.month().to_string(),
        "day_of_week" => weekday_name(record.day_of_week()).to_string(),
        "hour" => record.hour().to_string(),
        _ => String::new(),
    }
}

/// Format seconds as `1d 2h 3m 4s`, leaving out leading zero units
pub fn format_duration(total_seconds: u128) -> String {
    let days = total_seconds / 86_400;
    let hours = total_seconds % 86_400 / 3_600;
    let minutes = total_seconds % 3_600 / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Table formatter for human-readable output
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new() -> Self {
        Self
    }

    fn records_table(columns: &[&str], rows: &[&TripRecord], elide_after: Option<usize>) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(Row::new(
            columns
                .iter()
                .map(|c| Cell::new(c).style_spec("b"))
                .collect(),
        ));

        for (idx, record) in rows.iter().enumerate() {
            if elide_after == Some(idx) {
                table.add_row(Row::new(columns.iter().map(|_| Cell::new("...")).collect()));
            }
            table.add_row(Row::new(
                record_cells(record, columns)
                    .iter()
                    .map(|c| Cell::new(c))
                    .collect(),
            ));
        }

        table
    }

    fn counts_table(label: &str, counts: &[ValueCount]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> label, b -> "Count"]);
        for entry in counts {
            table.add_row(row![entry.value, r -> entry.count]);
        }
        table.to_string()
    }

    /// Wrap a block body with its heading, timing line and separator
    fn block<T>(
        heading: &str,
        stats: &Timed<Option<T>>,
        body: impl FnOnce(&T) -> String,
    ) -> String {
        let mut output = format!("\n{}\n\n", heading.bold());
        match &stats.value {
            Some(value) => output.push_str(&body(value)),
            None => {
                output.push_str(NO_DATA);
                output.push('\n');
            }
        }
        output.push_str(&format!(
            "\nThis took {} seconds.\n{}",
            stats.elapsed.as_secs_f64(),
            SEPARATOR
        ));
        output
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_dataset(&self, dataset: &Dataset) -> String {
        let columns = dataset.columns();
        let records = dataset.records();
        let footer = format!("[{} rows x {} columns]", records.len(), columns.len());

        if records.is_empty() {
            return format!("Empty dataset\n{footer}");
        }

        let (shown, elide_after): (Vec<&TripRecord>, Option<usize>) =
            if records.len() > PREVIEW_ROWS * 2 {
                let head = records[..PREVIEW_ROWS].iter();
                let tail = records[records.len() - PREVIEW_ROWS..].iter();
                (head.chain(tail).collect(), Some(PREVIEW_ROWS))
            } else {
                (records.iter().collect(), None)
            };

        let table = Self::records_table(&columns, &shown, elide_after);
        format!("{table}\n{footer}")
    }

    fn format_rows(&self, rows: &[&TripRecord], columns: &[&str]) -> String {
        Self::records_table(columns, rows, None).to_string()
    }

    fn format_time_stats(&self, stats: &Timed<Option<TimeStats>>) -> String {
        Self::block(
            "Calculating The Most Frequent Times of Travel...",
            stats,
            |s| {
                format!(
                    "The most frequent month is: {}\n\
                     The most frequent day is: {}\n\
                     The most frequent hour is: {}\n",
                    s.popular_month,
                    weekday_name(s.popular_day),
                    s.popular_hour
                )
            },
        )
    }

    fn format_station_stats(&self, stats: &Timed<Option<StationStats>>) -> String {
        Self::block(
            "Calculating The Most Popular Stations and Trip...",
            stats,
            |s| {
                format!(
                    "The most frequent start station is: {}\n\
                     The most frequent end station is: {}\n\
                     The most frequent combination of stations is:\
                     \n {} -> {} ({} trips)\n",
                    s.popular_start_station,
                    s.popular_end_station,
                    s.popular_trip.start,
                    s.popular_trip.end,
                    s.popular_trip.count
                )
            },
        )
    }

    fn format_duration_stats(&self, stats: &Timed<Option<DurationStats>>) -> String {
        Self::block("Calculating Trip Duration...", stats, |s| {
            format!(
                "The total travel time is: {} seconds ({})\n\
                 The average travel time is: {:.2} seconds ({})\n",
                s.total_seconds,
                format_duration(s.total_seconds),
                s.mean_seconds,
                format_duration(s.mean_seconds.round() as u128)
            )
        })
    }

    fn format_user_stats(&self, stats: &Timed<Option<UserStats>>) -> String {
        Self::block("Calculating User Stats...", stats, |s| {
            let mut output = Self::counts_table("User Type", &s.user_types);

            if let Some(demographics) = &s.demographics {
                output.push_str(&Self::counts_table("Gender", &demographics.genders));
                match &demographics.birth_years {
                    Some(years) => output.push_str(&format!(
                        "The most frequent birth year is: {}\n\
                         The oldest user was born in: {}\n\
                         The youngest user was born in: {}\n",
                        years.most_common, years.earliest, years.most_recent
                    )),
                    None => output.push_str("No birth year data available.\n"),
                }
            }

            output
        })
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize output: {}", e);
            "{}".to_string()
        })
    }

    fn rows_json(rows: &[&TripRecord], columns: &[&str]) -> Value {
        Value::Array(
            rows.iter()
                .map(|record| {
                    let object: Map<String, Value> = columns
                        .iter()
                        .zip(record_cells(record, columns))
                        .map(|(column, cell)| (column.to_string(), Value::String(cell)))
                        .collect();
                    Value::Object(object)
                })
                .collect(),
        )
    }

    fn timed<T: Serialize>(report: &str, stats: &Timed<Option<T>>) -> String {
        Self::render(&BTreeMap::from([(report, stats)]))
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_dataset(&self, dataset: &Dataset) -> String {
        let columns = dataset.columns();
        let records: Vec<&TripRecord> = dataset.records().iter().take(PREVIEW_ROWS).collect();
        Self::render(&json!({
            "city": dataset.city(),
            "capabilities": dataset.capabilities(),
            "rows": dataset.len(),
            "columns": columns,
            "head": Self::rows_json(&records, &columns),
        }))
    }

    fn format_rows(&self, rows: &[&TripRecord], columns: &[&str]) -> String {
        Self::render(&Self::rows_json(rows, columns))
    }

    fn format_time_stats(&self, stats: &Timed<Option<TimeStats>>) -> String {
        Self::timed("time", stats)
    }

    fn format_station_stats(&self, stats: &Timed<Option<StationStats>>) -> String {
        Self::timed("stations", stats)
    }

    fn format_duration_stats(&self, stats: &Timed<Option<DurationStats>>) -> String {
        Self::timed("duration", stats)
    }

    fn format_user_stats(&self, stats: &Timed<Option<UserStats>>) -> String {
        Self::timed("users", stats)
    }

    fn format_report(&self, report: &StatsReport) -> String {
        Self::render(report)
    }
}

/// Get the appropriate formatter based on output format preference
pub fn get_formatter(json_output: bool) -> Box<dyn OutputFormatter> {
    if json_output {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
