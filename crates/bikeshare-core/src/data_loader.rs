//! Data loader module for reading per-city trip CSV files
//!
//! Each supported city is backed by one CSV file inside a data directory:
//!
//! | city          | file                |
//! |---------------|---------------------|
//! | Chicago       | `chicago.csv`       |
//! | New York City | `new_york_city.csv` |
//! | Washington    | `washington.csv`    |
//!
//! Required columns are `Start Time`, `Start Station`, `End Station`,
//! `Trip Duration` and `User Type`. `End Time`, `Gender` and `Birth Year` are
//! optional; a file carrying both `Gender` and `Birth Year` yields a dataset
//! with [`Capabilities::Demographics`]. Any other column is ignored.
//!
//! # Examples
//!
//! ```no_run
//! use bikeshare_core::data_loader::DataLoader;
//! use bikeshare_core::types::{City, FilterSpec, Month};
//!
//! # fn example() -> bikeshare_core::Result<()> {
//! let loader = DataLoader::new("./data");
//! let spec = FilterSpec {
//!     city: City::Chicago,
//!     month: Some(Month::Mar),
//!     day: None,
//! };
//! let dataset = loader.load(&spec)?;
//! println!("{} trips in March", dataset.len());
//! # Ok(())
//! # }
//! ```

use crate::error::{BikeshareError, Result};
use crate::filters::TripFilter;
use crate::types::{Capabilities, City, Dataset, Demographics, FilterSpec, TripRecord};
use chrono::NaiveDateTime;
use csv::StringRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const PROGRESS_STEP: u64 = 10_000;

/// Data loader for the per-city CSV files
///
/// The city to file mapping is fixed when the loader is constructed.
pub struct DataLoader {
    sources: HashMap<City, PathBuf>,
    show_progress: bool,
}

impl DataLoader {
    /// Create a loader resolving every city's file inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let sources = City::ALL
            .into_iter()
            .map(|city| (city, data_dir.join(city.file_name())))
            .collect();

        Self {
            sources,
            show_progress: false,
        }
    }

    /// Show a spinner while reading files
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Path of the CSV file backing `city`
    pub fn path_for(&self, city: City) -> &Path {
        &self.sources[&city]
    }

    /// Load a city's dataset and apply the month/day selection of `spec`
    pub fn load(&self, spec: &FilterSpec) -> Result<Dataset> {
        let dataset = self.load_city(spec.city)?;
        let total = dataset.len();
        let filtered = TripFilter::from(spec).apply(dataset);

        if filtered.is_empty() && total > 0 {
            warn!("No trips match {}", spec);
        } else {
            info!("Kept {} of {} trips for {}", filtered.len(), total, spec);
        }
        Ok(filtered)
    }

    /// Read every trip of `city`, unfiltered
    ///
    /// # Errors
    ///
    /// Returns [`BikeshareError::MissingDataFile`] if the file does not exist,
    /// [`BikeshareError::MissingColumn`] if a required column is absent and
    /// [`BikeshareError::Parse`] for a cell that cannot be interpreted.
    pub fn load_city(&self, city: City) -> Result<Dataset> {
        let path = self.path_for(city);
        if !path.is_file() {
            return Err(BikeshareError::MissingDataFile {
                city,
                path: path.to_path_buf(),
            });
        }

        debug!("Loading {} trips from {}", city, path.display());

        let progress = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} trips read")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!("Loading {city} data"));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        });

        let mut reader = csv::Reader::from_path(path)?;
        let columns = ColumnIndex::from_headers(reader.headers()?, path)?;
        let capabilities = columns.capabilities();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            records.push(columns.parse_row(&row, path)?);

            if let Some(pb) = &progress {
                if records.len() as u64 % PROGRESS_STEP == 0 {
                    pb.set_position(records.len() as u64);
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        debug!(
            "Loaded {} trips for {} ({:?})",
            records.len(),
            city,
            capabilities
        );
        Ok(Dataset::new(city, capabilities, records)
            .with_end_time_column(columns.end_time.is_some()))
    }
}

/// Positions of the known columns in a file's header
#[derive(Debug)]
struct ColumnIndex {
    start_time: usize,
    end_time: Option<usize>,
    start_station: usize,
    end_station: usize,
    trip_duration: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, file: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| BikeshareError::MissingColumn {
                file: file.to_path_buf(),
                column: name,
            })
        };

        Ok(Self {
            start_time: require("Start Time")?,
            end_time: find("End Time"),
            start_station: require("Start Station")?,
            end_station: require("End Station")?,
            trip_duration: require("Trip Duration")?,
            user_type: require("User Type")?,
            gender: find("Gender"),
            birth_year: find("Birth Year"),
        })
    }

    fn capabilities(&self) -> Capabilities {
        if self.gender.is_some() && self.birth_year.is_some() {
            Capabilities::Demographics
        } else {
            Capabilities::Basic
        }
    }

    fn parse_row(&self, row: &StringRecord, file: &Path) -> Result<TripRecord> {
        let line = row.position().map_or(0, |p| p.line());
        let parse_error = |error: String| BikeshareError::Parse {
            file: file.to_path_buf(),
            line,
            error,
        };
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let start_time = parse_timestamp(cell(self.start_time))
            .ok_or_else(|| parse_error(format!("invalid start time '{}'", cell(self.start_time))))?;
        let trip_duration = parse_duration(cell(self.trip_duration)).ok_or_else(|| {
            parse_error(format!(
                "invalid trip duration '{}'",
                cell(self.trip_duration)
            ))
        })?;

        let mut record = TripRecord::new(
            start_time,
            cell(self.start_station),
            cell(self.end_station),
            trip_duration,
            non_blank(cell(self.user_type)),
        );

        if let Some(idx) = self.end_time {
            let raw = cell(idx);
            if !raw.is_empty() {
                let end_time = parse_timestamp(raw)
                    .ok_or_else(|| parse_error(format!("invalid end time '{raw}'")))?;
                record = record.with_end_time(end_time);
            }
        }

        if let (Some(gender_idx), Some(year_idx)) = (self.gender, self.birth_year) {
            let raw_year = cell(year_idx);
            let birth_year = if raw_year.is_empty() {
                None
            } else {
                Some(
                    parse_year(raw_year)
                        .ok_or_else(|| parse_error(format!("invalid birth year '{raw_year}'")))?,
                )
            };
            record = record.with_demographics(Demographics {
                gender: non_blank(cell(gender_idx)),
                birth_year,
            });
        }

        Ok(record)
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a start/end timestamp such as `2017-01-01 00:07:57`
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Parse a duration in seconds; decimal values are truncated
///
/// Decimal values that do not fit in a `u64` are rejected rather than
/// clamped.
pub fn parse_duration(value: &str) -> Option<u64> {
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }
    // u64::MAX as f64 rounds up to 2^64, which is already out of range
    match value.parse::<f64>() {
        Ok(seconds) if (0.0..u64::MAX as f64).contains(&seconds) => Some(seconds as u64),
        _ => None,
    }
}

fn parse_year(value: &str) -> Option<i32> {
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    match value.parse::<f64>() {
        Ok(year) if year.is_finite() && year.fract() == 0.0 => Some(year as i32),
        _ => None,
    }
}
