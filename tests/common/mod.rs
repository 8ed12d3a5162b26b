//! Common test utilities and helpers for bikeshare tests
//!
//! This module provides a builder for trip records and helpers that write
//! city CSV files into a temporary data directory.

#![allow(dead_code)]

use bikeshare_core::types::{City, Demographics, TripRecord};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use tempfile::TempDir;

/// Builder for creating test TripRecord instances
pub struct TripBuilder {
    start_time: NaiveDateTime,
    start_station: String,
    end_station: String,
    trip_duration: u64,
    user_type: Option<String>,
    demographics: Option<Demographics>,
}

impl TripBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            start_time: at(2017, 1, 2, 8),
            start_station: "Canal St & Adams St".to_string(),
            end_station: "Clinton St & Madison St".to_string(),
            trip_duration: 600,
            user_type: Some("Subscriber".to_string()),
            demographics: None,
        }
    }

    pub fn start(mut self, start_time: NaiveDateTime) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn stations(mut self, start: &str, end: &str) -> Self {
        self.start_station = start.to_string();
        self.end_station = end.to_string();
        self
    }

    pub fn duration(mut self, seconds: u64) -> Self {
        self.trip_duration = seconds;
        self
    }

    pub fn user_type(mut self, user_type: &str) -> Self {
        self.user_type = Some(user_type.to_string());
        self
    }

    pub fn demographics(mut self, gender: &str, birth_year: i32) -> Self {
        self.demographics = Some(Demographics {
            gender: Some(gender.to_string()),
            birth_year: Some(birth_year),
        });
        self
    }

    pub fn build(self) -> TripRecord {
        let record = TripRecord::new(
            self.start_time,
            self.start_station,
            self.end_station,
            self.trip_duration,
            self.user_type,
        );
        match self.demographics {
            Some(demographics) => record.with_demographics(demographics),
            None => record,
        }
    }
}

/// Shorthand for a timestamp at the start of an hour
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 15, 0)
        .unwrap()
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render trips as a city CSV file, with the unnamed index column the real
/// files carry; gender and birth year columns are written when requested
pub fn render_csv(trips: &[TripRecord], with_demographics: bool) -> String {
    let mut csv =
        String::from(",Start Time,End Time,Trip Duration,Start Station,End Station,User Type");
    if with_demographics {
        csv.push_str(",Gender,Birth Year");
    }
    csv.push('\n');

    for (idx, trip) in trips.iter().enumerate() {
        let start = trip.start_time();
        let end = start + chrono::Duration::seconds(trip.trip_duration() as i64);
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}",
            idx,
            start.format("%Y-%m-%d %H:%M:%S"),
            end.format("%Y-%m-%d %H:%M:%S"),
            trip.trip_duration(),
            csv_field(trip.start_station()),
            csv_field(trip.end_station()),
            trip.user_type().unwrap_or_default(),
        ));
        if with_demographics {
            let demographics = trip.demographics().cloned().unwrap_or_default();
            csv.push_str(&format!(
                ",{},{}",
                demographics.gender.unwrap_or_default(),
                demographics
                    .birth_year
                    .map(|y| format!("{y}.0"))
                    .unwrap_or_default(),
            ));
        }
        csv.push('\n');
    }

    csv
}

/// Write a city's CSV file into `dir`
pub fn write_city(dir: &TempDir, city: City, trips: &[TripRecord]) {
    let with_demographics = city != City::Washington;
    fs::write(
        dir.path().join(city.file_name()),
        render_csv(trips, with_demographics),
    )
    .unwrap();
}

/// Trips spread over January (10), February (5) and March (2)
pub fn quarter_trips() -> Vec<TripRecord> {
    let mut trips = Vec::new();
    for (month, count) in [(1, 10), (2, 5), (3, 2)] {
        for i in 0..count {
            trips.push(
                TripBuilder::new()
                    .start(at(2017, month, 1 + i, 7 + i))
                    .duration(60 * (i as u64 + 1))
                    .demographics(if i % 2 == 0 { "Male" } else { "Female" }, 1980 + i as i32)
                    .build(),
            );
        }
    }
    trips
}

/// A data directory with all three cities populated
pub fn populated_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let trips = quarter_trips();
    write_city(&dir, City::Chicago, &trips);
    write_city(&dir, City::NewYorkCity, &trips);
    write_city(&dir, City::Washington, &trips);
    dir
}
