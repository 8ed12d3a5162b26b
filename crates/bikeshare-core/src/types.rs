//! Core domain types for bikeshare
//!
//! This module contains the fundamental types used throughout the bikeshare
//! library: the supported cities and months, the trip record with its derived
//! time fields, the loaded dataset and the resolved filter selection.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

/// The seven weekdays in the order they are offered at the prompt
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Full English name of a weekday, e.g. "Monday"
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serialize a weekday by its full English name
pub fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

/// Supported bikeshare cities
///
/// # Examples
/// ```
/// use bikeshare_core::types::City;
///
/// let city = City::from_key("new york city").unwrap();
/// assert_eq!(city, City::NewYorkCity);
/// assert_eq!(city.file_name(), "new_york_city.csv");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// All cities in prompt order
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lower-case key typed by the user
    pub fn key(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Name of the backing CSV file inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Look a city up by its exact key
    pub fn from_key(key: &str) -> Option<City> {
        City::ALL.into_iter().find(|city| city.key() == key)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            City::Chicago => write!(f, "Chicago"),
            City::NewYorkCity => write!(f, "New York City"),
            City::Washington => write!(f, "Washington"),
        }
    }
}

/// Months covered by the bikeshare data (January through June)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 6] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
    ];

    /// 1-based calendar ordinal (jan = 1)
    pub fn ordinal(&self) -> u32 {
        match self {
            Month::Jan => 1,
            Month::Feb => 2,
            Month::Mar => 3,
            Month::Apr => 4,
            Month::May => 5,
            Month::Jun => 6,
        }
    }

    /// Three-letter lower-case code
    pub fn code(&self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
        }
    }

    /// Look a month up by its three-letter code
    pub fn from_code(code: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|month| month.code() == code)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which optional column groups a dataset provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capabilities {
    /// Trip columns only
    Basic,
    /// Trip columns plus gender and birth year
    Demographics,
}

impl Capabilities {
    pub fn has_demographics(&self) -> bool {
        matches!(self, Capabilities::Demographics)
    }
}

/// Rider demographics; individual cells may be blank in the source data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

/// A single trip with its time fields derived from the start time
///
/// The derived month, weekday and hour are computed once by
/// [`TripRecord::new`] and cannot be changed afterwards.
///
/// # Examples
/// ```
/// use bikeshare_core::types::TripRecord;
/// use chrono::{NaiveDate, Weekday};
///
/// let start = NaiveDate::from_ymd_opt(2017, 1, 1)
///     .unwrap()
///     .and_hms_opt(9, 7, 57)
///     .unwrap();
/// let trip = TripRecord::new(start, "Canal St", "Clark St", 776, Some("Subscriber".into()));
/// assert_eq!(trip.month(), 1);
/// assert_eq!(trip.day_of_week(), Weekday::Sun);
/// assert_eq!(trip.hour(), 9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    start_station: String,
    end_station: String,
    trip_duration: u64,
    user_type: Option<String>,
    demographics: Option<Demographics>,
    month: u32,
    day_of_week: Weekday,
    hour: u32,
}

impl TripRecord {
    /// Create a trip, deriving month, weekday and hour from `start_time`
    pub fn new(
        start_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        trip_duration: u64,
        user_type: Option<String>,
    ) -> Self {
        Self {
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            hour: start_time.hour(),
            start_time,
            end_time: None,
            start_station: start_station.into(),
            end_station: end_station.into(),
            trip_duration,
            user_type,
            demographics: None,
        }
    }

    pub fn with_end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_demographics(mut self, demographics: Demographics) -> Self {
        self.demographics = Some(demographics);
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    /// Trip duration in whole seconds
    pub fn trip_duration(&self) -> u64 {
        self.trip_duration
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn demographics(&self) -> Option<&Demographics> {
        self.demographics.as_ref()
    }

    /// Calendar month of the start time, 1-12
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// Hour of the start time, 0-23
    pub fn hour(&self) -> u32 {
        self.hour
    }
}

/// The trips of one city, in file order
#[derive(Debug, Clone)]
pub struct Dataset {
    city: City,
    capabilities: Capabilities,
    has_end_time: bool,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, capabilities: Capabilities, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            capabilities,
            has_end_time: true,
            records,
        }
    }

    /// Record whether the source file carried an `End Time` column
    pub fn with_end_time_column(mut self, has_end_time: bool) -> Self {
        self.has_end_time = has_end_time;
        self
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records matching `predicate`, preserving order
    pub fn retain<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&TripRecord) -> bool,
    {
        self.records.retain(predicate);
        self
    }

    pub fn has_end_time(&self) -> bool {
        self.has_end_time
    }

    /// Column names as shown in the dataset preview, derived columns last
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec!["Start Time"];
        if self.has_end_time {
            columns.push("End Time");
        }
        columns.extend(["Trip Duration", "Start Station", "End Station", "User Type"]);
        if self.capabilities.has_demographics() {
            columns.extend(["Gender", "Birth Year"]);
        }
        columns.extend(["month", "day_of_week", "hour"]);
        columns
    }
}

/// The resolved (city, month, day) selection
///
/// `None` for month or day is the "all" wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub city: City,
    pub month: Option<Month>,
    pub day: Option<Weekday>,
}

impl FilterSpec {
    /// A selection for `city` with no month or day restriction
    pub fn all(city: City) -> Self {
        Self {
            city,
            month: None,
            day: None,
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month.map_or("all", |m| m.code());
        let day = self.day.map_or("all", weekday_name);
        write!(f, "city={}, month={}, day={}", self.city.key(), month, day)
    }
}
