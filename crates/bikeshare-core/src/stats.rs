//! Statistics over a filtered dataset
//!
//! Four independent reports are computed from the same read-only [`Dataset`]:
//!
//! - [`TimeStats`]: most frequent month, weekday and start hour
//! - [`StationStats`]: most frequent start station, end station and trip
//! - [`DurationStats`]: total and mean trip duration
//! - [`UserStats`]: counts per user type, plus gender and birth year figures
//!   when the dataset has demographic columns
//!
//! Each report returns `None` for an empty dataset. [`StatsReport::compute`]
//! runs all four on the rayon pool and times each one separately.
//!
//! # Tie breaking
//!
//! [`mode`] returns the value seen first among those with the highest count.
//! The most frequent station pair is chosen from pairs grouped in sorted
//! (start, end) order; the first group in that order wins a tie.
//!
//! # Examples
//!
//! ```
//! use bikeshare_core::stats::mode;
//!
//! assert_eq!(mode(["b", "a", "a", "b", "c"]), Some("b"));
//! assert_eq!(mode(Vec::<u32>::new()), None);
//! ```

use crate::types::{Dataset, serialize_weekday};
use chrono::Weekday;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::debug;

/// Most frequent value, ties going to the value encountered first
pub fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

/// Occurrences per distinct value, most frequent first
///
/// Values with equal counts keep the order in which they were first seen.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut positions: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match positions.get(&value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // sort_by is stable, so first-seen order survives among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent times of travel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Calendar month, 1-12
    pub popular_month: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub popular_day: Weekday,
    /// Start hour, 0-23
    pub popular_hour: u32,
}

/// A (start, end) station combination with its trip count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
    pub count: usize,
}

/// Most popular stations and trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub popular_start_station: String,
    pub popular_end_station: String,
    pub popular_trip: StationPair,
}

/// Total and average trip duration in seconds
///
/// The total is kept as `u128` so that summing any number of `u64`
/// durations cannot overflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_seconds: u128,
    pub mean_seconds: f64,
}

/// A distinct column value and how often it occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Birth year figures over the non-blank birth years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub most_common: i32,
    pub earliest: i32,
    pub most_recent: i32,
}

/// Figures only available for datasets with demographic columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemographicStats {
    pub genders: Vec<ValueCount>,
    /// `None` when every birth year cell is blank
    pub birth_years: Option<BirthYearStats>,
}

/// Rider statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<ValueCount>,
    /// `None` for datasets without gender and birth year columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demographics: Option<DemographicStats>,
}

fn to_value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<ValueCount> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Most frequent month, weekday and hour
pub fn time_stats(dataset: &Dataset) -> Option<TimeStats> {
    let records = dataset.records();
    Some(TimeStats {
        popular_month: mode(records.iter().map(|r| r.month()))?,
        popular_day: mode(records.iter().map(|r| r.day_of_week()))?,
        popular_hour: mode(records.iter().map(|r| r.hour()))?,
    })
}

/// Most frequent start station, end station and trip
pub fn station_stats(dataset: &Dataset) -> Option<StationStats> {
    let records = dataset.records();
    let popular_start_station = mode(records.iter().map(|r| r.start_station()))?.to_string();
    let popular_end_station = mode(records.iter().map(|r| r.end_station()))?.to_string();

    let mut pairs: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for record in records {
        *pairs
            .entry((record.start_station(), record.end_station()))
            .or_insert(0) += 1;
    }

    let mut best: Option<((&str, &str), usize)> = None;
    for (pair, count) in pairs {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((pair, count));
        }
    }
    let ((start, end), count) = best?;

    Some(StationStats {
        popular_start_station,
        popular_end_station,
        popular_trip: StationPair {
            start: start.to_string(),
            end: end.to_string(),
            count,
        },
    })
}

/// Total and mean trip duration
pub fn duration_stats(dataset: &Dataset) -> Option<DurationStats> {
    if dataset.is_empty() {
        return None;
    }

    let total_seconds: u128 = dataset
        .records()
        .iter()
        .map(|r| u128::from(r.trip_duration()))
        .sum();
    let trip_count = dataset.len();
    Some(DurationStats {
        trip_count,
        total_seconds,
        mean_seconds: total_seconds as f64 / trip_count as f64,
    })
}

/// Counts per user type, plus demographics where the dataset has them
pub fn user_stats(dataset: &Dataset) -> Option<UserStats> {
    if dataset.is_empty() {
        return None;
    }

    let records = dataset.records();
    let user_types = to_value_counts(records.iter().filter_map(|r| r.user_type()));

    let demographics = if dataset.capabilities().has_demographics() {
        let people = records.iter().filter_map(|r| r.demographics());
        let genders = to_value_counts(people.clone().filter_map(|d| d.gender.as_deref()));

        let years: Vec<i32> = people.filter_map(|d| d.birth_year).collect();
        let birth_years = match (
            mode(years.iter().copied()),
            years.iter().min(),
            years.iter().max(),
        ) {
            (Some(most_common), Some(&earliest), Some(&most_recent)) => Some(BirthYearStats {
                most_common,
                earliest,
                most_recent,
            }),
            _ => None,
        };

        Some(DemographicStats {
            genders,
            birth_years,
        })
    } else {
        debug!(
            "{} data has no demographic columns, skipping gender and birth year",
            dataset.city()
        );
        None
    };

    Some(UserStats {
        user_types,
        demographics,
    })
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// A computed value together with the wall-clock time it took
#[derive(Debug, Clone, Serialize)]
pub struct Timed<T> {
    pub value: T,
    #[serde(rename = "elapsed_seconds", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Run `f` and record how long it took
    pub fn measure(f: impl FnOnce() -> T) -> Self {
        let start = Instant::now();
        let value = f();
        Self {
            value,
            elapsed: start.elapsed(),
        }
    }
}

/// All four reports for one dataset
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub time: Timed<Option<TimeStats>>,
    pub stations: Timed<Option<StationStats>>,
    pub duration: Timed<Option<DurationStats>>,
    pub users: Timed<Option<UserStats>>,
}

impl StatsReport {
    /// Compute every report; the reports only read the dataset, so they run
    /// concurrently
    pub fn compute(dataset: &Dataset) -> Self {
        let ((time, stations), (duration, users)) = rayon::join(
            || {
                rayon::join(
                    || Timed::measure(|| time_stats(dataset)),
                    || Timed::measure(|| station_stats(dataset)),
                )
            },
            || {
                rayon::join(
                    || Timed::measure(|| duration_stats(dataset)),
                    || Timed::measure(|| user_stats(dataset)),
                )
            },
        );

        debug!("Computed statistics over {} trips", dataset.len());
        Self {
            time,
            stations,
            duration,
            users,
        }
    }
}
