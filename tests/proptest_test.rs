//! Property-based tests for bikeshare using proptest

use bikeshare_core::{
    filters::{TripFilter, parse_day, parse_month, parse_yes_no},
    pager::{BrowseMode, RowPager},
    stats::{self, mode, value_counts},
    types::{Capabilities, City, Dataset, Month, TripRecord, WEEKDAYS, weekday_name},
};
use chrono::{DateTime, Datelike, Timelike, Weekday};
use proptest::prelude::*;
use std::collections::HashSet;

// Strategies for generating test data

prop_compose! {
    fn arb_start_time()(
        secs in 1483228800i64..1498867200i64, // 2017-01-01 to 2017-07-01
    ) -> chrono::NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }
}

prop_compose! {
    fn arb_station()(
        name in prop::sample::select(vec![
            "Canal St & Adams St",
            "Clinton St & Madison St",
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Michigan Ave & Oak St",
        ])
    ) -> String {
        name.to_string()
    }
}

prop_compose! {
    fn arb_trip()(
        start_time in arb_start_time(),
        start_station in arb_station(),
        end_station in arb_station(),
        duration in 60u64..86_400,
        user_type in prop::option::of(prop::sample::select(vec!["Subscriber", "Customer"])),
    ) -> TripRecord {
        TripRecord::new(
            start_time,
            start_station,
            end_station,
            duration,
            user_type.map(str::to_string),
        )
    }
}

prop_compose! {
    fn arb_dataset()(trips in prop::collection::vec(arb_trip(), 0..60)) -> Dataset {
        Dataset::new(City::Washington, Capabilities::Basic, trips)
    }
}

fn arb_month() -> impl Strategy<Value = Month> {
    prop::sample::select(Month::ALL.to_vec())
}

fn arb_weekday() -> impl Strategy<Value = Weekday> {
    prop::sample::select(WEEKDAYS.to_vec())
}

proptest! {
    #[test]
    fn test_derived_fields_match_start_time(trip in arb_trip()) {
        let start = trip.start_time();
        prop_assert_eq!(trip.month(), start.month());
        prop_assert_eq!(trip.day_of_week(), start.weekday());
        prop_assert_eq!(trip.hour(), start.hour());
        prop_assert!((1..=12).contains(&trip.month()));
        prop_assert!(trip.hour() < 24);
    }

    #[test]
    fn test_filter_is_idempotent(
        dataset in arb_dataset(),
        month in prop::option::of(arb_month()),
        day in prop::option::of(arb_weekday()),
    ) {
        let mut filter = TripFilter::new();
        if let Some(month) = month {
            filter = filter.with_month(month);
        }
        if let Some(day) = day {
            filter = filter.with_day(day);
        }

        let once = filter.apply(dataset);
        let twice = filter.apply(once.clone());
        prop_assert_eq!(once.records(), twice.records());
    }

    #[test]
    fn test_filter_axes_commute(
        dataset in arb_dataset(),
        month in arb_month(),
        day in arb_weekday(),
    ) {
        let by_month = TripFilter::new().with_month(month);
        let by_day = TripFilter::new().with_day(day);
        let both = TripFilter::new().with_month(month).with_day(day);

        let month_then_day = by_day.apply(by_month.apply(dataset.clone()));
        let day_then_month = by_month.apply(by_day.apply(dataset.clone()));
        let combined = both.apply(dataset);

        prop_assert_eq!(month_then_day.records(), day_then_month.records());
        prop_assert_eq!(month_then_day.records(), combined.records());
    }

    #[test]
    fn test_filtered_rows_all_match(
        dataset in arb_dataset(),
        month in arb_month(),
        day in arb_weekday(),
    ) {
        let total = dataset.len();
        let filtered = TripFilter::new().with_month(month).with_day(day).apply(dataset);

        prop_assert!(filtered.len() <= total);
        for record in filtered.records() {
            prop_assert_eq!(record.month(), month.ordinal());
            prop_assert_eq!(record.day_of_week(), day);
        }
    }

    #[test]
    fn test_mode_has_maximal_count(values in prop::collection::vec(0u8..6, 1..80)) {
        let counts = value_counts(values.iter().copied());
        let winner = mode(values.iter().copied()).unwrap();

        let best = counts.iter().map(|(_, count)| *count).max().unwrap();
        prop_assert_eq!(counts[0], (winner, best));

        // the winner is the first value to appear among those tied at the top
        let tied: HashSet<u8> = counts
            .iter()
            .filter(|(_, count)| *count == best)
            .map(|(value, _)| *value)
            .collect();
        let first_tied = values.iter().find(|v| tied.contains(*v)).copied();
        prop_assert_eq!(Some(winner), first_tied);
    }

    #[test]
    fn test_value_counts_sum_to_len(values in prop::collection::vec("[a-d]", 0..50)) {
        let counts = value_counts(values.iter().cloned());
        let total: usize = counts.iter().map(|(_, count)| count).sum();
        prop_assert_eq!(total, values.len());
        prop_assert!(counts.windows(2).all(|pair| pair[0].1 >= pair[1].1));
    }

    #[test]
    fn test_duration_mean_within_bounds(dataset in arb_dataset()) {
        match stats::duration_stats(&dataset) {
            Some(duration) => {
                let min = dataset.records().iter().map(|r| r.trip_duration()).min().unwrap();
                let max = dataset.records().iter().map(|r| r.trip_duration()).max().unwrap();
                prop_assert_eq!(duration.trip_count, dataset.len());
                prop_assert!(duration.mean_seconds >= min as f64);
                prop_assert!(duration.mean_seconds <= max as f64);
            }
            None => prop_assert!(dataset.is_empty()),
        }
    }

    #[test]
    fn test_pager_visits_every_row_once(
        dataset in arb_dataset(),
        random in any::<bool>(),
        page_size in 1usize..8,
    ) {
        let mode = if random { BrowseMode::Random } else { BrowseMode::Sequential };
        let mut pager = RowPager::new(&dataset, mode).with_page_size(page_size);

        let mut seen = HashSet::new();
        while let Some(page) = pager.next_page() {
            prop_assert!(!page.is_empty() && page.len() <= page_size);
            for record in page {
                prop_assert!(seen.insert(record as *const TripRecord));
            }
        }
        prop_assert_eq!(seen.len(), dataset.len());
        prop_assert!(pager.next_page().is_none());
    }

    #[test]
    fn test_month_codes_accept_any_case(month in arb_month(), upper in any::<bool>()) {
        let code = month.code();
        let input = if upper { format!("  {}  ", code.to_uppercase()) } else { code.to_string() };
        prop_assert_eq!(parse_month(&input).unwrap(), month);
    }

    #[test]
    fn test_day_names_accept_any_case(day in arb_weekday()) {
        let name = weekday_name(day);
        prop_assert_eq!(parse_day(name).unwrap(), day);
        prop_assert_eq!(parse_day(&name.to_uppercase()).unwrap(), day);
        prop_assert!(parse_day(&name[..3]).is_err());
    }

    #[test]
    fn test_yes_no_rejects_other_words(word in "[a-z]{3,8}") {
        prop_assume!(word != "yes");
        prop_assert!(parse_yes_no(&word).is_err());
    }
}
