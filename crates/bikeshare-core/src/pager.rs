//! Page-wise access to the raw rows of a dataset
//!
//! [`RowPager`] hands out pages of [`PAGE_SIZE`] rows. With
//! [`BrowseMode::Sequential`] pages follow file order; with
//! [`BrowseMode::Random`] the row order is shuffled once up front, so rows
//! are sampled at random without ever repeating. Either way the pager is
//! exhausted after every row has been shown once.

use crate::types::{Dataset, TripRecord};
use rand::seq::SliceRandom;

/// Rows shown per page
pub const PAGE_SIZE: usize = 5;

/// How the raw data browser picks the rows of each page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowseMode {
    /// Consecutive rows in file order
    #[default]
    Sequential,
    /// Random rows, never repeating one already shown
    Random,
}

/// Iterates over a dataset in pages
pub struct RowPager<'a> {
    dataset: &'a Dataset,
    order: Vec<usize>,
    cursor: usize,
    page_size: usize,
}

impl<'a> RowPager<'a> {
    pub fn new(dataset: &'a Dataset, mode: BrowseMode) -> Self {
        let mut order: Vec<usize> = (0..dataset.len()).collect();
        if mode == BrowseMode::Random {
            order.shuffle(&mut rand::rng());
        }
        Self {
            dataset,
            order,
            cursor: 0,
            page_size: PAGE_SIZE,
        }
    }

    /// Override the page size (at least one row)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Rows not shown yet
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The next page, or `None` once every row has been shown
    pub fn next_page(&mut self) -> Option<Vec<&'a TripRecord>> {
        if self.is_exhausted() {
            return None;
        }

        let end = (self.cursor + self.page_size).min(self.order.len());
        let records = self.dataset.records();
        let page = self.order[self.cursor..end]
            .iter()
            .map(|&idx| &records[idx])
            .collect();
        self.cursor = end;
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Capabilities, City};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn dataset(rows: u64) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = (0..rows)
            .map(|i| TripRecord::new(start, format!("S{i}"), "E", i, None))
            .collect();
        Dataset::new(City::Chicago, Capabilities::Basic, records)
    }

    #[test]
    fn test_sequential_pages() {
        let data = dataset(12);
        let mut pager = RowPager::new(&data, BrowseMode::Sequential);

        let first = pager.next_page().unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].start_station(), "S0");
        assert_eq!(first[4].start_station(), "S4");

        let second = pager.next_page().unwrap();
        assert_eq!(second[0].start_station(), "S5");

        let last = pager.next_page().unwrap();
        assert_eq!(last.len(), 2);
        assert!(pager.next_page().is_none());
    }

    #[test]
    fn test_random_pages_never_repeat() {
        let data = dataset(23);
        let mut pager = RowPager::new(&data, BrowseMode::Random);

        let mut seen = HashSet::new();
        while let Some(page) = pager.next_page() {
            for record in page {
                assert!(seen.insert(record.trip_duration()));
            }
        }
        assert_eq!(seen.len(), 23);
    }

    #[test]
    fn test_empty_dataset() {
        let data = dataset(0);
        let mut pager = RowPager::new(&data, BrowseMode::Sequential);
        assert!(pager.is_exhausted());
        assert!(pager.next_page().is_none());
    }

    #[test]
    fn test_custom_page_size() {
        let data = dataset(4);
        let mut pager = RowPager::new(&data, BrowseMode::Sequential).with_page_size(0);
        assert_eq!(pager.next_page().unwrap().len(), 1);
        assert_eq!(pager.remaining(), 3);
    }
}
