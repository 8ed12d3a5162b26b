//! One interactive analysis session and the restart loop around it
//!
//! A session resolves the filters, loads and filters the city's trips, prints
//! a preview of the dataset followed by the four statistics blocks, and then
//! offers the raw data viewer. The dataset is dropped when the session ends;
//! nothing is cached between restarts.

use crate::console::Console;
use crate::prompt::{report_invalid, resolve_filters};
use bikeshare_core::data_loader::DataLoader;
use bikeshare_core::error::Result;
use bikeshare_core::filters::parse_yes_no;
use bikeshare_core::pager::{BrowseMode, PAGE_SIZE, RowPager};
use bikeshare_core::stats::StatsReport;
use bikeshare_core::types::Dataset;
use bikeshare_terminal::output::{OutputFormatter, SEPARATOR, TableFormatter};
use tracing::info;

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const RESTART_PROMPT: &str = "\nWould you like to restart? Enter yes or no.";
const NO_MORE_ROWS: &str = "No more rows to display.";

/// Drives analysis sessions against a console
pub struct Explorer {
    loader: DataLoader,
    formatter: Box<dyn OutputFormatter>,
    browse_mode: BrowseMode,
}

impl Explorer {
    /// Create an explorer with table output and sequential browsing
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader,
            formatter: Box::new(TableFormatter::new()),
            browse_mode: BrowseMode::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn OutputFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_browse_mode(mut self, browse_mode: BrowseMode) -> Self {
        self.browse_mode = browse_mode;
        self
    }

    /// Run sessions until the user declines to restart
    pub fn run<C: Console>(&self, console: &mut C) -> Result<()> {
        let mut sessions = 0u32;
        loop {
            sessions += 1;
            info!("Starting session {}", sessions);
            self.run_session(console)?;

            let Some(answer) = console.read_line(RESTART_PROMPT)? else {
                break;
            };
            if !answer.trim().eq_ignore_ascii_case("yes") {
                break;
            }
        }

        info!("Finished after {} session(s)", sessions);
        Ok(())
    }

    /// Run a single session, without the restart question
    pub fn run_session<C: Console>(&self, console: &mut C) -> Result<()> {
        let spec = resolve_filters(console)?;
        console.write_line(GREETING)?;
        console.write_line(SEPARATOR)?;

        info!("Analyzing {}", spec);
        let dataset = self.loader.load(&spec)?;
        console.write_line(&self.formatter.format_dataset(&dataset))?;

        let report = StatsReport::compute(&dataset);
        console.write_line(&self.formatter.format_report(&report))?;

        self.browse_raw_data(console, &dataset)
    }

    /// Show pages of raw rows for as long as the user asks for more
    ///
    /// A closed input stream ends browsing like a "no" would.
    pub fn browse_raw_data<C: Console>(&self, console: &mut C, dataset: &Dataset) -> Result<()> {
        let first_prompt = format!("Would you like to show {PAGE_SIZE} rows of the raw data?");
        let next_prompt = format!("Would you like to see other {PAGE_SIZE} rows?");
        let retry_prompt = "Please choose either 'y' for Yes or 'n' for No";

        let columns = dataset.columns();
        let mut pager = RowPager::new(dataset, self.browse_mode);
        let mut question = first_prompt.as_str();

        loop {
            let Some(answer) = console.read_line(question)? else {
                return Ok(());
            };

            match parse_yes_no(&answer) {
                Ok(true) => match pager.next_page() {
                    Some(page) => {
                        console.write_line(&self.formatter.format_rows(&page, &columns))?;
                        question = next_prompt.as_str();
                    }
                    None => {
                        console.write_line(NO_MORE_ROWS)?;
                        return Ok(());
                    }
                },
                Ok(false) => return Ok(()),
                Err(error) => {
                    report_invalid(console, &error)?;
                    question = retry_prompt;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use bikeshare_core::types::{Capabilities, City, TripRecord};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn dataset(rows: u32) -> Dataset {
        let records = (1..=rows)
            .map(|i| {
                let at = NaiveDate::from_ymd_opt(2017, 1, i)
                    .unwrap()
                    .and_hms_opt(7, 0, 0)
                    .unwrap();
                TripRecord::new(at, format!("Dock {i}"), "Home", 60, None)
            })
            .collect();
        Dataset::new(City::Washington, Capabilities::Basic, records)
    }

    fn explorer() -> (TempDir, Explorer) {
        let dir = TempDir::new().unwrap();
        let explorer = Explorer::new(DataLoader::new(dir.path()));
        (dir, explorer)
    }

    #[test]
    fn test_browse_pages_until_no() {
        let (_dir, explorer) = explorer();
        let data = dataset(12);
        let mut console = ScriptedConsole::new(["y", "yes", "n"]);

        explorer.browse_raw_data(&mut console, &data).unwrap();
        let output = console.output();
        assert!(output.contains("Dock 1 "));
        assert!(output.contains("Dock 10"));
        assert!(!output.contains("Dock 11"));
        assert_eq!(console.remaining(), 0);
    }

    #[test]
    fn test_browse_invalid_answer_reprompts() {
        let (_dir, explorer) = explorer();
        let data = dataset(3);
        let mut console = ScriptedConsole::new(["maybe", "n"]);

        explorer.browse_raw_data(&mut console, &data).unwrap();
        let output = console.output();
        assert!(output.contains("This is invalid input."));
        assert!(output.contains("Please choose either 'y' for Yes or 'n' for No"));
        assert!(!output.contains("Dock 1"));
    }

    #[test]
    fn test_browse_stops_when_exhausted() {
        let (_dir, explorer) = explorer();
        let data = dataset(3);
        let mut console = ScriptedConsole::new(["y", "y", "y"]);

        explorer.browse_raw_data(&mut console, &data).unwrap();
        assert!(console.output().contains(NO_MORE_ROWS));
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_missing_data_file_propagates() {
        let (_dir, explorer) = explorer();
        let mut console = ScriptedConsole::new(["chicago", "none"]);

        let err = explorer.run(&mut console).unwrap_err();
        assert!(matches!(
            err,
            bikeshare_core::BikeshareError::MissingDataFile { .. }
        ));
    }
}
