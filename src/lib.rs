//! FARS - Fatality Analysis Reporting System accident data
//!
//! Loads yearly accident files (`accident_<year>.csv.bz2`), counts accidents
//! per month and year, and maps one state's accidents for a year.
//!
//! The free functions work on the current directory with default settings;
//! use [`Fars`] with a [`FarsConfig`] for anything else.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
mod fars;

pub use config::{FarsConfig, MapOptions};
pub use data::{make_filename, AccidentRecord, AsInteger, SummaryRow, SummaryTable, YearLoad, YearWarning, YearsRead};
pub use error::{FarsError, Result};
pub use fars::{Fars, MapOutcome};

use polars::prelude::DataFrame;
use std::path::Path;

/// Read an accident file. Fails with [`FarsError::FileNotFound`] if it does not exist.
pub fn fars_read(filename: impl AsRef<Path>) -> Result<DataFrame> {
    data::DataLoader::read(filename)
}

/// Load several years; failures become warnings and [`YearLoad::Failed`] slots.
pub fn fars_read_years<Y: AsInteger>(years: &[Y]) -> YearsRead {
    Fars::default().read_years(years)
}

pub fn fars_summarize_years<Y: AsInteger>(years: &[Y]) -> Result<SummaryTable> {
    Fars::default().summarize_years(years)
}

/// Map a state's accidents for a year to `state_<state>_<year>.png`.
pub fn fars_map_state<S: AsInteger, Y: AsInteger>(state: S, year: Y) -> Result<MapOutcome> {
    Fars::default().map_state(state, year)
}
