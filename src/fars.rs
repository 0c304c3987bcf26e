//! Entry points tying loading, summarizing and mapping to one configuration.

use crate::charts::{BaseMap, StateMap, StaticMapRenderer};
use crate::config::FarsConfig;
use crate::data::{AccidentRecord, AsInteger, DataLoader, DataProcessor, SummaryTable, YearsRead};
use crate::error::Result;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a map request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Rendered {
        path: PathBuf,
        points: usize,
        skipped: usize,
    },
    /// The state has no accidents in the year; nothing was drawn.
    NoAccidents { state: i64, year: i64 },
    /// Every accident of the state has an unknown coordinate; nothing was drawn.
    NoCoordinates { state: i64, year: i64 },
}

#[derive(Debug, Clone, Default)]
pub struct Fars {
    config: FarsConfig,
    loader: DataLoader,
}

impl Fars {
    pub fn new(config: FarsConfig) -> Self {
        let loader = DataLoader::new(config.data_dir.clone());
        Self { config, loader }
    }

    /// Read one file, relative to the working directory.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        DataLoader::read(path)
    }

    pub fn read_years<Y: AsInteger>(&self, years: &[Y]) -> YearsRead {
        DataProcessor::read_years(&self.loader, years)
    }

    /// Monthly accident counts, one column per year that loaded.
    pub fn summarize_years<Y: AsInteger>(&self, years: &[Y]) -> Result<SummaryTable> {
        let read = self.read_years(years);
        DataProcessor::summarize(&read)
    }

    /// Map to the configured output path (`state_<state>_<year>.png`).
    pub fn map_state<S: AsInteger, Y: AsInteger>(&self, state: S, year: Y) -> Result<MapOutcome> {
        let (state, year) = (state.as_integer(), year.as_integer());
        let output = self.config.map_output_path(state, year);
        self.map_state_to(state, year, &output)
    }

    pub fn map_state_to<S: AsInteger, Y: AsInteger>(
        &self,
        state: S,
        year: Y,
        output: &Path,
    ) -> Result<MapOutcome> {
        let year = year.as_integer();
        let table = self.loader.load_year(year)?;
        let state = state.as_integer();

        let records = AccidentRecord::from_dataframe(&table)?;
        StateMap::validate_state(&records, state)?;

        let map = StateMap::from_records(&records, state, year);
        if map.is_empty() {
            info!(state, year, "no accidents to plot");
            return Ok(MapOutcome::NoAccidents { state, year });
        }
        if map.bounds.is_none() {
            info!(state, year, accidents = map.accidents, "no known coordinates to plot");
            return Ok(MapOutcome::NoCoordinates { state, year });
        }

        let base = self.base_map()?;
        let points = StaticMapRenderer::render(&map, &base, &self.config.map, output)?;
        info!(state, year, points, path = %output.display(), "rendered state map");

        Ok(MapOutcome::Rendered {
            path: output.to_path_buf(),
            points,
            skipped: map.skipped(),
        })
    }

    fn base_map(&self) -> Result<BaseMap> {
        match self.config.resolve_base_map() {
            Some(path) => BaseMap::load(path),
            None => {
                warn!("no base map configured; drawing accidents only");
                Ok(BaseMap::empty())
            }
        }
    }
}
