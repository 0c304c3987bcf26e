//! State Map Plotter Module
//! Selects one state's accidents, drops sentinel coordinates and computes plot bounds.

use crate::data::AccidentRecord;
use crate::error::{FarsError, Result};
use std::collections::BTreeSet;

/// Padding applied to an axis whose values are all equal.
const DEGENERATE_PAD: f64 = 0.5;

/// Longitude/latitude window of a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl MapBounds {
    /// Bounds with zero-width axes widened so they can be drawn.
    pub fn padded(&self) -> MapBounds {
        let (lon_min, lon_max) = Self::pad_axis(self.lon_min, self.lon_max);
        let (lat_min, lat_max) = Self::pad_axis(self.lat_min, self.lat_max);
        MapBounds {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    fn pad_axis(min: f64, max: f64) -> (f64, f64) {
        if max > min {
            (min, max)
        } else {
            (min - DEGENERATE_PAD, max + DEGENERATE_PAD)
        }
    }

    fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Accidents of one state in one year, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMap {
    pub state: i64,
    pub year: i64,
    /// Rows in the state, including those without usable coordinates.
    pub accidents: usize,
    /// (longitude, latitude) of rows with both coordinates known.
    pub points: Vec<(f64, f64)>,
    /// `None` when no row has a known longitude or none has a known latitude.
    pub bounds: Option<MapBounds>,
}

impl StateMap {
    /// Fails with [`FarsError::InvalidState`] unless `state` occurs in the records.
    pub fn validate_state(records: &[AccidentRecord], state: i64) -> Result<()> {
        let states: BTreeSet<i64> = records.iter().filter_map(|r| r.state).collect();
        if states.contains(&state) {
            Ok(())
        } else {
            Err(FarsError::InvalidState(state))
        }
    }

    /// Filter to `state` and sanitize coordinates.
    ///
    /// Each axis range only uses that axis's known values, so a row with a
    /// sentinel longitude still widens the latitude range.
    pub fn from_records(records: &[AccidentRecord], state: i64, year: i64) -> Self {
        let selected: Vec<&AccidentRecord> = records
            .iter()
            .filter(|r| r.state == Some(state))
            .collect();

        let lon = MapBounds::range(selected.iter().filter_map(|r| r.longitude()));
        let lat = MapBounds::range(selected.iter().filter_map(|r| r.latitude()));
        let bounds = match (lon, lat) {
            (Some((lon_min, lon_max)), Some((lat_min, lat_max))) => Some(MapBounds {
                lon_min,
                lon_max,
                lat_min,
                lat_max,
            }),
            _ => None,
        };

        Self {
            state,
            year,
            accidents: selected.len(),
            points: selected.iter().filter_map(|r| r.position()).collect(),
            bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accidents == 0
    }

    /// Rows that will not appear on the map.
    pub fn skipped(&self) -> usize {
        self.accidents - self.points.len()
    }
}
