//! Typed view over the columns of an accident table that the crate actually uses.

use crate::error::{FarsError, Result};
use polars::prelude::*;

pub const MONTH_COL: &str = "MONTH";
pub const STATE_COL: &str = "STATE";
pub const LONGITUDE_COL: &str = "LONGITUD";
pub const LATITUDE_COL: &str = "LATITUDE";

/// Raw longitudes above this value mean "unknown".
pub const LONGITUDE_SENTINEL: f64 = 900.0;
/// Raw latitudes above this value mean "unknown".
pub const LATITUDE_SENTINEL: f64 = 90.0;

/// One crash event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccidentRecord {
    pub month: Option<u32>,
    pub state: Option<i64>,
    pub raw_longitude: Option<f64>,
    pub raw_latitude: Option<f64>,
}

impl AccidentRecord {
    /// Longitude, or `None` when missing or a sentinel value.
    pub fn longitude(&self) -> Option<f64> {
        self.raw_longitude.filter(|v| *v <= LONGITUDE_SENTINEL)
    }

    /// Latitude, or `None` when missing or a sentinel value.
    pub fn latitude(&self) -> Option<f64> {
        self.raw_latitude.filter(|v| *v <= LATITUDE_SENTINEL)
    }

    /// Both coordinates, when both are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude()?, self.latitude()?))
    }

    /// Extract typed records from a loaded table.
    ///
    /// `STATE`, `LONGITUD` and `LATITUDE` are required; `MONTH` is optional.
    /// Cells that cannot be cast become `None`.
    pub fn from_dataframe(df: &DataFrame) -> Result<Vec<AccidentRecord>> {
        let states = Self::required(df, STATE_COL, &DataType::Int64)?;
        let longitudes = Self::required(df, LONGITUDE_COL, &DataType::Float64)?;
        let latitudes = Self::required(df, LATITUDE_COL, &DataType::Float64)?;
        let months = match df.column(MONTH_COL) {
            Ok(col) => Some(col.cast(&DataType::Int64)?),
            Err(_) => None,
        };

        let states = states.i64()?;
        let longitudes = longitudes.f64()?;
        let latitudes = latitudes.f64()?;
        let months = months.as_ref().map(|m| m.i64()).transpose()?;

        let records = (0..df.height())
            .map(|i| AccidentRecord {
                month: months
                    .and_then(|m| m.get(i))
                    .and_then(|m| u32::try_from(m).ok()),
                state: states.get(i),
                raw_longitude: longitudes.get(i),
                raw_latitude: latitudes.get(i),
            })
            .collect();

        Ok(records)
    }

    fn required(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Column> {
        let col = df
            .column(name)
            .map_err(|_| FarsError::MissingColumn(name.to_string()))?;
        Ok(col.cast(dtype)?)
    }
}
