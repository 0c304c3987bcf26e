//! Configuration: where data lives, where maps go, how maps look.
//!
//! Read from a TOML file; every field has a default so an empty file is valid.
//!
//! ```toml
//! data_dir = "/data/fars"
//! output_dir = "maps"
//! base_map = "/data/geo/us_states.geojson"
//!
//! [map]
//! width = 1200
//! height = 900
//! ```

use crate::error::{FarsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base map picked up from the data directory when none is configured.
pub const DEFAULT_BASE_MAP: &str = "us_states.geojson";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapOptions {
    pub width: u32,
    pub height: u32,
    pub point_radius: u32,
    /// Caption and axis labels. Needs system fonts.
    pub labels: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            point_radius: 2,
            labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FarsConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub base_map: Option<PathBuf>,
    pub map: MapOptions,
}

impl Default for FarsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            base_map: None,
            map: MapOptions::default(),
        }
    }
}

impl FarsConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FarsError::FileNotFound(path.to_path_buf()));
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Configured base map, else `us_states.geojson` in the data directory if present.
    pub fn resolve_base_map(&self) -> Option<PathBuf> {
        if let Some(path) = &self.base_map {
            return Some(path.clone());
        }
        let fallback = self.data_dir.join(DEFAULT_BASE_MAP);
        fallback.is_file().then_some(fallback)
    }

    /// Default output file for a state map.
    pub fn map_output_path(&self, state: i64, year: i64) -> PathBuf {
        self.output_dir.join(format!("state_{}_{}.png", state, year))
    }
}
