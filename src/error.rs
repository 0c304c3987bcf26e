//! Error types shared across loading, summarizing and mapping.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarsError {
    #[error("file '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("invalid STATE number: {0}")]
    InvalidState(i64),
    #[error("failed to render map: {0}")]
    Render(String),
    #[error("invalid base map: {0}")]
    BaseMap(String),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FarsError>;
