//! Accident File Loader Module
//! Resolves yearly file names and reads (optionally bzip2-compressed) CSV files using Polars.

use crate::error::{FarsError, Result};
use bzip2::read::MultiBzDecoder;
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Magic bytes at the start of every bzip2 stream.
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Numeric inputs accepted where a year or state number is expected.
/// Floats truncate toward zero; values outside the `i64` range saturate.
pub trait AsInteger: Copy {
    fn as_integer(self) -> i64;
}

macro_rules! impl_as_integer {
    ($($t:ty),*) => {
        $(impl AsInteger for $t {
            fn as_integer(self) -> i64 {
                i64::try_from(self).unwrap_or(i64::MAX)
            }
        })*
    };
}

impl_as_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl AsInteger for f32 {
    fn as_integer(self) -> i64 {
        self as i64
    }
}

impl AsInteger for f64 {
    fn as_integer(self) -> i64 {
        self as i64
    }
}

/// Canonical file name for a year's accident data, e.g. `accident_2013.csv.bz2`.
pub fn make_filename<Y: AsInteger>(year: Y) -> String {
    format!("accident_{}.csv.bz2", year.as_integer())
}

/// Reads accident files from a data directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_dir: PathBuf,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the file holding `year`'s records.
    pub fn year_path<Y: AsInteger>(&self, year: Y) -> PathBuf {
        self.data_dir.join(make_filename(year))
    }

    /// Load the table for a single year.
    pub fn load_year<Y: AsInteger>(&self, year: Y) -> Result<DataFrame> {
        Self::read(self.year_path(year))
    }

    /// Read a CSV file into a DataFrame. The file may be plain or bzip2-compressed;
    /// compression is detected from the content rather than the extension.
    pub fn read(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FarsError::FileNotFound(path.to_path_buf()));
        }

        let bytes = Self::read_bytes(path)?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        debug!(path = %path.display(), rows = df.height(), "loaded accident file");
        Ok(df)
    }

    fn read_bytes(path: &Path) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        File::open(path)?.read_to_end(&mut raw)?;

        if !raw.starts_with(BZIP2_MAGIC) {
            return Ok(raw);
        }

        // Parallel compressors write several concatenated streams.
        let mut decoded = Vec::new();
        MultiBzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
        Ok(decoded)
    }
}
