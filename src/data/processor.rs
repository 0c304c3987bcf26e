//! Data Processor Module
//! Multi-year loading and the month x year summary (group, count, spread).

use crate::data::loader::{AsInteger, DataLoader};
use crate::data::record::MONTH_COL;
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

pub const YEAR_COL: &str = "year";
const COUNT_COL: &str = "n";

/// Outcome of loading a single year.
#[derive(Debug, Clone)]
pub enum YearLoad {
    /// `MONTH` and `year` columns of every record in the year's file.
    Loaded { year: i64, table: DataFrame },
    Failed { year: i64, reason: String },
}

impl YearLoad {
    pub fn year(&self) -> i64 {
        match self {
            YearLoad::Loaded { year, .. } | YearLoad::Failed { year, .. } => *year,
        }
    }

    pub fn table(&self) -> Option<&DataFrame> {
        match self {
            YearLoad::Loaded { table, .. } => Some(table),
            YearLoad::Failed { .. } => None,
        }
    }
}

/// Non-fatal problem with one requested year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearWarning {
    pub year: i64,
    pub reason: String,
}

impl fmt::Display for YearWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid year: {}", self.year)
    }
}

/// Per-year tables in request order, plus the warnings raised along the way.
#[derive(Debug, Clone, Default)]
pub struct YearsRead {
    pub tables: Vec<YearLoad>,
    pub warnings: Vec<YearWarning>,
}

impl YearsRead {
    /// Tables of the years that loaded.
    pub fn loaded(&self) -> impl Iterator<Item = &DataFrame> {
        self.tables.iter().filter_map(YearLoad::table)
    }
}

/// One month's accident counts, one cell per year of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub month: u32,
    pub counts: Vec<Option<u32>>,
}

/// Accident counts, rows by month and columns by year (both ascending).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub years: Vec<i64>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn months(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.month).collect()
    }

    /// Count for a month/year cell; `None` when either is absent or the cell is missing.
    pub fn get(&self, month: u32, year: i64) -> Option<u32> {
        let col = self.years.iter().position(|y| *y == year)?;
        self.rows
            .iter()
            .find(|r| r.month == month)
            .and_then(|r| r.counts[col])
    }

    /// Wide DataFrame: `MONTH` followed by one column per year.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![Column::new(MONTH_COL.into(), self.months())];
        for (i, year) in self.years.iter().enumerate() {
            let values: Vec<Option<u32>> = self.rows.iter().map(|r| r.counts[i]).collect();
            columns.push(Column::new(year.to_string().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Spread long (year, month, count) triples into the wide layout.
    fn from_long(triples: impl IntoIterator<Item = (i64, u32, u32)>) -> Self {
        let mut cells: BTreeMap<u32, BTreeMap<i64, u32>> = BTreeMap::new();
        let mut years: Vec<i64> = Vec::new();

        for (year, month, count) in triples {
            if !years.contains(&year) {
                years.push(year);
            }
            cells.entry(month).or_default().insert(year, count);
        }
        years.sort_unstable();

        let rows = cells
            .into_iter()
            .map(|(month, by_year)| SummaryRow {
                month,
                counts: years.iter().map(|y| by_year.get(y).copied()).collect(),
            })
            .collect();

        Self { years, rows }
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}", MONTH_COL)?;
        for year in &self.years {
            write!(f, " {:>6}", year)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:>5}", row.month)?;
            for count in &row.counts {
                match count {
                    Some(n) => write!(f, " {:>6}", n)?,
                    None => write!(f, " {:>6}", "NA")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Handles multi-year loading and summarizing.
pub struct DataProcessor;

impl DataProcessor {
    /// Load each year, keeping only `MONTH` and `year`.
    ///
    /// A year that fails to load becomes [`YearLoad::Failed`] and a warning;
    /// the call itself never fails.
    pub fn read_years<Y: AsInteger>(loader: &DataLoader, years: &[Y]) -> YearsRead {
        let mut out = YearsRead::default();

        for year in years.iter().map(|y| y.as_integer()) {
            match Self::load_month_year(loader, year) {
                Ok(table) => out.tables.push(YearLoad::Loaded { year, table }),
                Err(e) => {
                    let reason = e.to_string();
                    warn!(year, %reason, "invalid year");
                    out.warnings.push(YearWarning {
                        year,
                        reason: reason.clone(),
                    });
                    out.tables.push(YearLoad::Failed { year, reason });
                }
            }
        }

        out
    }

    fn load_month_year(loader: &DataLoader, year: i64) -> Result<DataFrame> {
        let df = loader
            .load_year(year)?
            .lazy()
            .with_column(lit(year).alias(YEAR_COL))
            .select([
                col(MONTH_COL).cast(DataType::Int64),
                col(YEAR_COL).cast(DataType::Int64),
            ])
            .collect()?;
        Ok(df)
    }

    /// Count accidents per month and year across the loaded years.
    ///
    /// Years that failed to load contribute no rows and therefore no column.
    pub fn summarize(read: &YearsRead) -> Result<SummaryTable> {
        let Some(stacked) = Self::concat(read.loaded())? else {
            return Ok(SummaryTable::default());
        };

        let counts = stacked
            .lazy()
            .group_by([col(YEAR_COL), col(MONTH_COL)])
            .agg([len().alias(COUNT_COL)])
            .collect()?;

        let years = counts.column(YEAR_COL)?.cast(&DataType::Int64)?;
        let months = counts.column(MONTH_COL)?.cast(&DataType::Int64)?;
        let n = counts.column(COUNT_COL)?.cast(&DataType::Int64)?;

        let triples = years
            .i64()?
            .into_iter()
            .zip(months.i64()?.into_iter())
            .zip(n.i64()?.into_iter())
            .filter_map(|((year, month), n)| {
                let month = month.and_then(|m| u32::try_from(m).ok());
                match (year, month, n) {
                    (Some(y), Some(m), Some(n)) => Some((y, m, n as u32)),
                    _ => {
                        debug!(?year, ?month, "dropping group without a month");
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        Ok(SummaryTable::from_long(triples))
    }

    /// Row-wise concatenation; `None` when there is nothing to stack.
    fn concat<'a>(tables: impl Iterator<Item = &'a DataFrame>) -> Result<Option<DataFrame>> {
        let mut stacked: Option<DataFrame> = None;
        for table in tables {
            match stacked.as_mut() {
                Some(acc) => {
                    acc.vstack_mut(table)?;
                }
                None => stacked = Some(table.clone()),
            }
        }
        Ok(stacked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &std::path::Path, year: i64, months: &[i64]) {
        let mut csv = String::from("STATE,MONTH,LATITUDE,LONGITUD\n");
        for m in months {
            csv.push_str(&format!("1,{},33.0,-86.0\n", m));
        }
        // Plain CSV under the canonical name; the loader sniffs compression.
        std::fs::write(dir.join(format!("accident_{}.csv.bz2", year)), csv).unwrap();
    }

    #[test]
    fn test_read_years_tags_and_projects() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), 2013, &[1, 1, 2]);
        let loader = DataLoader::new(dir.path());

        let read = DataProcessor::read_years(&loader, &[2013]);
        assert!(read.warnings.is_empty());
        let table = read.tables[0].table().unwrap();
        let names: Vec<String> = table.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["MONTH", "year"]);
        assert_eq!(table.height(), 3);
        let years: Vec<Option<i64>> = table.column("year").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(2013); 3]);
    }

    #[test]
    fn test_read_years_keeps_order_and_warns() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), 2013, &[1]);
        let loader = DataLoader::new(dir.path());

        let read = DataProcessor::read_years(&loader, &[9999, 2013]);
        assert_eq!(read.tables.len(), 2);
        assert!(matches!(read.tables[0], YearLoad::Failed { year: 9999, .. }));
        assert!(matches!(read.tables[1], YearLoad::Loaded { year: 2013, .. }));
        assert_eq!(read.warnings.len(), 1);
        assert_eq!(read.warnings[0].to_string(), "invalid year: 9999");
    }

    #[test]
    fn test_missing_month_column_is_a_failed_year() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("accident_2015.csv.bz2"), "STATE,FATALS\n1,1\n").unwrap();
        let loader = DataLoader::new(dir.path());

        let read = DataProcessor::read_years(&loader, &[2015]);
        assert!(matches!(read.tables[0], YearLoad::Failed { year: 2015, .. }));
        assert_eq!(read.warnings.len(), 1);
    }

    #[test]
    fn test_summarize_spreads_years_into_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), 2014, &[1, 3, 3]);
        write_csv(dir.path(), 2013, &[2, 1, 1, 12]);
        let loader = DataLoader::new(dir.path());

        let read = DataProcessor::read_years(&loader, &[2014, 2013]);
        let summary = DataProcessor::summarize(&read).unwrap();

        assert_eq!(summary.years, vec![2013, 2014]);
        assert_eq!(summary.months(), vec![1, 2, 3, 12]);
        assert_eq!(summary.get(1, 2013), Some(2));
        assert_eq!(summary.get(1, 2014), Some(1));
        assert_eq!(summary.get(3, 2014), Some(2));
        assert_eq!(summary.get(3, 2013), None);
        assert_eq!(summary.get(12, 2014), None);
    }

    #[test]
    fn test_failed_year_has_no_column() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), 2013, &[5]);
        let loader = DataLoader::new(dir.path());

        let read = DataProcessor::read_years(&loader, &[2013, 1999]);
        let summary = DataProcessor::summarize(&read).unwrap();
        assert_eq!(summary.years, vec![2013]);
        assert_eq!(summary.rows, vec![SummaryRow { month: 5, counts: vec![Some(1)] }]);
    }

    #[test]
    fn test_summarize_nothing_loaded() {
        let loader = DataLoader::new("/nonexistent");
        let read = DataProcessor::read_years(&loader, &[2013, 2014]);
        let summary = DataProcessor::summarize(&read).unwrap();
        assert!(summary.is_empty());
        assert!(summary.years.is_empty());
    }

    #[test]
    fn test_to_dataframe_and_display() {
        let summary = SummaryTable::from_long([(2014, 1, 4), (2013, 1, 7), (2013, 2, 3)]);

        let df = summary.to_dataframe().unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["MONTH", "2013", "2014"]);
        assert_eq!(df.column("2014").unwrap().null_count(), 1);

        let text = summary.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2013") && lines[0].contains("2014"));
        assert!(lines[2].trim_end().ends_with("NA"));
    }
}
