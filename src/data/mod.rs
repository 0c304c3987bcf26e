//! Data module - accident file loading, typed records and yearly summaries

mod loader;
mod processor;
mod record;

pub use loader::{make_filename, AsInteger, DataLoader};
pub use processor::{DataProcessor, SummaryRow, SummaryTable, YearLoad, YearWarning, YearsRead};
pub use record::AccidentRecord;
