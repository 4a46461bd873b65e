//! Export functionality for analysis
//!
//! Currently supports CSV export of learned action values.

mod q_table_csv;

pub use q_table_csv::{QTableCsvExporter, QTableRecord};
