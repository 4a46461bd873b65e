//! CSV export of a learned action-value table
//!
//! One row per (cell, action) pair, in table storage order. The `greedy` column marks
//! the action the greedy policy would take from that cell; off-grid moves are never
//! greedy.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{
    Result,
    gridworld::{Action, GridWorld},
    q_learning::ActionValueTable,
};

/// A single row in the table export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QTableRecord {
    pub column: usize,
    pub row: usize,
    pub action: &'static str,
    pub value: f64,
    pub greedy: bool,
}

/// Exporter for action-value CSV files
pub struct QTableCsvExporter;

impl QTableCsvExporter {
    /// Collect the export rows for `table` over `world`'s grid.
    pub fn records(world: &GridWorld, table: &ActionValueTable) -> Result<Vec<QTableRecord>> {
        let mut records = Vec::with_capacity(table.len());
        for cell in world.cells() {
            let legal = world.legal_actions(cell);
            let best = table.best_action(cell, &legal)?;
            let values = table.row(cell)?;
            for action in Action::ALL {
                records.push(QTableRecord {
                    column: cell.column,
                    row: cell.row,
                    action: action.name(),
                    value: values[action.index()],
                    greedy: action == best,
                });
            }
        }
        Ok(records)
    }

    /// Write the table as CSV to any writer. Returns the number of data rows.
    pub fn write<W: Write>(world: &GridWorld, table: &ActionValueTable, writer: W) -> Result<usize> {
        let records = Self::records(world, table)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export the table to a CSV file at `path`.
    pub fn export(world: &GridWorld, table: &ActionValueTable, path: &Path) -> Result<usize> {
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        Self::write(world, table, file)
    }
}
