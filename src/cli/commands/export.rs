//! Export command - Train, then write the learned table for analysis

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    cli::{commands::train::train_session, config::SessionArgs, output::render_policy},
    export::QTableCsvExporter,
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent and export what it learned")]
pub struct ExportArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Export format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One row per (cell, action) with its value
    Csv,
    /// Greedy action of every cell drawn as arrows
    Policy,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let session = train_session(&args.session, None)?;
    let world = session.trainer.world();
    let table = session.trainer.table();

    match args.format {
        ExportFormat::Csv => {
            let rows = QTableCsvExporter::export(world, table, &args.output)?;
            println!(
                "\n✓ Exported {rows} table entries to: {}",
                args.output.display()
            );
        }
        ExportFormat::Policy => {
            let policy = render_policy(world, table)?;
            std::fs::write(&args.output, policy)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            println!("\n✓ Exported policy map to: {}", args.output.display());
        }
    }
    Ok(())
}
