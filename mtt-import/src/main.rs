//! mtt-import - One-off spreadsheet-to-JSON import
//!
//! Offline batch tool: reads tabular input (CSV export of the lab
//! spreadsheet), extracts candidate mouse IDs, and writes a training
//! document seed. Runs outside the live request path and never touches an
//! existing persisted document; the service adopts the output by copying
//! it over the data file deliberately.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mtt_common::import::{build_document, populated_steps, HeuristicClassifier, Row};
use tracing::info;

/// Command-line arguments for mtt-import
#[derive(Parser, Debug)]
#[command(name = "mtt-import")]
#[command(about = "Seed a training document from a spreadsheet export")]
#[command(version)]
struct Args {
    /// Input spreadsheet (CSV export)
    input: PathBuf,

    /// Output path for the seed document
    #[arg(short, long, default_value = "parsed-mouse-data.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    // Unreadable input is a hard failure and writes nothing; zero matched
    // IDs is a valid (empty) result.
    let rows = read_rows(&args.input)
        .with_context(|| format!("failed to read spreadsheet {}", args.input.display()))?;
    info!("Read {} rows from {}", rows.len(), args.input.display());

    let doc = build_document(&rows, &HeuristicClassifier);

    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!("Wrote seed document to {}", args.output.display());
    info!(
        "Summary: {} mice, {} steps, {} daily records",
        doc.mice.len(),
        doc.steps.len(),
        doc.daily_records.len()
    );
    for step in populated_steps(&doc) {
        let roster: Vec<&str> = step.mice.iter().map(|id| id.as_str()).collect();
        info!("  {} <- {}", step.title, roster.join(", "));
    }

    Ok(())
}

/// Read all rows as text cells. Records may have uneven lengths; the
/// classifier decides what is header and what is data.
fn read_rows(path: &PathBuf) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_uneven_csv_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        fs::write(&path, "MouseID,Date\nC003,X010,foo\nbar\n").unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["MouseID", "Date"]);
        assert_eq!(rows[1], vec!["C003", "X010", "foo"]);
        assert_eq!(rows[2], vec!["bar"]);

        let doc = build_document(&rows, &HeuristicClassifier);
        assert_eq!(doc.mice.len(), 2);
        assert_eq!(doc.daily_records.len(), 2);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_rows(&dir.path().join("absent.csv")).is_err());
    }
}
