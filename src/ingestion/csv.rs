//! CSV ingestion implementation.

use std::path::Path;

use crate::bridge::TextRow;
use crate::error::{PipelineError, PipelineResult};

/// Read a CSV file into string-valued rows.
///
/// Rules:
///
/// - The CSV must have a header row; header names become field names.
/// - Header names must be unique.
/// - Every data row must have as many cells as the header.
/// - Cells are kept verbatim (no trimming, no type parsing).
pub fn read_csv_from_path(path: impl AsRef<Path>) -> PipelineResult<Vec<TextRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Read CSV rows from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> PipelineResult<Vec<TextRow>> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(PipelineError::invalid_input("csv input has no header row"));
    }
    for (i, name) in headers.iter().enumerate() {
        if headers.iter().take(i).any(|seen| seen == name) {
            return Err(PipelineError::invalid_input(format!("duplicate csv header '{name}'")));
        }
    }

    let mut rows: Vec<TextRow> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.to_owned(), cell.to_owned()))
            .collect::<TextRow>();
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "read csv");
    Ok(rows)
}
