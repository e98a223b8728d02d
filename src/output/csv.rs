//! CSV output implementation.

use std::io::Write;
use std::path::Path;

use crate::bridge::TextRow;
use crate::error::PipelineResult;

/// Write rows to a CSV file, creating or truncating it.
///
/// See [`write_csv_to_writer`] for the header rules.
pub fn write_csv_to_path(path: impl AsRef<Path>, rows: &[TextRow]) -> PipelineResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_csv_to_writer(&mut wtr, rows)
}

/// Write rows to an existing CSV writer and flush it.
///
/// - The header is the union of field names across all rows, in first-seen order.
/// - A row that lacks a header field gets an empty cell.
/// - Zero rows write nothing, not even a header.
pub fn write_csv_to_writer<W: Write>(wtr: &mut csv::Writer<W>, rows: &[TextRow]) -> PipelineResult<()> {
    if !rows.is_empty() {
        let headers = header_union(rows);
        wtr.write_record(&headers)?;
        for row in rows {
            wtr.write_record(headers.iter().map(|h| cell(row, h)))?;
        }
    }
    wtr.flush()?;
    tracing::debug!(rows = rows.len(), "wrote csv");
    Ok(())
}

fn header_union(rows: &[TextRow]) -> Vec<&str> {
    let mut headers: Vec<&str> = Vec::new();
    for (name, _) in rows.iter().flatten() {
        if !headers.contains(&name.as_str()) {
            headers.push(name);
        }
    }
    headers
}

fn cell<'a>(row: &'a TextRow, name: &str) -> &'a str {
    row.iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}
