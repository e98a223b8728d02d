//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object: `{"a":1}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`

use std::fs;
use std::path::Path;

use crate::bridge::Document;
use crate::error::{PipelineError, PipelineResult};

/// Read a JSON file into documents.
pub fn read_json_from_path(path: impl AsRef<Path>) -> PipelineResult<Vec<Document>> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Read documents from an in-memory JSON string.
///
/// Whitespace-only input yields no documents.
pub fn read_json_from_str(input: &str) -> PipelineResult<Vec<Document>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    // First try parsing as a single JSON value (array or object).
    let values = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(v @ serde_json::Value::Object(_)) => vec![v],
        Ok(_) => {
            return Err(PipelineError::invalid_input(
                "json must be an object, an array of objects, or NDJSON",
            ));
        }
        Err(_) => parse_ndjson(trimmed)?,
    };

    let docs = into_documents(values)?;
    tracing::debug!(rows = docs.len(), "read json");
    Ok(docs)
}

fn parse_ndjson(input: &str) -> PipelineResult<Vec<serde_json::Value>> {
    let mut values = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
            PipelineError::invalid_input(format!("invalid ndjson at line {}: {}", i + 1, e))
        })?;
        values.push(v);
    }
    Ok(values)
}

fn into_documents(values: Vec<serde_json::Value>) -> PipelineResult<Vec<Document>> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx0, v)| match v {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(PipelineError::invalid_input(format!(
                "row {} is not a json object",
                idx0 + 1
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::read_json_from_str;

    #[test]
    fn reads_array_single_object_and_ndjson() {
        assert_eq!(read_json_from_str(r#"[{"a":1},{"a":2}]"#).unwrap().len(), 2);
        assert_eq!(read_json_from_str(r#"{"a":1}"#).unwrap().len(), 1);
        assert_eq!(read_json_from_str("{\"a\":1}\n\n{\"a\":2}\n").unwrap().len(), 2);
    }

    #[test]
    fn keeps_keys_in_document_order() {
        let docs = read_json_from_str(r#"[{"z":1,"a":2,"m":3}]"#).unwrap();
        assert_eq!(docs[0].keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(read_json_from_str("  \n").unwrap().is_empty());
        assert!(read_json_from_str("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_object_rows() {
        let err = read_json_from_str(r#"[{"a":1}, 3]"#).unwrap_err();
        assert!(err.to_string().contains("row 2 is not a json object"));

        let err = read_json_from_str("42").unwrap_err();
        assert!(err.to_string().contains("json must be an object"));
    }

    #[test]
    fn reports_bad_ndjson_line() {
        let err = read_json_from_str("{\"a\":1}\n{oops\n").unwrap_err();
        assert!(err.to_string().contains("invalid ndjson at line 2"));
    }
}
