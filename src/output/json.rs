//! JSON output implementation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bridge::Document;
use crate::error::PipelineResult;

/// Write documents to a JSON file as a pretty-printed array, creating or truncating it.
pub fn write_json_to_path(path: impl AsRef<Path>, docs: &[Document]) -> PipelineResult<()> {
    let file = File::create(path)?;
    write_json_to_writer(BufWriter::new(file), docs)
}

/// Write documents as a pretty-printed JSON array (two-space indent, trailing newline).
pub fn write_json_to_writer<W: Write>(mut writer: W, docs: &[Document]) -> PipelineResult<()> {
    serde_json::to_writer_pretty(&mut writer, docs)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::debug!(rows = docs.len(), "wrote json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::write_json_to_writer;
    use crate::bridge::Document;

    #[test]
    fn writes_pretty_array_in_key_order() {
        let doc: Document = json!({"name": "Ada", "age": 36, "ok": true})
            .as_object()
            .cloned()
            .unwrap();
        let mut buf = Vec::new();
        write_json_to_writer(&mut buf, &[doc]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"name\": \"Ada\",\n    \"age\": 36,\n    \"ok\": true\n  }\n]\n"
        );
    }

    #[test]
    fn empty_input_writes_empty_array() {
        let mut buf = Vec::new();
        write_json_to_writer(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]\n");
    }
}
