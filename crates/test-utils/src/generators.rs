//! Generators for on-disk test inputs.

use std::io::Write;

use field_metadata::{Metadata, MetadataUpdate, RawMetadata};
use tempfile::NamedTempFile;

/// Encode one record as a single JSON object line.
pub fn json_line(record: &MetadataUpdate) -> String {
    let md = RawMetadata::from_update(record);
    let object: serde_json::Map<String, serde_json::Value> = md
        .items()
        .into_iter()
        .map(|(k, v)| (k, serde_json::to_value(v).unwrap_or(serde_json::Value::Null)))
        .collect();
    serde_json::Value::Object(object).to_string()
}

/// Render records as a JSON-lines document.
pub fn json_lines(records: &[MetadataUpdate]) -> String {
    records
        .iter()
        .map(json_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write records to a temporary JSON-lines file, removed when dropped.
pub fn write_json_lines(records: &[MetadataUpdate]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{}", json_lines(records)).expect("Failed to write temp file");
    file
}
