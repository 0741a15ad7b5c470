//! Building collections from JSON-lines metadata dumps.
//!
//! Each non-empty line holds one JSON object of scalar values describing one
//! field. Lines are kept as text and decoded the first time a field's
//! metadata is accessed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use field_metadata::{
    GribMetadata, Metadata, MetadataError, MetadataProfile, MetadataResult, MetadataUpdate,
    RawMetadata, Value,
};

use crate::collection::FieldList;
use crate::field::Field;

/// Concrete metadata kind built for each decoded line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataKind {
    Raw,
    #[default]
    Grib,
}

impl FromStr for MetadataKind {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(MetadataKind::Raw),
            "grib" => Ok(MetadataKind::Grib),
            other => Err(MetadataError::Usage(format!(
                "unsupported metadata kind '{}'",
                other
            ))),
        }
    }
}

/// Decode one JSON object into a metadata update, keeping the key order of
/// the line.
pub fn parse_record(line: &str) -> MetadataResult<MetadataUpdate> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line)?;
    object
        .into_iter()
        .map(|(key, json)| {
            Value::try_from(json)
                .map(|v| (key.clone(), v))
                .map_err(|err| MetadataError::InvalidValue(format!("{}: {}", key, err)))
        })
        .collect::<MetadataResult<MetadataUpdate>>()
}

/// Reads JSON-lines metadata into lazily decoded fields.
#[derive(Debug, Clone)]
pub struct JsonLinesReader {
    kind: MetadataKind,
    profile: Arc<MetadataProfile>,
}

impl JsonLinesReader {
    pub fn new(kind: MetadataKind) -> Self {
        Self {
            kind,
            profile: MetadataProfile::grib(),
        }
    }

    /// Profile attached to GRIB metadata.
    pub fn with_profile(mut self, profile: Arc<MetadataProfile>) -> Self {
        self.profile = profile;
        self
    }

    fn field(&self, line: String) -> Field {
        let kind = self.kind;
        let profile = Arc::clone(&self.profile);
        Field::lazy(move || {
            let update = parse_record(&line)?;
            Ok(match kind {
                MetadataKind::Raw => Box::new(RawMetadata::from_update(&update)) as Box<dyn Metadata>,
                MetadataKind::Grib => Box::new(
                    GribMetadata::from_update(&update).with_profile(Arc::clone(&profile)),
                ),
            })
        })
    }

    pub fn read<R: BufRead>(&self, reader: R) -> MetadataResult<FieldList> {
        let mut fields = FieldList::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            fields.push(self.field(line));
        }
        Ok(fields)
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> MetadataResult<FieldList> {
        let path = path.as_ref();
        let fields = self.read(BufReader::new(File::open(path)?))?;
        info!(
            path = %path.display(),
            fields = fields.len(),
            kind = ?self.kind,
            "Read field metadata"
        );
        Ok(fields)
    }
}
