//! Listing and summary views over a collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use field_metadata::{Metadata, Value};

use crate::collection::FieldList;
use crate::index::{build_indices, default_keys, Indices};

/// Keys used to group fields in [`FieldList::describe`].
const GROUP_KEYS: &[&str] = &["param", "shortName"];

/// One row per field, one column per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// Distinct times found across a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatetimeSummary {
    pub base_time: Vec<DateTime<Utc>>,
    pub valid_time: Vec<DateTime<Utc>>,
}

fn sorted_unique(mut times: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    times.sort();
    times.dedup();
    times
}

impl FieldList {
    /// Tabulate `keys`, defaulting to the first declared `ls` keys found in
    /// the collection, or to stored keys when no field declares any.
    pub fn ls(&self, keys: Option<&[&str]>) -> Table {
        let metadata: Vec<&dyn Metadata> = self.iter().map(|f| f.metadata()).collect();
        let columns: Vec<String> = match keys {
            Some(keys) => keys.iter().map(|k| k.to_string()).collect(),
            None => default_keys(&metadata, |md| md.ls_keys().to_vec()),
        };

        let rows = metadata
            .iter()
            .map(|md| columns.iter().map(|c| md.get(c)).collect())
            .collect();

        Table { columns, rows }
    }

    /// Per-parameter indices of the describe keys.
    ///
    /// Fields are grouped by `param`, falling back to `shortName`; fields
    /// with neither are skipped.
    pub fn describe(&self) -> BTreeMap<String, Indices> {
        let mut groups: BTreeMap<String, Vec<&dyn Metadata>> = BTreeMap::new();
        let mut skipped = 0usize;

        for field in self {
            let md = field.metadata();
            let name = GROUP_KEYS
                .iter()
                .map(|k| md.get(k))
                .find(|v| !v.is_missing());
            match name {
                Some(name) => groups.entry(name.to_string()).or_default().push(md),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped = skipped, "Fields without a parameter left out of describe");
        }

        groups
            .into_iter()
            .map(|(name, members)| {
                let keys = default_keys(&members, |md| {
                    if md.describe_keys().is_empty() {
                        md.index_keys().to_vec()
                    } else {
                        md.describe_keys().to_vec()
                    }
                });
                (name, build_indices(&members, &keys))
            })
            .collect()
    }

    /// Distinct base and valid times, sorted. Fields whose times cannot be
    /// computed are left out.
    pub fn datetime(&self) -> DatetimeSummary {
        let mut base = Vec::new();
        let mut valid = Vec::new();

        for field in self {
            match field.metadata().datetime() {
                Ok(pair) => {
                    base.extend(pair.base_time);
                    valid.extend(pair.valid_time);
                }
                Err(err) => debug!(error = %err, "Field time unavailable"),
            }
        }

        DatetimeSummary {
            base_time: sorted_unique(base),
            valid_time: sorted_unique(valid),
        }
    }

    /// The value of `key` on every field, in order.
    pub fn metadata_values(&self, key: &str) -> Vec<Value> {
        self.iter().map(|f| f.metadata().get(key)).collect()
    }
}
