//! Per-key indices of distinct metadata values across a collection.

use std::cmp::Ordering;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use field_metadata::{Metadata, Value};

use crate::collection::FieldList;

/// Ordered mapping from key to the sorted distinct values observed for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indices {
    entries: Vec<(String, Vec<Value>)>,
}

impl Indices {
    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop keys with exactly one distinct value.
    pub fn squeezed(mut self) -> Self {
        self.entries.retain(|(_, values)| values.len() != 1);
        self
    }
}

impl Serialize for Indices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Sorted distinct non-missing values of `key` across `metadata`.
pub(crate) fn distinct_values(metadata: &[&dyn Metadata], key: &str) -> Vec<Value> {
    let mut values: Vec<Value> = metadata
        .iter()
        .map(|md| md.get(key))
        .filter(|v| !v.is_missing())
        .collect();
    values.sort_by(Value::natural_cmp);
    values.dedup_by(|a, b| a.natural_cmp(b) == Ordering::Equal);
    values
}

/// Build indices for `keys` over already materialized metadata.
pub(crate) fn build_indices(metadata: &[&dyn Metadata], keys: &[String]) -> Indices {
    let entries = keys
        .iter()
        .filter_map(|key| {
            let values = distinct_values(metadata, key);
            (!values.is_empty()).then(|| (key.clone(), values))
        })
        .collect();
    Indices { entries }
}

/// Keys used when the caller names none: the first non-empty list
/// `declared` returns across `metadata`, or the first non-empty stored key
/// set when no field declares any.
pub(crate) fn default_keys<F>(metadata: &[&dyn Metadata], declared: F) -> Vec<String>
where
    F: Fn(&dyn Metadata) -> Vec<String>,
{
    metadata
        .iter()
        .map(|md| declared(*md))
        .find(|keys| !keys.is_empty())
        .or_else(|| {
            metadata
                .iter()
                .map(|md| md.keys())
                .find(|keys| !keys.is_empty())
        })
        .unwrap_or_default()
}

pub(crate) fn default_index_keys(metadata: &[&dyn Metadata]) -> Vec<String> {
    default_keys(metadata, |md| md.index_keys().to_vec())
}

impl FieldList {
    /// Distinct values per key.
    ///
    /// Fields lacking a key do not contribute to it, and keys with no value
    /// on any field are left out. With `squeeze`, keys with a single
    /// distinct value are dropped too.
    pub fn indices(&self, keys: Option<&[&str]>, squeeze: bool) -> Indices {
        let metadata: Vec<&dyn Metadata> = self.iter().map(|f| f.metadata()).collect();
        let keys: Vec<String> = match keys {
            Some(keys) => keys.iter().map(|k| k.to_string()).collect(),
            None => default_index_keys(&metadata),
        };

        let indices = build_indices(&metadata, &keys);
        debug!(
            fields = metadata.len(),
            keys = keys.len(),
            indexed = indices.len(),
            squeeze = squeeze,
            "Built field indices"
        );

        if squeeze {
            indices.squeezed()
        } else {
            indices
        }
    }

    /// Sorted distinct values of a single key.
    pub fn index(&self, key: &str) -> Vec<Value> {
        let metadata: Vec<&dyn Metadata> = self.iter().map(|f| f.metadata()).collect();
        distinct_values(&metadata, key)
    }
}
