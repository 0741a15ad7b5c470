//! Ordered key/value storage backing the concrete metadata kinds.

use std::collections::HashMap;

use field_common::Value;

use crate::update::MetadataUpdate;

/// Insertion-ordered map from key to value.
///
/// Re-inserting an existing key replaces its value in place, so the
/// enumeration order stays that of first insertion.
#[derive(Debug, Clone, Default)]
pub struct KeyValueStore {
    entries: Vec<(String, Value)>,
    positions: HashMap<String, usize>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Apply every entry of `update` in order.
    pub fn apply(&mut self, update: &MetadataUpdate) {
        for (key, value) in update.entries() {
            self.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.positions.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<&MetadataUpdate> for KeyValueStore {
    fn from(update: &MetadataUpdate) -> Self {
        let mut store = KeyValueStore::new();
        store.apply(update);
        store
    }
}

/// Content equality; insertion order is not significant.
impl PartialEq for KeyValueStore {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}
