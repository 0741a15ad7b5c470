//! Plain key/value metadata.

use chrono::{DateTime, Utc};

use field_common::{MetadataResult, Value};

use crate::metadata::Metadata;
use crate::store::KeyValueStore;
use crate::update::MetadataUpdate;

/// Metadata backed by an ordered key/value store.
///
/// `RawMetadata` declares no namespaces and no key lists, and has no notion
/// of time: `datetime` is never resolvable on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    store: KeyValueStore,
}

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_update(update: &MetadataUpdate) -> Self {
        Self {
            store: KeyValueStore::from(update),
        }
    }

    /// Copy the stored items of any other metadata object.
    pub fn from_metadata(other: &dyn Metadata) -> Self {
        Self::from_update(&MetadataUpdate::new().merge_metadata(other))
    }

    /// A copy of `self` with `update` merged on top.
    pub fn overridden(&self, update: &MetadataUpdate) -> Self {
        let mut store = self.store.clone();
        store.apply(update);
        Self { store }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let update: MetadataUpdate = iter.into_iter().collect();
        Self::from_update(&update)
    }
}

impl Metadata for RawMetadata {
    fn len(&self) -> usize {
        self.store.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    fn keys(&self) -> Vec<String> {
        self.store.keys().map(str::to_string).collect()
    }

    fn items(&self) -> Vec<(String, Value)> {
        self.store
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        self.store.get(key).cloned()
    }

    fn with_overrides(&self, update: &MetadataUpdate) -> Box<dyn Metadata> {
        Box::new(self.overridden(update))
    }

    fn base_datetime(&self) -> MetadataResult<Option<DateTime<Utc>>> {
        Ok(None)
    }

    fn valid_datetime(&self) -> MetadataResult<Option<DateTime<Utc>>> {
        Ok(None)
    }
}
