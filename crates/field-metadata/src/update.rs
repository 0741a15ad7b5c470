//! Ordered metadata updates used to construct and override metadata.

use field_common::Value;

use crate::metadata::Metadata;

/// Key/value sources merged left-to-right; later entries win.
///
/// Mirrors the ways metadata can be built or overridden: from another
/// metadata object, from a map or an iterable of pairs, and from individual
/// keyword-style entries, which callers apply last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataUpdate {
    entries: Vec<(String, Value)>,
}

impl MetadataUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every stored item of another metadata object.
    pub fn merge_metadata(mut self, other: &dyn Metadata) -> Self {
        self.entries.extend(other.items());
        self
    }

    /// Merge a map or any iterable of key/value pairs.
    pub fn merge_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.entries
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set a single entry.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Entries in merge order. Keys may repeat.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MetadataUpdate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().merge_pairs(iter)
    }
}
