//! Reordering collections by metadata keys.

use std::cmp::Ordering;
use std::str::FromStr;

use tracing::debug;

use field_metadata::{Metadata, MetadataError, MetadataResult, Value};

use crate::collection::FieldList;

/// Sort direction of one ordering key.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
    /// Rank values by their position in the list; unlisted values come after
    /// listed ones.
    Explicit(Vec<Value>),
}

impl FromStr for Direction {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Direction::Ascending),
            "descending" | "desc" => Ok(Direction::Descending),
            other => Err(MetadataError::Usage(format!(
                "unsupported order direction '{}', expected ascending or descending",
                other
            ))),
        }
    }
}

impl Direction {
    /// Sort key of `value` under this direction, compared ascending.
    fn sort_value(&self, value: Value) -> Value {
        match self {
            Direction::Explicit(order) if !value.is_missing() => {
                let rank = order
                    .iter()
                    .position(|v| v.matches(&value))
                    .unwrap_or(order.len());
                Value::Int(rank as i64)
            }
            _ => value,
        }
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (a.is_missing(), b.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                Direction::Descending => b.natural_cmp(a),
                Direction::Ascending | Direction::Explicit(_) => a.natural_cmp(b),
            },
        }
    }
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
    keys: Vec<(String, Direction)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, key: impl Into<String>, direction: Direction) -> Self {
        self.keys.push((key.into(), direction));
        self
    }

    pub fn ascending(self, key: impl Into<String>) -> Self {
        self.then(key, Direction::Ascending)
    }

    pub fn descending(self, key: impl Into<String>) -> Self {
        self.then(key, Direction::Descending)
    }

    /// Parse `key`, `key:asc`, `key:desc` or `key=a/b/c` (explicit order).
    pub fn parse_key(text: &str) -> MetadataResult<(String, Direction)> {
        if let Some((key, values)) = text.split_once('=') {
            let order = values
                .split('/')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Value::from_token)
                .collect::<Vec<_>>();
            return Ok((check_key(key, text)?, Direction::Explicit(order)));
        }

        match text.split_once(':') {
            Some((key, dir)) => Ok((check_key(key, text)?, dir.parse()?)),
            None => Ok((check_key(text, text)?, Direction::Ascending)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Direction)> {
        self.keys.iter().map(|(k, d)| (k.as_str(), d))
    }

    fn extract(&self, metadata: &dyn Metadata) -> Vec<Value> {
        self.keys
            .iter()
            .map(|(key, direction)| direction.sort_value(metadata.get(key)))
            .collect()
    }

    fn compare(&self, a: &[Value], b: &[Value]) -> Ordering {
        self.keys
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, direction), (a, b))| direction.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

fn check_key(key: &str, text: &str) -> MetadataResult<String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(MetadataError::Usage(format!("empty order key in '{}'", text)));
    }
    Ok(key.to_string())
}

impl<K: Into<String>> FromIterator<(K, Direction)> for OrderBy {
    fn from_iter<I: IntoIterator<Item = (K, Direction)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(|(k, d)| (k.into(), d)).collect(),
        }
    }
}

impl FieldList {
    /// The same fields sorted by `order`. Ties keep their original order and
    /// fields missing a key sort after the others for that key.
    pub fn order_by(&self, order: &OrderBy) -> FieldList {
        if order.is_empty() {
            return self.clone();
        }

        let mut keyed: Vec<_> = self
            .iter()
            .map(|f| (order.extract(f.metadata()), f))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| order.compare(a, b));

        debug!(fields = keyed.len(), keys = order.keys.len(), "Ordered fields");
        keyed.into_iter().map(|(_, f)| f.clone()).collect()
    }
}
