//! The `Metadata` trait and the behavior shared by every concrete kind.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use field_common::{Geography, MetadataError, MetadataResult, Value, ValueType};

use crate::custom;
use crate::update::MetadataUpdate;

/// Key/value mapping returned by namespace projections.
pub type KeyValues = BTreeMap<String, Value>;

/// Options for [`Metadata::get_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetOptions {
    /// Returned when the key is absent or missing and `raise_on_missing` is off.
    pub default: Value,
    /// Requested access type. Cast failures yield `Value::Missing`.
    pub astype: Option<ValueType>,
    /// Fail with `KeyNotFound` instead of returning `default`.
    pub raise_on_missing: bool,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn astype(mut self, ty: ValueType) -> Self {
        self.astype = Some(ty);
        self
    }

    pub fn raise_on_missing(mut self) -> Self {
        self.raise_on_missing = true;
        self
    }
}

/// Base and valid time of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatetimePair {
    pub base_time: Option<DateTime<Utc>>,
    pub valid_time: Option<DateTime<Utc>>,
}

/// Immutable key/value metadata of one field.
///
/// Implementors provide the concrete point lookup and enumeration; the
/// provided methods implement key resolution (custom keys, casts, defaults),
/// time access and namespace projection on top of them. Any change goes
/// through [`Metadata::with_overrides`], which returns a new object.
pub trait Metadata: fmt::Debug + Send + Sync {
    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is concretely stored. Custom keys are not reported.
    fn contains(&self, key: &str) -> bool;

    /// Stored keys in a stable, implementation-defined order.
    fn keys(&self) -> Vec<String>;

    /// Stored key/value pairs, in the same order as [`Metadata::keys`].
    fn items(&self) -> Vec<(String, Value)>;

    /// Concrete point lookup. `None` when the key is not stored.
    fn lookup(&self, key: &str) -> Option<Value>;

    /// Whether [`Metadata::lookup_as`] converts natively during lookup.
    fn supports_native_astype(&self) -> bool {
        false
    }

    /// Typed lookup. `None` when the key is absent or holds a missing value,
    /// `Some(Value::Missing)` when the stored value cannot be converted.
    fn lookup_as(&self, key: &str, ty: ValueType) -> Option<Value> {
        self.lookup(key)
            .filter(|v| !v.is_missing())
            .map(|v| v.cast(ty).unwrap_or(Value::Missing))
    }

    /// Return a new metadata object of the same kind with `update` merged on
    /// top of a copy of this one.
    fn with_overrides(&self, update: &MetadataUpdate) -> Box<dyn Metadata>;

    /// Model run time, or `None` when this kind has no notion of time.
    fn base_datetime(&self) -> MetadataResult<Option<DateTime<Utc>>>;

    /// Valid time, or `None` when this kind has no notion of time.
    fn valid_datetime(&self) -> MetadataResult<Option<DateTime<Utc>>>;

    fn data_format(&self) -> Option<&str> {
        None
    }

    /// Declared namespace names.
    fn namespaces(&self) -> Vec<&str> {
        Vec::new()
    }

    fn ls_keys(&self) -> &[String] {
        &[]
    }

    fn describe_keys(&self) -> &[String] {
        &[]
    }

    fn index_keys(&self) -> &[String] {
        &[]
    }

    fn geography(&self) -> Option<Geography> {
        None
    }

    /// All keys/values of `namespace`. `None` or `""` returns every stored
    /// item; the base behavior knows no named namespaces.
    fn as_namespace(&self, namespace: Option<&str>) -> KeyValues {
        match namespace {
            None | Some("") => self.items().into_iter().collect(),
            Some(_) => KeyValues::new(),
        }
    }

    /// A key is custom when it is computed and not concretely stored.
    fn is_custom_key(&self, key: &str) -> bool {
        custom::CUSTOM_KEYS.contains(&key) && !self.contains(key)
    }

    /// Resolve `key` with explicit options.
    fn get_with(&self, key: &str, opts: &GetOptions) -> MetadataResult<Value> {
        if self.is_custom_key(key) {
            return custom::resolve(self, key, opts);
        }

        let found = match opts.astype {
            Some(ty) if self.supports_native_astype() => self.lookup_as(key, ty),
            Some(ty) => self
                .lookup(key)
                .filter(|v| !v.is_missing())
                .map(|v| v.cast(ty).unwrap_or(Value::Missing)),
            None => self.lookup(key).filter(|v| !v.is_missing()),
        };

        match found {
            Some(v) => Ok(v),
            None if opts.raise_on_missing => Err(MetadataError::key_not_found(key)),
            None => Ok(opts.default.clone()),
        }
    }

    /// Value of `key`, or `Value::Missing`.
    fn get(&self, key: &str) -> Value {
        self.get_or(key, Value::Missing)
    }

    /// Value of `key`, or `default`.
    fn get_or(&self, key: &str, default: Value) -> Value {
        let opts = GetOptions {
            default,
            ..GetOptions::default()
        };
        self.get_with(key, &opts).unwrap_or(Value::Missing)
    }

    /// Value of `key` converted to `ty`; `Value::Missing` if absent or not convertible.
    fn get_as(&self, key: &str, ty: ValueType) -> Value {
        self.get_with(key, &GetOptions::new().astype(ty))
            .unwrap_or(Value::Missing)
    }

    /// Subscript access: fails with `KeyNotFound` when the key is unavailable.
    fn require(&self, key: &str) -> MetadataResult<Value> {
        self.get_with(key, &GetOptions::new().raise_on_missing())
    }

    fn datetime(&self) -> MetadataResult<DatetimePair> {
        Ok(DatetimePair {
            base_time: self.base_datetime()?,
            valid_time: self.valid_datetime()?,
        })
    }
}

/// Compare the stored key/value content of two metadata objects.
pub fn same_content(a: &dyn Metadata, b: &dyn Metadata) -> bool {
    a.len() == b.len()
        && a
            .items()
            .iter()
            .all(|(k, v)| b.lookup(k).as_ref() == Some(v))
}
