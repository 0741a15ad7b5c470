//! Caller-facing metadata queries: a key and/or namespaces in, a view out.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use field_common::{MetadataError, MetadataResult, Value, ValueType};

use crate::metadata::{GetOptions, KeyValues, Metadata};

/// Wildcard marker selecting every declared namespace.
pub const ALL_NAMESPACES: &str = "*";

/// Which namespaces a query projects onto.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamespaceSelector {
    /// No namespace: every stored item.
    #[default]
    Everything,
    /// Every declared namespace, grouped by name.
    All,
    One(String),
    Many(Vec<String>),
}

impl NamespaceSelector {
    /// Build a selector from a list of names. `[]`, `[""]` mean everything
    /// and a lone wildcard means all namespaces.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        match names.len() {
            0 => NamespaceSelector::Everything,
            1 => {
                let name = names.remove(0);
                match name.as_str() {
                    "" => NamespaceSelector::Everything,
                    ALL_NAMESPACES => NamespaceSelector::All,
                    _ => NamespaceSelector::One(name),
                }
            }
            _ => NamespaceSelector::Many(names),
        }
    }
}

impl FromStr for NamespaceSelector {
    type Err = MetadataError;

    /// `""`, `"*"`, `"time"` or a comma separated list `"time,vertical"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(',') {
            let names: Vec<&str> = s.split(',').map(str::trim).collect();
            if names.iter().any(|n| n.is_empty() || *n == ALL_NAMESPACES) {
                return Err(MetadataError::Usage(format!(
                    "invalid namespace list '{}'",
                    s
                )));
            }
            return Ok(NamespaceSelector::Many(
                names.into_iter().map(str::to_string).collect(),
            ));
        }
        Ok(NamespaceSelector::from_names([s]))
    }
}

/// Arguments of a metadata query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRequest {
    pub key: Option<String>,
    pub namespace: NamespaceSelector,
    pub astype: Option<ValueType>,
    /// Returned instead of failing when `key` cannot be resolved.
    pub default: Option<Value>,
}

impl MetadataRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn namespace(mut self, namespace: NamespaceSelector) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn astype(mut self, ty: ValueType) -> Self {
        self.astype = Some(ty);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    fn get_options(&self) -> GetOptions {
        GetOptions {
            default: self.default.clone().unwrap_or_default(),
            astype: self.astype,
            raise_on_missing: self.default.is_none(),
        }
    }
}

/// Result of a metadata query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataView {
    Scalar(Value),
    Flat(KeyValues),
    Grouped(BTreeMap<String, KeyValues>),
}

impl MetadataView {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            MetadataView::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_flat(&self) -> Option<&KeyValues> {
        match self {
            MetadataView::Flat(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&BTreeMap<String, KeyValues>> {
        match self {
            MetadataView::Grouped(groups) => Some(groups),
            _ => None,
        }
    }
}

fn grouped<'a>(md: &dyn Metadata, names: impl IntoIterator<Item = &'a str>) -> MetadataView {
    MetadataView::Grouped(
        names
            .into_iter()
            .map(|name| (name.to_string(), md.as_namespace(Some(name))))
            .collect(),
    )
}

/// Run `request` against one metadata object.
pub fn query(md: &dyn Metadata, request: &MetadataRequest) -> MetadataResult<MetadataView> {
    let key = match &request.key {
        Some(key) => key,
        None => {
            return Ok(match &request.namespace {
                NamespaceSelector::Everything => MetadataView::Flat(md.as_namespace(None)),
                NamespaceSelector::One(name) => {
                    MetadataView::Flat(md.as_namespace(Some(name.as_str())))
                }
                NamespaceSelector::Many(names) => grouped(md, names.iter().map(String::as_str)),
                NamespaceSelector::All => grouped(md, md.namespaces()),
            })
        }
    };

    let opts = request.get_options();
    match &request.namespace {
        NamespaceSelector::Everything => md.get_with(key, &opts).map(MetadataView::Scalar),
        NamespaceSelector::One(name) => {
            let found = md
                .as_namespace(Some(name.as_str()))
                .remove(key.as_str())
                .filter(|v| !v.is_missing());
            match found {
                Some(value) => Ok(MetadataView::Scalar(match request.astype {
                    Some(ty) => value.cast(ty).unwrap_or(Value::Missing),
                    None => value,
                })),
                None if opts.raise_on_missing => Err(MetadataError::KeyNotFound {
                    key: key.clone(),
                    reason: Some(format!("not in namespace '{}'", name)),
                }),
                None => Ok(MetadataView::Scalar(opts.default)),
            }
        }
        NamespaceSelector::Many(_) | NamespaceSelector::All => Err(MetadataError::Usage(
            "namespace must be a str when key specified".to_string(),
        )),
    }
}
