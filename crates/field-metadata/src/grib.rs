//! GRIB-style metadata held in memory.
//!
//! A decoder collaborator extracts the keys of a GRIB message and hands them
//! over as a [`GribMetadata`]. Namespaces and key lists come from a
//! [`MetadataProfile`], the built-in GRIB profile by default.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use field_common::time::parse_date_time;
use field_common::{
    BoundingBox, ForecastTime, Geography, MetadataError, MetadataResult, Value, ValueType,
};

use crate::metadata::{KeyValues, Metadata};
use crate::profile::MetadataProfile;
use crate::store::KeyValueStore;
use crate::update::MetadataUpdate;

const BASE_DATE_KEYS: &[&str] = &["dataDate", "date"];
const BASE_TIME_KEYS: &[&str] = &["dataTime", "time"];
const STEP_KEYS: &[&str] = &["endStep", "step"];

/// Integer GRIB keys with all bits of four octets set are missing.
const MISSING_INT: i64 = 2_147_483_647;

/// Spelling of a missing value in string GRIB keys.
const MISSING_STR: &str = "MISSING";

/// Whether a stored value is one of GRIB's missing markers.
fn is_grib_missing(value: &Value) -> bool {
    match value {
        Value::Missing => true,
        Value::Int(i) => *i == MISSING_INT,
        Value::Str(s) => s.eq_ignore_ascii_case(MISSING_STR),
        Value::Float(_) => false,
    }
}

/// Typed read the way a GRIB decoder converts keys. Ranges such as
/// `stepRange = "0-6"` read as numbers give their end value.
fn native_cast(value: &Value, ty: ValueType) -> Option<Value> {
    match (ty, value) {
        (ValueType::Int | ValueType::Float, Value::Str(s)) => {
            let end = match s.split_once('-') {
                Some((start, end))
                    if start.trim().parse::<f64>().is_ok() && end.trim().parse::<f64>().is_ok() =>
                {
                    end
                }
                _ => s.as_str(),
            };
            Value::Str(end.to_string()).cast(ty)
        }
        _ => value.cast(ty),
    }
}

/// Metadata of one decoded GRIB message.
#[derive(Debug, Clone)]
pub struct GribMetadata {
    store: KeyValueStore,
    profile: Arc<MetadataProfile>,
}

impl GribMetadata {
    pub fn from_update(update: &MetadataUpdate) -> Self {
        Self {
            store: KeyValueStore::from(update),
            profile: MetadataProfile::grib(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::from_update(&MetadataUpdate::new().merge_pairs(pairs))
    }

    /// Replace the profile describing namespaces and key lists.
    pub fn with_profile(mut self, profile: Arc<MetadataProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &MetadataProfile {
        &self.profile
    }

    /// A copy of `self` with `update` merged on top. The profile is shared.
    pub fn overridden(&self, update: &MetadataUpdate) -> Self {
        let mut store = self.store.clone();
        store.apply(update);
        Self {
            store,
            profile: Arc::clone(&self.profile),
        }
    }

    /// First present, non-missing key from `candidates`, as an integer.
    fn int_of(&self, candidates: &[&str]) -> MetadataResult<Option<i64>> {
        for key in candidates {
            match self.store.get(key) {
                None | Some(Value::Missing) => continue,
                Some(v) => {
                    return v
                        .cast(ValueType::Int)
                        .and_then(|v| v.as_i64())
                        .map(Some)
                        .ok_or_else(|| {
                            MetadataError::Computation(format!("{}={} is not an integer", key, v))
                        })
                }
            }
        }
        Ok(None)
    }

    fn float_of(&self, key: &str) -> Option<f64> {
        self.store.get(key).and_then(Value::as_f64)
    }
}

impl PartialEq for GribMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl Metadata for GribMetadata {
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

    fn supports_native_astype(&self) -> bool {
        true
    }

    /// Missing markers read as absent; range strings read as their end.
    fn lookup_as(&self, key: &str, ty: ValueType) -> Option<Value> {
        self.store
            .get(key)
            .filter(|v| !is_grib_missing(v))
            .map(|v| native_cast(v, ty).unwrap_or(Value::Missing))
    }

    fn with_overrides(&self, update: &MetadataUpdate) -> Box<dyn Metadata> {
        Box::new(self.overridden(update))
    }

    fn base_datetime(&self) -> MetadataResult<Option<DateTime<Utc>>> {
        let date = self
            .int_of(BASE_DATE_KEYS)?
            .ok_or_else(|| MetadataError::Computation("missing dataDate".to_string()))?;
        let time = self.int_of(BASE_TIME_KEYS)?.unwrap_or(0);
        Ok(Some(parse_date_time(date, time)?))
    }

    fn valid_datetime(&self) -> MetadataResult<Option<DateTime<Utc>>> {
        if let (Some(date), Some(time)) = (
            self.int_of(&["validityDate"])?,
            self.int_of(&["validityTime"])?,
        ) {
            return Ok(Some(parse_date_time(date, time)?));
        }

        let base = self
            .base_datetime()?
            .ok_or_else(|| MetadataError::Computation("missing base time".to_string()))?;
        let step = self.int_of(STEP_KEYS)?.unwrap_or(0);
        Ok(Some(ForecastTime::new(base, step).valid_datetime()?))
    }

    fn data_format(&self) -> Option<&str> {
        self.profile.data_format.as_deref()
    }

    fn namespaces(&self) -> Vec<&str> {
        self.profile.namespace_names()
    }

    fn ls_keys(&self) -> &[String] {
        &self.profile.ls_keys
    }

    fn describe_keys(&self) -> &[String] {
        &self.profile.describe_keys
    }

    fn index_keys(&self) -> &[String] {
        &self.profile.index_keys
    }

    fn geography(&self) -> Option<Geography> {
        let first_lat = self.float_of("latitudeOfFirstGridPointInDegrees")?;
        let first_lon = self.float_of("longitudeOfFirstGridPointInDegrees")?;
        let last_lat = self.float_of("latitudeOfLastGridPointInDegrees")?;
        let last_lon = self.float_of("longitudeOfLastGridPointInDegrees")?;

        Some(Geography {
            grid_type: self
                .store
                .get("gridType")
                .and_then(Value::as_str)
                .map(str::to_string),
            bounding_box: BoundingBox::from_grid_corners(first_lat, first_lon, last_lat, last_lon),
        })
    }

    fn as_namespace(&self, namespace: Option<&str>) -> KeyValues {
        let name = match namespace {
            None | Some("") => return self.items().into_iter().collect(),
            Some(name) => name,
        };

        match self.profile.namespace(name) {
            Some(ns) if ns.keys.is_empty() => self.items().into_iter().collect(),
            Some(ns) => ns
                .keys
                .iter()
                .filter_map(|k| self.store.get(k).map(|v| (k.clone(), v.clone())))
                .collect(),
            None => KeyValues::new(),
        }
    }
}
