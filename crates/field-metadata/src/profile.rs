//! Metadata profiles: declared namespaces and key lists of a metadata kind.
//!
//! A profile tells the rest of the system how to list, describe and index
//! fields of one data format, and which keys belong to which semantic
//! namespace. The GRIB profile is built in; others can be loaded from YAML:
//!
//! ```yaml
//! data_format: netcdf
//! namespaces:
//!   - name: vertical
//!     keys: [level, levtype]
//!   - name: default      # an empty key list covers every stored key
//! ls_keys: [variable, level]
//! index_keys: [variable, level, time]
//! ```

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use field_common::{MetadataError, MetadataResult};

/// Environment variable naming a YAML profile to use instead of the built-in one.
pub const PROFILE_ENV: &str = "FIELDKIT_PROFILE";

/// A named subset of metadata keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDef {
    pub name: String,
    /// Keys in this namespace. Empty means every stored key.
    #[serde(default)]
    pub keys: Vec<String>,
}

/// Declared configuration of a metadata kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataProfile {
    #[serde(default)]
    pub data_format: Option<String>,
    #[serde(default)]
    pub namespaces: Vec<NamespaceDef>,
    #[serde(default)]
    pub ls_keys: Vec<String>,
    #[serde(default)]
    pub describe_keys: Vec<String>,
    #[serde(default)]
    pub index_keys: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

fn namespace(name: &str, list: &[&str]) -> NamespaceDef {
    NamespaceDef {
        name: name.to_string(),
        keys: keys(list),
    }
}

static GRIB_PROFILE: Lazy<Arc<MetadataProfile>> = Lazy::new(|| {
    let ls = [
        "centre",
        "shortName",
        "typeOfLevel",
        "level",
        "dataDate",
        "dataTime",
        "stepRange",
        "dataType",
        "number",
        "gridType",
    ];

    Arc::new(MetadataProfile {
        data_format: Some("grib".to_string()),
        namespaces: vec![
            namespace(
                "geography",
                &[
                    "gridType",
                    "Ni",
                    "Nj",
                    "latitudeOfFirstGridPointInDegrees",
                    "longitudeOfFirstGridPointInDegrees",
                    "latitudeOfLastGridPointInDegrees",
                    "longitudeOfLastGridPointInDegrees",
                    "iDirectionIncrementInDegrees",
                    "jDirectionIncrementInDegrees",
                    "iScansNegatively",
                    "jScansPositively",
                ],
            ),
            namespace("vertical", &["typeOfLevel", "level"]),
            namespace(
                "time",
                &[
                    "dataDate",
                    "dataTime",
                    "stepUnits",
                    "stepType",
                    "stepRange",
                    "startStep",
                    "endStep",
                    "validityDate",
                    "validityTime",
                ],
            ),
            namespace(
                "parameter",
                &["centre", "paramId", "shortName", "units", "name", "cfName", "cfVarName"],
            ),
            namespace(
                "mars",
                &[
                    "class", "stream", "levtype", "type", "expver", "date", "time", "domain",
                    "number", "levelist", "param", "step",
                ],
            ),
            namespace("ls", &ls),
            namespace("default", &[]),
        ],
        ls_keys: keys(&ls),
        describe_keys: keys(&[
            "shortName",
            "typeOfLevel",
            "level",
            "date",
            "time",
            "step",
            "number",
            "paramId",
            "class",
            "stream",
            "type",
            "experimentVersionNumber",
        ]),
        index_keys: keys(&[
            "class", "stream", "levtype", "type", "expver", "date", "time", "domain", "number",
            "levelist", "param",
        ]),
    })
});

impl MetadataProfile {
    /// The built-in GRIB profile.
    pub fn grib() -> Arc<MetadataProfile> {
        GRIB_PROFILE.clone()
    }

    /// Parse and validate a YAML profile.
    pub fn from_yaml_str(yaml: &str) -> MetadataResult<Self> {
        let profile: MetadataProfile = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a YAML profile from disk.
    pub fn from_file(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let profile = Self::from_yaml_str(&content)?;
        info!(
            path = %path.display(),
            namespaces = profile.namespaces.len(),
            "Loaded metadata profile"
        );
        Ok(profile)
    }

    /// The profile named by `FIELDKIT_PROFILE`, or the built-in GRIB profile.
    pub fn from_env() -> MetadataResult<Arc<MetadataProfile>> {
        match std::env::var(PROFILE_ENV) {
            Ok(path) if !path.is_empty() => Ok(Arc::new(Self::from_file(path)?)),
            _ => {
                debug!("No {} set, using built-in GRIB profile", PROFILE_ENV);
                Ok(Self::grib())
            }
        }
    }

    /// Validate the profile.
    pub fn validate(&self) -> MetadataResult<()> {
        for (i, ns) in self.namespaces.iter().enumerate() {
            if ns.name.is_empty() {
                return Err(MetadataError::Config(format!(
                    "namespace #{} has an empty name",
                    i
                )));
            }
            if self.namespaces[..i].iter().any(|other| other.name == ns.name) {
                return Err(MetadataError::Config(format!(
                    "namespace '{}' is declared twice",
                    ns.name
                )));
            }
        }

        for (i, key) in self.index_keys.iter().enumerate() {
            if self.index_keys[..i].contains(key) {
                return Err(MetadataError::Config(format!(
                    "index key '{}' is declared twice",
                    key
                )));
            }
        }

        Ok(())
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceDef> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn namespace_names(&self) -> Vec<&str> {
        self.namespaces.iter().map(|ns| ns.name.as_str()).collect()
    }
}
