//! Computed ("custom") metadata keys.
//!
//! Custom keys are resolved from other metadata on demand and only when the
//! concrete store does not hold a key of the same name.

use tracing::debug;

use field_common::{format_iso8601, MetadataError, MetadataResult, Value};

use crate::metadata::{GetOptions, Metadata};

/// Valid time of the field as an ISO 8601 string.
pub const DATETIME: &str = "datetime";

/// Keys computed from other keys rather than stored.
pub const CUSTOM_KEYS: &[&str] = &[DATETIME];

/// Compute a custom key. Every failure, including the kind not supporting
/// the computation at all, is reported as an error here and turned into
/// missing-key handling by [`resolve`].
fn compute<M: Metadata + ?Sized>(md: &M, key: &str) -> MetadataResult<Value> {
    match key {
        DATETIME => md
            .valid_datetime()?
            .map(|dt| Value::Str(format_iso8601(&dt)))
            .ok_or_else(|| MetadataError::Computation("valid time is not available".to_string())),
        other => Err(MetadataError::Computation(format!(
            "no resolver for computed key '{}'",
            other
        ))),
    }
}

pub(crate) fn resolve<M: Metadata + ?Sized>(
    md: &M,
    key: &str,
    opts: &GetOptions,
) -> MetadataResult<Value> {
    match compute(md, key) {
        Ok(value) => Ok(match opts.astype {
            Some(ty) => value.cast(ty).unwrap_or(Value::Missing),
            None => value,
        }),
        Err(err) => {
            debug!(key = key, error = %err, "computed key unavailable");
            if opts.raise_on_missing {
                Err(MetadataError::KeyNotFound {
                    key: key.to_string(),
                    reason: Some(err.to_string()),
                })
            } else {
                Ok(opts.default.clone())
            }
        }
    }
}
