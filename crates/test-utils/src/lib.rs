//! Shared test utilities for the fieldkit workspace.
//!
//! This crate provides common testing infrastructure including:
//! - GRIB-like field fixtures (`tuv_pl`, `ml_data`)
//! - JSON-lines input generators
//! - Assertion helpers for index results
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{tuv_pl, assert_index_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

pub use field_metadata;

/// Assert that an index entry holds exactly the given values.
///
/// # Usage
///
/// ```ignore
/// use test_utils::{assert_index_eq, ints};
///
/// let r = tuv_pl().indices(None, false);
/// assert_index_eq!(r, "levelist", ints(&[300, 400, 500, 700, 850, 1000]));
/// ```
#[macro_export]
macro_rules! assert_index_eq {
    ($indices:expr, $key:expr, $expected:expr) => {{
        let expected: Vec<$crate::field_metadata::Value> = $expected;
        match $indices.get($key) {
            Some(values) => assert_eq!(
                values,
                expected.as_slice(),
                "index mismatch for key '{}'",
                $key
            ),
            None => panic!("key '{}' missing from indices", $key),
        }
    }};
}
