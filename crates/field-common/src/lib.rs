//! Common types and utilities shared across the fieldkit crates.

pub mod error;
pub mod geography;
pub mod time;
pub mod value;

pub use error::{MetadataError, MetadataResult};
pub use geography::{BoundingBox, Geography};
pub use time::{format_iso8601, ForecastTime, TimeParseError};
pub use value::{Value, ValueType};
