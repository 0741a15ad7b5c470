//! Field collections and the query engine over their metadata.
//!
//! Provides:
//! - [`Field`] handles, eager or lazily decoded
//! - [`FieldList`] with concatenation
//! - Indices of distinct values per key, with squeeze
//! - Selection by per-key constraints and ordering by metadata keys
//! - Listing views (`ls`, `describe`, `datetime`)
//!
//! Every operation returns a new collection or a read-only summary; input
//! collections are never modified.

pub mod collection;
pub mod field;
pub mod index;
pub mod listing;
pub mod order;
pub mod reader;
pub mod select;

pub use collection::FieldList;
pub use field::{Field, MetadataLoader};
pub use index::Indices;
pub use listing::{DatetimeSummary, Table};
pub use order::{Direction, OrderBy};
pub use reader::{parse_record, JsonLinesReader, MetadataKind};
pub use select::{Constraint, Selection};
