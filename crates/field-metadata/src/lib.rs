//! Field metadata: an immutable, format-agnostic key/value view.
//!
//! Every field carries exactly one [`Metadata`] object. The trait covers the
//! point lookup a concrete kind has to provide and layers the shared behavior
//! on top of it: computed ("custom") keys such as `datetime`, best-effort
//! type casts, namespace projection and the declared key lists used for
//! listing and indexing.
//!
//! Two concrete kinds live here:
//!
//! - [`RawMetadata`]: a plain ordered key/value store with no namespaces and no
//!   time support.
//! - [`GribMetadata`]: decoded GRIB-style keys described by a
//!   [`MetadataProfile`] (namespaces, `ls`/`describe`/`index` keys) with
//!   base/valid time computation and a geography descriptor.
//!
//! ```rust
//! use field_metadata::{Metadata, MetadataUpdate, RawMetadata};
//!
//! let md: RawMetadata = [("shortName", "2t")].into_iter().collect();
//! let md2 = md.overridden(&MetadataUpdate::new().set("perturbationNumber", 5));
//!
//! assert_eq!(md2.get("perturbationNumber").as_i64(), Some(5));
//! assert!(!md.contains("perturbationNumber"));
//! ```

mod custom;
pub mod grib;
pub mod metadata;
pub mod namespace;
pub mod profile;
pub mod raw;
pub mod store;
pub mod update;

pub use custom::{CUSTOM_KEYS, DATETIME};
pub use grib::GribMetadata;
pub use metadata::{same_content, DatetimePair, GetOptions, KeyValues, Metadata};
pub use namespace::{query, MetadataRequest, MetadataView, NamespaceSelector, ALL_NAMESPACES};
pub use profile::{MetadataProfile, NamespaceDef};
pub use raw::RawMetadata;
pub use store::KeyValueStore;
pub use update::MetadataUpdate;

pub use field_common::{MetadataError, MetadataResult, Value, ValueType};
