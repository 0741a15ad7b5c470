//! A field: one data record carrying exactly one metadata object.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use field_metadata::{query, Metadata, MetadataRequest, MetadataResult, MetadataView, RawMetadata};

/// Deferred metadata decoding, run at most once per field.
pub type MetadataLoader = Box<dyn Fn() -> MetadataResult<Box<dyn Metadata>> + Send + Sync>;

struct FieldInner {
    metadata: OnceCell<Box<dyn Metadata>>,
    loader: Option<MetadataLoader>,
}

/// Shared handle to a field.
///
/// Cloning is cheap and keeps pointing at the same record, which is how
/// derived collections share fields with the collection they came from.
#[derive(Clone)]
pub struct Field {
    inner: Arc<FieldInner>,
}

impl Field {
    /// A field whose metadata is already available.
    pub fn new<M: Metadata + 'static>(metadata: M) -> Self {
        Self::from_boxed(Box::new(metadata))
    }

    pub fn from_boxed(metadata: Box<dyn Metadata>) -> Self {
        Self {
            inner: Arc::new(FieldInner {
                metadata: OnceCell::with_value(metadata),
                loader: None,
            }),
        }
    }

    /// A field whose metadata is decoded on first access.
    ///
    /// If the loader fails the field behaves as if it had no keys.
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> MetadataResult<Box<dyn Metadata>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(FieldInner {
                metadata: OnceCell::new(),
                loader: Some(Box::new(loader)),
            }),
        }
    }

    pub fn metadata(&self) -> &dyn Metadata {
        self.inner
            .metadata
            .get_or_init(|| match &self.inner.loader {
                Some(load) => load().unwrap_or_else(|err| {
                    warn!(error = %err, "Failed to load field metadata");
                    Box::new(RawMetadata::new()) as Box<dyn Metadata>
                }),
                None => Box::new(RawMetadata::new()) as Box<dyn Metadata>,
            })
            .as_ref()
    }

    /// Whether the metadata has been materialized.
    pub fn is_loaded(&self) -> bool {
        self.inner.metadata.get().is_some()
    }

    /// Run a caller-facing metadata query against this field.
    pub fn query_metadata(&self, request: &MetadataRequest) -> MetadataResult<MetadataView> {
        query(self.metadata(), request)
    }

    /// Whether both handles refer to the same field.
    pub fn ptr_eq(a: &Field, b: &Field) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.metadata.get() {
            Some(md) => f.debug_struct("Field").field("metadata", md).finish(),
            None => f.debug_struct("Field").field("metadata", &"<not loaded>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use field_metadata::{MetadataError, Value};

    #[test]
    fn test_lazy_loader_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let field = Field::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let md: RawMetadata = [("shortName", "t")].into_iter().collect();
            Ok(Box::new(md) as Box<dyn Metadata>)
        });

        assert!(!field.is_loaded());
        assert_eq!(field.metadata().get("shortName"), Value::from("t"));
        assert_eq!(field.clone().metadata().get("shortName"), Value::from("t"));
        assert!(field.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_loader_yields_empty_metadata() {
        let field = Field::lazy(|| Err(MetadataError::Computation("corrupt message".into())));
        assert!(field.metadata().is_empty());
    }

    #[test]
    fn test_clones_share_identity() {
        let a = Field::new(RawMetadata::new());
        let b = a.clone();
        let c = Field::new(RawMetadata::new());
        assert!(Field::ptr_eq(&a, &b));
        assert!(!Field::ptr_eq(&a, &c));
    }
}
