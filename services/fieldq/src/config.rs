//! Query configuration assembled from command line arguments.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use field_metadata::MetadataProfile;
use fieldlist::{FieldList, JsonLinesReader, MetadataKind, OrderBy, Selection};

/// Path standing for standard input.
pub const STDIN_PATH: &str = "-";

/// Everything needed to load and shape a collection before a command runs.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub kind: MetadataKind,
    pub profile: Arc<MetadataProfile>,
    pub inputs: Vec<PathBuf>,
    pub selection: Selection,
    pub order: OrderBy,
}

impl QueryConfig {
    /// Build from raw argument values.
    ///
    /// Without an explicit profile file the profile named by
    /// `FIELDKIT_PROFILE` is used, falling back to the built-in GRIB profile.
    pub fn from_args(
        kind: MetadataKind,
        profile: Option<&Path>,
        inputs: Vec<PathBuf>,
        sel: &[String],
        order_by: &[String],
    ) -> Result<Self> {
        let profile = match profile {
            Some(path) => Arc::new(
                MetadataProfile::from_file(path)
                    .with_context(|| format!("Failed to load profile {}", path.display()))?,
            ),
            None => MetadataProfile::from_env().context("Failed to load profile from environment")?,
        };

        let selection = sel
            .iter()
            .map(|pair| Selection::parse_pair(pair))
            .collect::<Result<Selection, _>>()
            .context("Invalid --sel")?;

        let order = order_by
            .iter()
            .map(|key| OrderBy::parse_key(key))
            .collect::<Result<OrderBy, _>>()
            .context("Invalid --order-by")?;

        debug!(
            kind = ?kind,
            inputs = inputs.len(),
            constraints = sel.len(),
            order_keys = order_by.len(),
            "Query configuration"
        );

        Ok(Self {
            kind,
            profile,
            inputs,
            selection,
            order,
        })
    }

    /// Read every input, concatenate, then apply selection and ordering.
    pub fn load(&self) -> Result<FieldList> {
        let reader = JsonLinesReader::new(self.kind).with_profile(Arc::clone(&self.profile));

        let mut lists = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let fields = if input.as_os_str() == STDIN_PATH {
                reader
                    .read(std::io::stdin().lock())
                    .context("Failed to read standard input")?
            } else {
                reader
                    .read_path(input)
                    .with_context(|| format!("Failed to read {}", input.display()))?
            };
            lists.push(fields);
        }

        let mut fields = FieldList::concat(lists);
        if !self.selection.is_empty() {
            fields = fields.sel(&self.selection);
        }
        if !self.order.is_empty() {
            fields = fields.order_by(&self.order);
        }

        info!(fields = fields.len(), "Loaded field collection");
        Ok(fields)
    }
}
