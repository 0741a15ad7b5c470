//! Query commands and their JSON output.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{json, Value as Json};

use field_metadata::{MetadataRequest, NamespaceSelector, ValueType};
use fieldlist::FieldList;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Distinct values per key
    Indices {
        /// Keys to index (default: the kind's index keys)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Drop keys with a single distinct value
        #[arg(long)]
        squeeze: bool,
    },

    /// Distinct values of one key
    Index { key: String },

    /// Tabulate keys per field
    Ls {
        /// Columns (default: the kind's ls keys)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
    },

    /// Per-parameter summary of the describe keys
    Describe,

    /// Distinct base and valid times
    Datetime,

    /// Per-field metadata, optionally restricted to a key or namespaces
    Metadata {
        #[arg(long)]
        key: Option<String>,

        /// Namespace, comma separated namespaces, or "*" for all
        #[arg(long, default_value = "")]
        namespace: String,

        /// Convert values to str, int or float
        #[arg(long)]
        astype: Option<ValueType>,
    },

    /// Number of fields
    Count,
}

fn keys_arg(keys: &[String]) -> Option<Vec<&str>> {
    (!keys.is_empty()).then(|| keys.iter().map(String::as_str).collect())
}

/// Run `command` over `fields` and render the result as JSON.
pub fn run(command: &Command, fields: &FieldList) -> Result<Json> {
    let output = match command {
        Command::Indices { keys, squeeze } => {
            let keys = keys_arg(keys);
            serde_json::to_value(fields.indices(keys.as_deref(), *squeeze))?
        }
        Command::Index { key } => serde_json::to_value(fields.index(key))?,
        Command::Ls { keys } => {
            let keys = keys_arg(keys);
            serde_json::to_value(fields.ls(keys.as_deref()))?
        }
        Command::Describe => serde_json::to_value(fields.describe())?,
        Command::Datetime => serde_json::to_value(fields.datetime())?,
        Command::Metadata {
            key,
            namespace,
            astype,
        } => {
            let mut request = MetadataRequest::new().namespace(
                namespace
                    .parse::<NamespaceSelector>()
                    .context("Invalid --namespace")?,
            );
            if let Some(key) = key {
                request = request.key(key.clone());
            }
            if let Some(ty) = astype {
                request = request.astype(*ty);
            }
            serde_json::to_value(fields.metadata(&request)?)?
        }
        Command::Count => json!({ "count": fields.len() }),
    };
    Ok(output)
}
