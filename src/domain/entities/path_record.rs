//! Path record entity parsed from declarative redirect configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A single `{path, url}` pair from a configuration document.
///
/// Both fields default to an empty string when absent; the parser never
/// rejects a record for missing fields, only a document for broken syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

/// `path:` with no value deserializes as an empty string rather than an error.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl PathRecord {
    /// Creates a new PathRecord instance.
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Folds a record sequence into a path → destination mapping.
///
/// Later records overwrite earlier ones that share the same path.
pub fn fold_records<I>(records: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = PathRecord>,
{
    records
        .into_iter()
        .map(|record| (record.path, record.url))
        .collect()
}
