//! Declarative redirect configuration in YAML.
//!
//! A document is a list of records:
//!
//! ```yaml
//! - path: /urlshort
//!   url: https://github.com/gophercises/urlshort
//! - path: /urlshort-final
//!   url: https://github.com/gophercises/urlshort/tree/solution
//! ```
//!
//! Records are folded into a [`StaticMapResolver`]. Malformed records (missing
//! or empty fields) are kept as empty strings; only broken document syntax is an
//! error.

use super::static_map::StaticMapResolver;
use crate::domain::entities::PathRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Document served by the YAML source when no `REDIRECTS_FILE` is configured.
pub const DEFAULT_DOCUMENT: &str = "\
- path: /urlshort
  url: https://github.com/gophercises/urlshort
- path: /urlshort-final
  url: https://github.com/gophercises/urlshort/tree/solution
";

/// Errors raised while loading a redirect document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("Invalid redirect document: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("Failed to read redirect document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parses a YAML document into path records.
///
/// An empty document (or an explicit `null`) yields no records.
///
/// # Errors
///
/// Returns [`ConfigParseError::Syntax`] when the document is not a valid list of
/// mappings.
pub fn parse_records(document: &[u8]) -> Result<Vec<PathRecord>, ConfigParseError> {
    if document.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let records: Option<Vec<PathRecord>> = serde_yaml::from_slice(document)?;
    Ok(records.unwrap_or_default())
}

/// Serializes records back into a YAML document.
pub fn serialize_records(records: &[PathRecord]) -> Result<String, ConfigParseError> {
    Ok(serde_yaml::to_string(records)?)
}

/// Builds the YAML-backed resolver.
///
/// A parse failure still yields a resolver: it is empty, so every request
/// passes through to the next handler. Callers must inspect the returned error
/// before relying on the resolver.
pub fn yaml_resolver(document: &[u8]) -> (StaticMapResolver, Option<ConfigParseError>) {
    match parse_records(document) {
        Ok(records) => {
            let resolver = StaticMapResolver::from_records(records).named("yaml");
            debug!("Loaded {} YAML redirects", resolver.len());
            (resolver, None)
        }
        Err(e) => {
            warn!("YAML redirects disabled: {}", e);
            (StaticMapResolver::empty().named("yaml"), Some(e))
        }
    }
}

/// Reads a redirect document from disk.
pub fn load_document(path: impl AsRef<Path>) -> Result<Vec<u8>, ConfigParseError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| ConfigParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}
