//! In-memory resolver backed by a fixed mapping.

use crate::domain::entities::{PathRecord, fold_records};
use crate::domain::{Resolution, Resolver};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Entries served by the built-in static map at the end of the chain.
pub const DEFAULT_PATHS: &[(&str, &str)] = &[
    (
        "/urlshort-godoc",
        "https://godoc.org/github.com/gophercises/urlshort",
    ),
    ("/yaml-godoc", "https://godoc.org/gopkg.in/yaml.v2"),
];

/// Resolves paths against a mapping supplied at construction.
///
/// A path mapped to an empty destination does not match.
///
/// The mapping is immutable after construction, so a single instance can be
/// shared across request tasks without locking.
#[derive(Debug, Clone)]
pub struct StaticMapResolver {
    name: &'static str,
    paths_to_urls: HashMap<String, String>,
}

impl StaticMapResolver {
    /// Creates a resolver over `paths_to_urls`.
    pub fn new(paths_to_urls: HashMap<String, String>) -> Self {
        Self {
            name: "static_map",
            paths_to_urls,
        }
    }

    /// Builds the mapping from records; the last record for a path wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PathRecord>,
    {
        Self::new(fold_records(records))
    }

    /// A resolver that never matches.
    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    /// The two built-in entries from [`DEFAULT_PATHS`].
    pub fn defaults() -> Self {
        DEFAULT_PATHS.iter().copied().collect()
    }

    /// Overrides the name reported in logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn len(&self) -> usize {
        self.paths_to_urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths_to_urls.is_empty()
    }

    /// Synchronous lookup used by [`Resolver::resolve`].
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.paths_to_urls.get(path).map(String::as_str)
    }
}

impl Default for StaticMapResolver {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> FromIterator<(K, V)> for StaticMapResolver
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(path, url)| (path.into(), url.into()))
                .collect(),
        )
    }
}

#[async_trait]
impl Resolver for StaticMapResolver {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn resolve(&self, path: &str) -> Resolution {
        match self.lookup(path) {
            Some(destination) if !destination.is_empty() => {
                debug!(resolver = self.name, "{} -> {}", path, destination);
                Resolution::Match(destination.to_string())
            }
            _ => Resolution::NoMatch,
        }
    }
}
