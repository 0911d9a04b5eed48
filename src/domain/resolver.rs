//! Resolver capability shared by every redirect source.

use async_trait::async_trait;
use std::fmt;

/// Outcome of looking up a request path in one redirect source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The source has a destination for the path.
    Match(String),
    /// The source has no mapping; the next handler should be tried.
    NoMatch,
    /// The source could not answer (e.g. a store read failed).
    Failure(String),
}

impl Resolution {
    /// Returns the destination when this is a match.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Match(destination) => Some(destination),
            _ => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Match(destination) => write!(f, "match -> {}", destination),
            Self::NoMatch => write!(f, "no match"),
            Self::Failure(reason) => write!(f, "failure: {}", reason),
        }
    }
}

/// A source that maps a request path to a destination URL.
///
/// Implementations must be safe to call concurrently from many request tasks.
/// Lookups are exact and case-sensitive; the path includes its leading slash.
///
/// # Implementations
///
/// - [`crate::infrastructure::resolvers::StaticMapResolver`] - In-memory mapping
///   (also backs the YAML source)
/// - [`crate::infrastructure::resolvers::StoreResolver`] - Embedded sled store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Looks up `path` and reports a match, a miss, or a failure.
    async fn resolve(&self, path: &str) -> Resolution;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_only_for_match() {
        assert_eq!(
            Resolution::Match("https://x.test".to_string()).destination(),
            Some("https://x.test")
        );
        assert_eq!(Resolution::NoMatch.destination(), None);
        assert_eq!(Resolution::Failure("boom".to_string()).destination(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Resolution::NoMatch.to_string(), "no match");
        assert_eq!(
            Resolution::Failure("read error".to_string()).to_string(),
            "failure: read error"
        );
    }
}
