//! Domain layer: the resolver capability and the records it is built from.
//!
//! - [`entities`] - Plain data parsed from configuration
//! - [`resolver`] - The [`resolver::Resolver`] trait and [`resolver::Resolution`] outcome
//!
//! The domain layer has no dependency on HTTP or on a storage engine. Concrete
//! resolvers live in [`crate::infrastructure::resolvers`]; composing them into a
//! request pipeline is done in [`crate::application::chain`].

pub mod entities;
pub mod resolver;

pub use resolver::Resolution;
pub use resolver::Resolver;

#[cfg(test)]
pub use resolver::MockResolver;
