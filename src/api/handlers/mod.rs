//! HTTP request handlers.

pub mod greeting;
pub mod health;

pub use greeting::{GREETING, default_handler, greeting_handler};
pub use health::health_handler;
