//! Core domain entities.
//!
//! - [`PathRecord`] - A `{path, url}` pair parsed from a configuration document

pub mod path_record;

pub use path_record::{PathRecord, fold_records};
