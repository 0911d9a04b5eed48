//! Response bodies serialized by the HTTP layer.

pub mod health;
