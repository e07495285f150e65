//! mq-core: shared movie types, errors, and configuration.
//!
//! This crate is the foundational dependency for the other mq-* crates,
//! providing the flat [`Movie`] record served to clients, validated movie
//! identifiers, catalog query parameters, a unified error type, and the
//! application configuration tree.

pub mod config;
pub mod error;
pub mod movie;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use movie::*;
