//! biospace-common: Shared types and errors used across all BioSpace crates.

pub mod error;
pub mod publication;

// Re-export commonly used types
pub use error::{BiospaceError, Result};
pub use publication::{Publication, DEFAULT_AUTHOR, DEFAULT_TOPIC, NO_SUMMARY};
