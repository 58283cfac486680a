//! cm-core: shared errors, configuration, and media-domain types.
//!
//! This crate is the foundational dependency for the other cm-* crates.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::MediaKind;
