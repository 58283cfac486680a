//! Route handlers for the HTTP API.

pub mod combine;
pub mod health;
pub mod presets;
pub mod tools;

use crate::error::AppError;

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found() -> AppError {
    AppError::new(cm_core::Error::NotFound)
}
