//! # cm-av
//!
//! Audio/video command construction and external tool management for
//! clipmux.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the path to ffmpeg.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Format validation** ([`validate_format`]) -- extension checks for
//!   audio and video inputs.
//! - **Presets** ([`Preset`]) -- named output framings and their filters.
//! - **Combine** ([`CombineSpec`], [`run_combine`]) -- the audio + video mux
//!   pipeline itself.

pub mod combine;
pub mod command;
pub mod format;
pub mod preset;
pub mod tools;

// ---- Re-exports for convenience ----

pub use combine::{run_combine, CombineSpec, OUTPUT_FORMAT};
pub use command::{ExecutionOutcome, ToolCommand};
pub use format::validate_format;
pub use preset::Preset;
pub use tools::{ToolInfo, ToolRegistry};
