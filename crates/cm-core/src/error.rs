//! Unified error type for clipmux.
//!
//! Every failure in the combine pipeline is funnelled into [`Error`], which
//! carries enough context for the HTTP layer to pick a status code via
//! [`Error::http_status`].

use std::time::Duration;

use crate::media::MediaKind;

/// Unified error type covering all failure modes in clipmux.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request data failed validation (missing fields, malformed body).
    #[error("{0}")]
    Validation(String),

    /// An input file referenced by the request does not exist.
    #[error("{} file not found: {path}", .kind.label())]
    FileNotFound {
        /// Which input was missing.
        kind: MediaKind,
        /// The path exactly as supplied by the caller.
        path: String,
    },

    /// An input file's extension is not in the accepted set for its kind.
    #[error(
        "Unsupported {kind} format. Supported formats: {}",
        .kind.format_names().join(", ")
    )]
    UnsupportedFormat {
        /// Which input was rejected.
        kind: MediaKind,
    },

    /// No route matches the request.
    #[error("Not found")]
    NotFound,

    /// An external tool ran past its deadline and was killed.
    #[error("{tool} timed out after {}s", .after.as_secs())]
    Timeout {
        /// Name of the tool that was killed.
        tool: String,
        /// The deadline that was exceeded.
        after: Duration,
    },

    /// An external tool ran to completion but exited non-zero.
    #[error("{tool} exited with code {exit_code}")]
    ToolFailed {
        /// Name of the tool that failed.
        tool: String,
        /// Process exit code (-1 when terminated by a signal).
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// An external tool could not be located or spawned.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::FileNotFound { .. } => 400,
            Error::UnsupportedFormat { .. } => 400,
            Error::NotFound => 404,
            Error::Timeout { .. } => 408,
            Error::ToolFailed { .. } => 500,
            Error::Tool { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::FileNotFound { .. } | Error::UnsupportedFormat { .. }
        )
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::FileNotFound`].
    pub fn file_not_found(kind: MediaKind, path: impl Into<String>) -> Self {
        Error::FileNotFound {
            kind,
            path: path.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
