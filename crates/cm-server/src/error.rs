//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`cm_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and every failure still leaves as a
//! well-formed JSON envelope.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::response::ApiResponse;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: cm_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: cm_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn inner(&self) -> &cm_core::Error {
        &self.inner
    }

    /// The JSON body for this error.
    pub fn body(&self) -> ApiResponse {
        match &self.inner {
            cm_core::Error::ToolFailed { stderr, .. } => {
                ApiResponse::failure("FFmpeg failed", stderr.clone())
            }
            cm_core::Error::Timeout { after, .. } => ApiResponse::failure(
                format!("FFmpeg processing timed out ({})", describe_duration(*after)),
                "The video processing took too long and was cancelled",
            ),
            e if e.is_client_error() => ApiResponse::error(e.to_string()),
            cm_core::Error::NotFound => ApiResponse::error("Not found"),
            cm_core::Error::Internal(detail) => {
                ApiResponse::error(format!("Internal server error: {detail}"))
            }
            e => ApiResponse::error(format!("Internal server error: {e}")),
        }
    }
}

impl From<cm_core::Error> for AppError {
    fn from(e: cm_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                request_id = ?self.request_id,
                "Server error in API handler"
            );
        } else if status != StatusCode::NOT_FOUND {
            tracing::info!(status = %status, error = %self.inner, "Request rejected");
        }

        (status, axum::Json(self.body())).into_response()
    }
}

/// Render a timeout the way operators read it: "5 minutes", "90 seconds".
fn describe_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };
    if secs >= 60 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}
