//! `POST /combine` -- mux an audio file onto a video file.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use cm_av::{run_combine, CombineSpec};
use cm_core::Error;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;
use crate::response::ApiResponse;

/// Request body for a combine job.
///
/// Fields are optional at the serde level so that absent parameters surface
/// as a single "missing parameters" error instead of a parse failure.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CombineRequest {
    pub audio_file: Option<String>,
    pub video_file: Option<String>,
    pub output_file: Option<String>,
    /// Preset id; defaults to `standard`. Unknown ids behave like `standard`.
    pub preset: Option<String>,
}

impl CombineRequest {
    /// Parse a raw request body, which must be a JSON object.
    ///
    /// An unreadable body is an unexpected fault rather than a client input
    /// error, so it surfaces as [`Error::Internal`].
    pub fn from_body(body: &[u8]) -> cm_core::Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| Error::Internal(format!("invalid JSON body: {e}")))?;
        if !value.is_object() {
            return Err(Error::Internal(
                "invalid JSON body: expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::Internal(format!("invalid request body: {e}")))
    }

    pub fn into_spec(self) -> CombineSpec {
        CombineSpec::new(
            self.audio_file.unwrap_or_default(),
            self.video_file.unwrap_or_default(),
            self.output_file.unwrap_or_default(),
            self.preset.unwrap_or_else(|| "standard".to_string()),
        )
    }
}

/// POST /combine
#[utoipa::path(
    post,
    path = "/combine",
    request_body = CombineRequest,
    responses(
        (status = 200, description = "Files combined", body = ApiResponse),
        (status = 400, description = "Missing parameter, missing file or unsupported format", body = ApiResponse),
        (status = 408, description = "ffmpeg timed out and was killed", body = ApiResponse),
        (status = 500, description = "ffmpeg failed or internal error", body = ApiResponse)
    )
)]
pub async fn combine(
    State(ctx): State<AppContext>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    let attach = |e: Error| AppError::new(e).with_request_id(request_id.clone());

    let body = body.map_err(|e| attach(Error::Internal(format!("unreadable request body: {e}"))))?;
    let spec = CombineRequest::from_body(&body).map_err(attach)?.into_spec();

    // Reject bad input before queueing behind a running job.
    spec.validate().map_err(attach)?;

    let _permit = ctx
        .job_slots
        .acquire()
        .await
        .map_err(|e| attach(Error::Internal(format!("job slots closed: {e}"))))?;

    run_combine(&ctx.tools, &spec, ctx.config.combine.timeout())
        .await
        .map_err(attach)?;

    Ok(Json(ApiResponse::combined(spec.output_file, spec.preset)))
}
