//! External tool availability.

use axum::extract::State;
use axum::Json;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /tools
#[utoipa::path(
    get,
    path = "/tools",
    responses(
        (status = 200, description = "External tool availability", body = Vec<cm_av::ToolInfo>)
    )
)]
pub async fn list_tools(State(ctx): State<AppContext>) -> Result<Json<Vec<cm_av::ToolInfo>>, AppError> {
    // Version detection spawns the tool synchronously.
    let tools = ctx.tools.clone();
    let infos = tokio::task::spawn_blocking(move || tools.check_all())
        .await
        .map_err(|e| cm_core::Error::Internal(format!("tool check panicked: {e}")))?;
    Ok(Json(infos))
}
