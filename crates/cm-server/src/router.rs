//! Axum router construction.
//!
//! Every (method, path) pair is listed explicitly. Unknown paths and wrong
//! methods on known paths both fall through to the JSON 404 handler.

use std::any::Any;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::response::ApiResponse;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::combine::combine,
        routes::health::health_check,
        routes::presets::list_presets,
        routes::tools::list_tools,
    ),
    components(schemas(
        routes::combine::CombineRequest,
        routes::health::HealthResponse,
        routes::presets::PresetCatalog,
        ApiResponse,
        cm_av::ToolInfo,
    ))
)]
pub struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    with_middleware(api_routes()).with_state(ctx)
}

fn api_routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/combine",
            post(routes::combine::combine).fallback(routes::not_found),
        )
        .route(
            "/health",
            get(routes::health::health_check).fallback(routes::not_found),
        )
        .route(
            "/presets",
            get(routes::presets::list_presets).fallback(routes::not_found),
        )
        .route(
            "/tools",
            get(routes::tools::list_tools).fallback(routes::not_found),
        )
        .route(
            "/openapi.json",
            get(openapi_json).fallback(routes::not_found),
        )
        .fallback(routes::not_found)
}

/// Wrap `router` in the shared middleware stack.
///
/// Outermost first: trace, CORS, request id, panic catcher. The request-id
/// layer sits outside the panic catcher so panic responses carry the header.
fn with_middleware(router: Router<AppContext>) -> Router<AppContext> {
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(cors::Any)
        .allow_headers(cors::Any);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Turn a handler panic into the standard 500 envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(format!("Internal server error: {detail}"))),
    )
        .into_response()
}
