use std::path::Path;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{compare_handler, health_handler, publish_handler};
use crate::presentation::state::AppState;

pub const PUBLIC_FILES_ROUTE: &str = "/files";

pub fn create_router(state: AppState) -> Router {
    build_router(state, None)
}

/// Router that also serves published artifacts from `public_dir` under
/// [`PUBLIC_FILES_ROUTE`], for the local storage provider.
pub fn create_router_with_public_files(state: AppState, public_dir: &Path) -> Router {
    build_router(state, Some(public_dir))
}

fn build_router(state: AppState, public_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/audiocheck", post(compare_handler))
        .route("/process-audio", post(publish_handler));

    if let Some(dir) = public_dir {
        router = router.nest_service(PUBLIC_FILES_ROUTE, ServeDir::new(dir));
    }

    router
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
