use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use imagepress_core::{DeploymentMode, ServerConfig, UploadConfig};

use super::{convert, handlers, middleware::metrics_middleware};
use crate::state::AppState;

/// Allowance for multipart framing and non-file fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let config = state.config();
    let cors = cors_layer(&config.server);
    let body_limit = body_limit(&config.uploads);
    let static_dir = config.server.static_dir.clone();

    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/logs", get(handlers::logs))
        .route("/convert", post(convert::convert))
        .route("/metrics", get(handlers::metrics))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Permissive in development; a single origin in production.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    match server.mode {
        DeploymentMode::Development => CorsLayer::permissive(),
        DeploymentMode::Production => {
            let origin = server.allowed_origin.as_deref().unwrap_or_default();
            match origin.parse::<HeaderValue>() {
                Ok(origin) => CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
                Err(e) => {
                    error!(origin, error = %e, "Invalid allowed origin, cross-origin requests disabled");
                    CorsLayer::new()
                }
            }
        }
    }
}

fn body_limit(uploads: &UploadConfig) -> usize {
    let per_file = usize::try_from(uploads.max_file_size_bytes).unwrap_or(usize::MAX);
    per_file
        .saturating_mul(uploads.max_files)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}
