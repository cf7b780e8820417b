use axum::{extract::State, http::header, response::IntoResponse, Json};
use std::sync::Arc;

use imagepress_core::UsageTotals;

use crate::metrics::encode_metrics;
use crate::state::AppState;

/// Liveness text returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "Image converter API is running";

/// GET /
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// GET /logs
///
/// Current usage totals; a counter that is missing or unreadable is null.
pub async fn logs(State(state): State<Arc<AppState>>) -> Json<UsageTotals> {
    Json(state.usage().read_totals().await)
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
