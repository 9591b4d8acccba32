//! Health and metrics endpoints.

use axum::{Router, extract::State, http::header, response::IntoResponse, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use microshop_web::correlation_id_layer;
use tower_http::trace::TraceLayer;

/// `GET /metrics` in the Prometheus text exposition format.
#[allow(clippy::unused_async)]
pub async fn render_metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

/// Build the consumer's HTTP router.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/health", get(microshop_web::health_check))
        .route("/metrics", get(render_metrics))
        .with_state(handle)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}
