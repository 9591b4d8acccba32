//! Health check endpoint.
//!
//! Used by load balancers and container orchestrators to verify that the
//! process is up. It does NOT check dependencies (database, broker).

use axum::Json;
use serde::Serialize;

/// Body of a health response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Always `"UP"` while the process serves requests.
    pub status: &'static str,
}

/// Liveness check.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "UP" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body.status, "UP");
    }
}
