//! Prometheus metrics for the consumer.
//!
//! Counters are recorded through the `metrics` facade; the exporter installed
//! by [`install`] renders them for `GET /metrics`.

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Orders successfully processed.
pub const ORDERS_PROCESSED_TOTAL: &str = "orders_processed_total";

/// Messages skipped because they could not be decoded.
pub const ORDERS_REJECTED_TOTAL: &str = "orders_rejected_total";

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install the global recorder
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed.
pub fn install() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;
    register_metrics();
    Ok(handle)
}

/// Register metric descriptions with the current recorder.
pub fn register_metrics() {
    describe_counter!(
        ORDERS_PROCESSED_TOTAL,
        "Total number of order.created events processed"
    );
    describe_counter!(
        ORDERS_REJECTED_TOTAL,
        "Total number of messages skipped as malformed"
    );
}
