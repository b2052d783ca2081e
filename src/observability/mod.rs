//! # Observability Infrastructure
//!
//! Structured logging and metrics for the credential resolver.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info};
pub use metrics::{init_metrics, MetricsRecorder, OUTCOME_SUCCESS, OUTCOME_UNSUPPORTED_TYPE};

use crate::config::ObservabilityConfig;
use ::tracing::info;

/// Initialize logging and metrics
///
/// Returns the metrics recorder to hand to the resolver.
pub fn init_observability(config: &ObservabilityConfig) -> MetricsRecorder {
    init_logging(config);
    let recorder = init_metrics(config);

    info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.json_logging,
        metrics_enabled = config.enable_metrics,
        "Observability initialized successfully"
    );

    recorder
}
