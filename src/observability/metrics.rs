//! # Metrics Collection
//!
//! Resolution metrics on the `metrics` facade. The library installs no
//! exporter; the embedding host chooses one.

use crate::config::ObservabilityConfig;
use ::tracing::info;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::sync::OnceLock;

/// Outcome label for a successful resolution
pub const OUTCOME_SUCCESS: &str = "success";

/// Outcome label for a resolution that returned an empty credential
pub const OUTCOME_UNSUPPORTED_TYPE: &str = "unsupported_type";

/// Metrics recorder that tracks resolver metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    enabled: bool,
}

impl MetricsRecorder {
    /// Create an enabled recorder
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Recorder that drops every measurement
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a finished resolution
    pub fn record_resolution(&self, credential_type: &str, outcome: &str, duration: f64) {
        if !self.enabled {
            return;
        }

        let labels =
            [("credential_type", credential_type.to_string()), ("outcome", outcome.to_string())];
        counter!("credential_resolutions_total", &labels).increment(1);

        let duration_labels = [("outcome", outcome.to_string())];
        histogram!("credential_resolution_duration_seconds", &duration_labels).record(duration);
    }

    /// Record one backend read by status (`ok` or the backend error kind)
    pub fn record_backend_read(&self, status: &str) {
        if !self.enabled {
            return;
        }
        counter!("credential_backend_reads_total", "status" => status.to_string()).increment(1);
    }

    /// Record a request for a type without an extraction profile
    pub fn record_unsupported_type(&self, credential_type: &str) {
        if !self.enabled {
            return;
        }
        counter!(
            "credential_unsupported_types_total",
            "credential_type" => credential_type.to_string()
        )
        .increment(1);
    }

    /// Register metric descriptions with the installed recorder
    pub fn register_resolution_metrics(&self) {
        describe_counter!(
            "credential_resolutions_total",
            Unit::Count,
            "Credential resolutions grouped by credential type and outcome"
        );
        describe_histogram!(
            "credential_resolution_duration_seconds",
            Unit::Seconds,
            "End-to-end resolution latency"
        );
        describe_counter!(
            "credential_backend_reads_total",
            Unit::Count,
            "Secret backend reads grouped by status"
        );
        describe_counter!(
            "credential_unsupported_types_total",
            Unit::Count,
            "Resolutions requested for a credential type with no extraction profile"
        );
    }
}

static DESCRIBED: OnceLock<()> = OnceLock::new();

/// Build the recorder for `config`, registering metric descriptions once.
pub fn init_metrics(config: &ObservabilityConfig) -> MetricsRecorder {
    if !config.enable_metrics {
        return MetricsRecorder::disabled();
    }

    let recorder = MetricsRecorder::new();
    DESCRIBED.get_or_init(|| {
        recorder.register_resolution_metrics();
        info!(service_name = %config.service_name, "Metrics collection initialized");
    });
    recorder
}
