//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! Resolution spans carry the request context (type, path, agent, target)
//! and a random request id for correlating log lines. Record values and the
//! backend token are never recorded.

use crate::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Create a tracing span for one credential resolution.
///
/// ```rust,ignore
/// let span = resolution_span!("windows", "kv/windowscred");
/// let span = resolution_span!("windows", "kv/windowscred", mid = "agent-1", ip = "10.0.0.5");
/// ```
#[macro_export]
macro_rules! resolution_span {
    ($credential_type:expr, $path:expr) => {
        tracing::info_span!(
            "credential_resolution",
            credential_type = %$credential_type,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            mid = tracing::field::Empty,
            ip = tracing::field::Empty
        )
    };
    ($credential_type:expr, $path:expr, mid = $mid:expr, ip = $ip:expr) => {
        tracing::info_span!(
            "credential_resolution",
            credential_type = %$credential_type,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            mid = $mid,
            ip = $ip
        )
    };
}

/// Create a tracing span for a backend health check.
#[macro_export]
macro_rules! backend_span {
    ($operation:expr, $backend:expr) => {
        tracing::debug_span!(
            "backend_operation",
            operation = %$operation,
            backend = %$backend,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Installing twice is
/// not an error; the first subscriber stays in place.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = if config.json_logging {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

/// Log the effective configuration at startup.
pub fn log_config_info(config: &crate::config::BackendConfig, observability: &ObservabilityConfig) {
    tracing::info!(
        service_name = %observability.service_name,
        address = %config.address,
        namespace = ?config.namespace,
        kv_mount = ?config.kv_mount,
        kv_version = %config.kv_version,
        open_timeout_secs = config.open_timeout_seconds,
        read_timeout_secs = config.read_timeout_seconds,
        tls_verify = config.tls.verify,
        metrics_enabled = observability.enable_metrics,
        "Credential resolver configuration"
    );
}
