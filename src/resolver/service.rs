//! The resolver: validates a request, performs one backend read and maps the
//! record into the four canonical slots.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

use super::request::ResolutionRequest;
use crate::config::BackendConfig;
use crate::errors::{ResolverError, Result};
use crate::mapping::{CanonicalSlot, CredentialTypeMapper, Diagnostic, NormalizedCredential};
use crate::observability::{MetricsRecorder, OUTCOME_SUCCESS, OUTCOME_UNSUPPORTED_TYPE};
use crate::secrets::{
    BackendError, SecretBackendClient, SecretBackendType, SecretRecord, VaultBackendClient,
};

/// Path label used when a health check fails
const HEALTH_PATH: &str = "sys/health";

/// A successful resolution.
///
/// Always carries all four slots. `diagnostics` lists non-fatal conditions,
/// such as an unsupported credential type that left every slot empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub credential: NormalizedCredential,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn is_supported(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnsupportedCredentialType { .. }))
    }

    /// The four-key host result map.
    pub fn into_map(self) -> HashMap<String, String> {
        self.credential.into_map()
    }
}

/// Connection settings and the client built from them, swapped as one unit.
struct ResolverState {
    config: BackendConfig,
    backend: Arc<dyn SecretBackendClient>,
}

/// Resolves credential references against a secret backend.
///
/// `Send + Sync`; share it behind an `Arc`. Each call loads one snapshot of
/// the backend state, so a concurrent [`Resolver::reconfigure`] never affects
/// a read already in flight.
pub struct Resolver {
    state: ArcSwap<ResolverState>,
    mapper: CredentialTypeMapper,
    metrics: MetricsRecorder,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("Resolver")
            .field("config", &state.config)
            .field("backend", &state.backend.backend_type())
            .field("supported_types", &self.mapper.supported_types().len())
            .field("metrics", &self.metrics.is_enabled())
            .finish()
    }
}

impl Resolver {
    /// Create a resolver over an existing backend client.
    ///
    /// The configuration is validated here; an invalid one never produces a
    /// resolver.
    pub fn new(config: BackendConfig, backend: Arc<dyn SecretBackendClient>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            state: ArcSwap::from_pointee(ResolverState { config, backend }),
            mapper: CredentialTypeMapper::default(),
            metrics: MetricsRecorder::disabled(),
        })
    }

    /// Create a resolver talking to Vault with `config`.
    pub fn from_config(config: BackendConfig) -> Result<Self> {
        let backend = build_vault_backend(&config)?;
        Self::new(config, backend)
    }

    /// Create a resolver from the host settings map.
    ///
    /// Fails with [`ResolverError::Config`] before any resolution can happen
    /// when the address or token is missing.
    pub fn configure(settings: &HashMap<String, String>) -> Result<Self> {
        let config = BackendConfig::from_settings(settings)?;
        info!(address = %config.address, "Configuring credential resolver");
        Self::from_config(config)
    }

    pub fn with_mapper(mut self, mapper: CredentialTypeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the backend settings from a new host settings map.
    ///
    /// The new client is built before the swap; on failure the current
    /// settings stay in place.
    pub fn reconfigure(&self, settings: &HashMap<String, String>) -> Result<()> {
        let config = BackendConfig::from_settings(settings)?;
        let backend = build_vault_backend(&config)?;
        self.swap_state(config, backend);
        Ok(())
    }

    /// Replace the backend settings and client atomically.
    pub fn reconfigure_with(
        &self,
        config: BackendConfig,
        backend: Arc<dyn SecretBackendClient>,
    ) -> Result<()> {
        config.validate()?;
        self.swap_state(config, backend);
        Ok(())
    }

    fn swap_state(&self, config: BackendConfig, backend: Arc<dyn SecretBackendClient>) {
        info!(
            address = %config.address,
            backend = %backend.backend_type(),
            "Swapping credential resolver backend configuration"
        );
        self.state.store(Arc::new(ResolverState { config, backend }));
    }

    /// Copy of the active backend settings.
    pub fn backend_config(&self) -> BackendConfig {
        self.state.load().config.clone()
    }

    pub fn backend_type(&self) -> SecretBackendType {
        self.state.load().backend.backend_type()
    }

    pub fn mapper(&self) -> &CredentialTypeMapper {
        &self.mapper
    }

    /// Calling-convention version reported to the host.
    pub fn version(&self) -> &'static str {
        crate::API_VERSION
    }

    /// Resolve one request.
    pub async fn resolve(&self, request: &ResolutionRequest) -> Result<Resolution> {
        self.resolve_with_cancellation(request, &CancellationToken::new()).await
    }

    /// Resolve one request, giving up with [`ResolverError::Cancelled`] as
    /// soon as `cancel` fires.
    pub async fn resolve_with_cancellation(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        let span = crate::resolution_span!(
            request.credential_type,
            request.id,
            mid = request.mid.as_deref(),
            ip = request.ip.as_deref()
        );

        let started = Instant::now();
        let result = self.resolve_inner(request, cancel).instrument(span).await;
        let elapsed = started.elapsed().as_secs_f64();
        let type_label = self.mapper.metric_label(&request.credential_type);

        match &result {
            Ok(resolution) => {
                let outcome = if resolution.is_supported() {
                    OUTCOME_SUCCESS
                } else {
                    OUTCOME_UNSUPPORTED_TYPE
                };
                self.metrics.record_resolution(type_label, outcome, elapsed);
            }
            Err(e) => {
                self.metrics.record_resolution(type_label, e.kind(), elapsed);
            }
        }

        result
    }

    async fn resolve_inner(
        &self,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        request.validate_request().inspect_err(|e| {
            warn!(error = %e, "Rejected malformed resolution request");
        })?;

        if request.is_active_directory_path() {
            warn!("Active-directory secret paths are not supported");
            return Err(ResolverError::unsupported_path(
                &request.id,
                "active-directory secret engines are not supported; use a key/value path",
            ));
        }

        if cancel.is_cancelled() {
            return Err(ResolverError::cancelled(&request.id));
        }

        let state = self.state.load_full();
        let record = self.read_record(&state, &request.id, cancel).await?;

        let extraction = self.mapper.extract(&request.credential_type, &record);
        drop(record);

        let mut diagnostics = Vec::new();
        if let Some(diagnostic) = extraction.diagnostic {
            warn!(diagnostic = %diagnostic, kind = diagnostic.kind(), "Returning empty credential");
            self.metrics
                .record_unsupported_type(self.mapper.metric_label(&request.credential_type));
            diagnostics.push(diagnostic);
        } else {
            let populated: Vec<&str> = extraction
                .credential
                .populated_slots()
                .iter()
                .map(CanonicalSlot::key)
                .collect();
            info!(populated = ?populated, "Resolved credential");
        }

        Ok(Resolution { credential: extraction.credential, diagnostics })
    }

    /// One bounded read, racing the caller's cancellation.
    async fn read_record(
        &self,
        state: &ResolverState,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<SecretRecord> {
        let deadline = state.config.request_deadline();
        debug!(backend = %state.backend.backend_type(), deadline_ms = deadline.as_millis() as u64, "Reading secret");

        let read = tokio::time::timeout(deadline, state.backend.read(path));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Resolution cancelled while waiting for the backend");
                return Err(ResolverError::cancelled(path));
            }
            outcome = read => outcome,
        };

        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(BackendError::timeout("read", deadline.as_millis() as u64)),
        };

        match result {
            Ok(record) => {
                self.metrics.record_backend_read("ok");
                Ok(record)
            }
            Err(e) => {
                self.metrics.record_backend_read(e.kind());
                error!(kind = e.kind(), error = %e, "Secret backend read failed");
                Err(ResolverError::backend_unavailable(path, e))
            }
        }
    }

    /// Resolve the host's request map into the four-key result map.
    pub async fn resolve_args(
        &self,
        args: &HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let request = ResolutionRequest::from_args(args);
        self.resolve(&request).await.map(Resolution::into_map)
    }

    /// Check the backend, bounded by the same deadline as a read.
    pub async fn health_check(&self) -> Result<()> {
        let state = self.state.load_full();
        let deadline = state.config.request_deadline();
        let span = crate::backend_span!("health_check", state.backend.backend_type());

        let result = tokio::time::timeout(deadline, state.backend.health_check())
            .instrument(span)
            .await
            .unwrap_or_else(|_| Err(BackendError::timeout("health_check", deadline.as_millis() as u64)));

        result.map_err(|e| {
            error!(kind = e.kind(), error = %e, "Secret backend health check failed");
            ResolverError::backend_unavailable(HEALTH_PATH, e)
        })
    }
}

fn build_vault_backend(config: &BackendConfig) -> Result<Arc<dyn SecretBackendClient>> {
    let client = VaultBackendClient::new(config)
        .map_err(|e| ResolverError::config(format!("Unable to build Vault client: {}", e)))?;
    Ok(Arc::new(client))
}
