//! HashiCorp Vault backend client.
//!
//! Reads credential records from a Vault key/value secrets engine over an
//! authenticated HTTPS connection using static token auth.
//!
//! # Path Resolution
//!
//! A credential id such as `kv/windowscred` is read the way a Vault logical
//! read would: the first segment is the mount and the rest is the secret path.
//! With a fixed `kv_mount` configured, the whole id is the path inside that
//! mount.
//!
//! | Engine | Request |
//! |--------|---------|
//! | KV v2  | `GET /v1/{mount}/data/{path}` (record is `data.data`) |
//! | KV v1  | `GET /v1/{mount}/{path}` (record is `data`) |
//!
//! # Security
//!
//! # Timeouts
//!
//! The HTTP transport is built here rather than by `vaultrs` so the connect
//! phase is bounded by `open_timeout` and each request by `read_timeout`.
//!
//! - The token is held in a [`SecretString`](super::SecretString) and never logged
//! - Record values are never logged; only paths and error kinds are

use super::backend::{SecretBackendClient, SecretBackendType};
use super::error::{BackendError, BackendResult};
use super::record::SecretRecord;
use crate::config::{BackendConfig, KvVersion};
use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error as StdError;
use tracing::{debug, error, info};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::{kv1, kv2};

/// Secret backend client for HashiCorp Vault KV engines.
pub struct VaultBackendClient {
    client: VaultClient,
    address: String,
    kv_mount: Option<String>,
    kv_version: KvVersion,
    read_timeout_ms: u64,
}

impl std::fmt::Debug for VaultBackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultBackendClient")
            .field("address", &self.address)
            .field("kv_mount", &self.kv_mount)
            .field("kv_version", &self.kv_version)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultBackendClient {
    /// Build a client from validated connection settings.
    ///
    /// No network traffic happens here; use [`SecretBackendClient::health_check`]
    /// to check the server.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder
            .address(&config.address)
            .token(config.token.expose_secret())
            .timeout(Some(config.read_timeout()))
            .verify(config.tls.verify)
            .ca_certs(config.tls.ca_cert_strings());

        if let Some(ref namespace) = config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder.build().map_err(|e| {
            BackendError::config(format!("Invalid Vault client configuration: {}", e))
        })?;

        let mut client = VaultClient::new(settings)
            .map_err(|e| BackendError::config(format!("Failed to create Vault client: {}", e)))?;
        let http = build_http_client(config)?;
        client.http = rustify::clients::reqwest::Client::new(client.settings.address.as_str(), http);

        info!(
            address = %config.address,
            kv_mount = ?config.kv_mount,
            kv_version = %config.kv_version,
            "Initialized Vault backend client"
        );

        Ok(Self {
            client,
            address: config.address.clone(),
            kv_mount: config.kv_mount.clone(),
            kv_version: config.kv_version,
            read_timeout_ms: config.read_timeout().as_millis() as u64,
        })
    }

    /// Split a credential id into (mount, path inside the mount).
    pub fn split_path<'a>(&'a self, id: &'a str) -> BackendResult<(&'a str, &'a str)> {
        let trimmed = id.trim_matches('/');

        if let Some(mount) = &self.kv_mount {
            if trimmed.is_empty() {
                return Err(BackendError::invalid_path(id, "secret path is empty"));
            }
            return Ok((mount.trim_matches('/'), trimmed));
        }

        match trimmed.split_once('/') {
            Some((mount, path)) if !mount.is_empty() && !path.trim_matches('/').is_empty() => {
                Ok((mount, path.trim_matches('/')))
            }
            _ => Err(BackendError::invalid_path(
                id,
                "expected '<mount>/<path>' when no KV mount is configured",
            )),
        }
    }

    async fn read_raw(
        &self,
        mount: &str,
        path: &str,
    ) -> Result<HashMap<String, serde_json::Value>, ClientError> {
        match self.kv_version {
            KvVersion::V2 => kv2::read(&self.client, mount, path).await,
            KvVersion::V1 => kv1::get(&self.client, mount, path).await,
        }
    }
}

#[async_trait]
impl SecretBackendClient for VaultBackendClient {
    async fn read(&self, path: &str) -> BackendResult<SecretRecord> {
        let (mount, secret_path) = self.split_path(path)?;

        debug!(
            path = %path,
            mount = %mount,
            kv_version = %self.kv_version,
            "Reading secret from Vault"
        );

        let data = self.read_raw(mount, secret_path).await.map_err(|e| {
            let err = classify_client_error(path, e, self.read_timeout_ms);
            error!(path = %path, kind = err.kind(), error = %err, "Failed to read secret from Vault");
            err
        })?;

        Ok(record_from_values(data))
    }

    fn backend_type(&self) -> SecretBackendType {
        SecretBackendType::Vault
    }

    async fn health_check(&self) -> BackendResult<()> {
        vaultrs::sys::health(&self.client)
            .await
            .map_err(|e| classify_client_error("sys/health", e, self.read_timeout_ms))?;
        Ok(())
    }
}

/// HTTP transport with separate connect and request timeouts.
fn build_http_client(config: &BackendConfig) -> BackendResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .connect_timeout(config.open_timeout())
        .timeout(config.read_timeout())
        .danger_accept_invalid_certs(!config.tls.verify);

    for path in &config.tls.ca_cert_paths {
        let pem = std::fs::read(path).map_err(|e| {
            BackendError::config(format!("Unable to read CA certificate {}: {}", path.display(), e))
        })?;
        let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
            BackendError::config(format!("Invalid CA certificate {}: {}", path.display(), e))
        })?;
        builder = builder.add_root_certificate(cert);
    }

    builder
        .build()
        .map_err(|e| BackendError::config(format!("Failed to build HTTP client: {}", e)))
}

/// Collapse a `vaultrs` failure into a [`BackendError`].
///
/// Transport timeouts (connect or request) become [`BackendError::Timeout`].
fn classify_client_error(path: &str, error: ClientError, timeout_ms: u64) -> BackendError {
    match error {
        ClientError::APIError { code, errors } => match code {
            401 | 403 => BackendError::authentication_failed(describe_api_errors(code, &errors)),
            404 => BackendError::not_found(path),
            _ => BackendError::api(code, describe_api_errors(code, &errors)),
        },
        ClientError::RestClientError { source } if is_timeout(&source) => {
            BackendError::timeout("read", timeout_ms)
        }
        ClientError::RestClientError { source } => {
            BackendError::connection_failed(source.to_string())
        }
        other => BackendError::backend(other.to_string()),
    }
}

fn is_timeout(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(http) = err.downcast_ref::<reqwest::Error>() {
            if http.is_timeout() {
                return true;
            }
        }
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = err.source();
    }
    false
}

fn describe_api_errors(code: u16, errors: &[String]) -> String {
    if errors.is_empty() {
        format!("HTTP {}", code)
    } else {
        errors.join("; ")
    }
}

/// Convert a raw JSON secret payload into a flat record.
///
/// Strings are kept verbatim, `null` becomes the empty string and any other
/// value is stored as compact JSON text.
pub(crate) fn record_from_values(data: HashMap<String, serde_json::Value>) -> SecretRecord {
    data.into_iter()
        .map(|(field, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (field, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(kv_mount: Option<&str>) -> VaultBackendClient {
        let mut config = BackendConfig::new("https://vault.example.com:8200", "hvs.test");
        config.kv_mount = kv_mount.map(str::to_string);
        VaultBackendClient::new(&config).unwrap()
    }

    #[test]
    fn test_split_path_logical() {
        let client = client(None);
        assert_eq!(client.split_path("kv/windowscred").unwrap(), ("kv", "windowscred"));
        assert_eq!(client.split_path("/secret/team/db/").unwrap(), ("secret", "team/db"));
    }

    #[test]
    fn test_split_path_requires_mount_segment() {
        let client = client(None);
        assert!(matches!(client.split_path("windowscred"), Err(BackendError::InvalidPath { .. })));
        assert!(client.split_path("kv/").is_err());
        assert!(client.split_path("").is_err());
    }

    #[test]
    fn test_split_path_fixed_mount() {
        let client = client(Some("/creds/"));
        assert_eq!(client.split_path("team/windows").unwrap(), ("creds", "team/windows"));
        assert!(client.split_path("/").is_err());
    }

    #[test]
    fn test_record_from_values() {
        let data: HashMap<String, serde_json::Value> = [
            ("username".to_string(), json!("alice")),
            ("port".to_string(), json!(22)),
            ("enabled".to_string(), json!(true)),
            ("note".to_string(), json!(null)),
            ("tags".to_string(), json!(["a", "b"])),
        ]
        .into_iter()
        .collect();

        let record = record_from_values(data);
        assert_eq!(record.get("username"), Some("alice"));
        assert_eq!(record.get("port"), Some("22"));
        assert_eq!(record.get("enabled"), Some("true"));
        assert_eq!(record.get("note"), Some(""));
        assert_eq!(record.get("tags"), Some("[\"a\",\"b\"]"));
    }

    #[test]
    fn test_classify_api_errors() {
        let auth = classify_client_error(
            "kv/x",
            ClientError::APIError { code: 403, errors: vec!["permission denied".to_string()] },
            60_000,
        );
        assert!(matches!(auth, BackendError::AuthenticationFailed { .. }));
        assert!(auth.to_string().contains("permission denied"));

        let missing = classify_client_error("kv/x", ClientError::APIError { code: 404, errors: vec![] }, 60_000);
        assert!(matches!(missing, BackendError::NotFound { ref path } if path == "kv/x"));

        let server = classify_client_error("kv/x", ClientError::APIError { code: 503, errors: vec![] }, 60_000);
        assert!(matches!(server, BackendError::Api { status: 503, .. }));
        assert!(server.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_timeout_detected_in_source_chain() {
        let timed_out = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");
        assert!(is_timeout(&timed_out));

        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(!is_timeout(&refused));
    }

    #[test]
    fn test_missing_ca_certificate_rejected() {
        let mut config = BackendConfig::new("https://vault.example.com:8200", "hvs.test");
        config.tls.ca_cert_paths = vec!["/nonexistent/ca.pem".into()];
        let err = VaultBackendClient::new(&config).unwrap_err();
        assert!(matches!(err, BackendError::Config { .. }));
    }

    #[test]
    fn test_debug_hides_client() {
        let debug = format!("{:?}", client(None));
        assert!(debug.contains("vault.example.com"));
        assert!(!debug.contains("hvs.test"));
    }
}
