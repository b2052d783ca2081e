//! # Configuration Settings
//!
//! Connection settings for the secret backend and the observability stack.
//!
//! Backend settings arrive from the host as a flat key-value map. Both key
//! prefixes used by host deployments are accepted:
//!
//! ```text
//! ext.cred.hashicorp.vault.address      mid.ext.cred.hashicorp.vault.address
//! ext.cred.hashicorp.vault.token        mid.ext.cred.hashicorp.vault.token
//! ```
//!
//! When both spellings are present the `ext.cred.` one wins.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::tls::{parse_flag, BackendTlsConfig};
use crate::errors::{ResolverError, Result};
use crate::secrets::SecretString;

/// Primary prefix for backend settings in the host settings map
pub const SETTINGS_PREFIX: &str = "ext.cred.hashicorp.vault";

/// Prefix used by agent-local host configuration
pub const AGENT_SETTINGS_PREFIX: &str = "mid.ext.cred.hashicorp.vault";

/// Default backend connect timeout in seconds
pub const DEFAULT_OPEN_TIMEOUT_SECS: u64 = 60;

/// Default backend read timeout in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

/// Version of the Vault key/value secrets engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvVersion {
    V1,
    #[default]
    V2,
}

impl FromStr for KvVersion {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "v1" => Ok(Self::V1),
            "2" | "v2" => Ok(Self::V2),
            other => Err(ResolverError::config(format!(
                "Unsupported KV engine version '{}' (expected 1 or 2)",
                other
            ))),
        }
    }
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Connection settings for the secret backend.
///
/// Built once when the host hands over its settings and immutable afterwards.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct BackendConfig {
    /// Backend base URL (e.g. "https://vault.example.com:8200")
    #[validate(length(min = 1, message = "Vault address cannot be empty"))]
    pub address: String,

    /// Bearer token presented on every read
    pub token: SecretString,

    /// Vault Enterprise namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// Fixed KV mount. When unset, the first segment of the credential id is the mount.
    #[serde(default)]
    pub kv_mount: Option<String>,

    /// KV engine version behind the mount
    #[serde(default)]
    pub kv_version: KvVersion,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 600, message = "Open timeout must be between 1 and 600 seconds"))]
    #[serde(default = "default_open_timeout")]
    pub open_timeout_seconds: u64,

    /// Read timeout in seconds
    #[validate(range(min = 1, max = 600, message = "Read timeout must be between 1 and 600 seconds"))]
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,

    /// TLS settings for the backend connection
    #[serde(default)]
    pub tls: BackendTlsConfig,
}

fn default_open_timeout() -> u64 {
    DEFAULT_OPEN_TIMEOUT_SECS
}

fn default_read_timeout() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("address", &self.address)
            .field("token", &self.token)
            .field("namespace", &self.namespace)
            .field("kv_mount", &self.kv_mount)
            .field("kv_version", &self.kv_version)
            .field("open_timeout_seconds", &self.open_timeout_seconds)
            .field("read_timeout_seconds", &self.read_timeout_seconds)
            .field("tls", &self.tls)
            .finish()
    }
}

impl BackendConfig {
    /// Create a configuration with default timeouts, KV v2 and verified TLS.
    pub fn new(address: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
            namespace: None,
            kv_mount: None,
            kv_version: KvVersion::default(),
            open_timeout_seconds: DEFAULT_OPEN_TIMEOUT_SECS,
            read_timeout_seconds: DEFAULT_READ_TIMEOUT_SECS,
            tls: BackendTlsConfig::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_kv_mount(mut self, mount: impl Into<String>, version: KvVersion) -> Self {
        self.kv_mount = Some(mount.into());
        self.kv_version = version;
        self
    }

    pub fn with_kv_version(mut self, version: KvVersion) -> Self {
        self.kv_version = version;
        self
    }

    pub fn with_timeouts(mut self, open: Duration, read: Duration) -> Self {
        self.open_timeout_seconds = open.as_secs();
        self.read_timeout_seconds = read.as_secs();
        self
    }

    pub fn with_tls(mut self, tls: BackendTlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Build and validate the configuration from the host settings map.
    ///
    /// Fails with [`ResolverError::Config`] naming the missing key when the
    /// address or token is absent.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self> {
        let address = require_setting(settings, "address")?;
        let token = require_setting(settings, "token")?;

        let mut config = Self::new(address, token);
        config.namespace = setting(settings, "namespace").map(str::to_string);
        config.kv_mount = setting(settings, "kv_mount").map(str::to_string);

        if let Some(version) = setting(settings, "kv_version") {
            config.kv_version = version.parse()?;
        }
        if let Some(value) = setting(settings, "open_timeout") {
            config.open_timeout_seconds = parse_seconds("open_timeout", value)?;
        }
        if let Some(value) = setting(settings, "read_timeout") {
            config.read_timeout_seconds = parse_seconds("read_timeout", value)?;
        }
        config.tls = BackendTlsConfig::from_values(
            setting(settings, "ca_cert"),
            setting(settings, "tls_verify"),
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Build and validate the configuration from environment variables.
    ///
    /// Uses:
    /// - `CREDRESOLVER_VAULT_ADDR` or `VAULT_ADDR` (required)
    /// - `CREDRESOLVER_VAULT_TOKEN` or `VAULT_TOKEN` (required)
    /// - `CREDRESOLVER_VAULT_NAMESPACE` or `VAULT_NAMESPACE`
    /// - `CREDRESOLVER_VAULT_KV_MOUNT`, `CREDRESOLVER_VAULT_KV_VERSION`
    /// - `CREDRESOLVER_VAULT_OPEN_TIMEOUT`, `CREDRESOLVER_VAULT_READ_TIMEOUT` (seconds)
    /// - `CREDRESOLVER_VAULT_CACERT` or `VAULT_CACERT`, `CREDRESOLVER_VAULT_TLS_VERIFY`
    pub fn from_env() -> Result<Self> {
        let address = env_var("CREDRESOLVER_VAULT_ADDR", Some("VAULT_ADDR"))
            .ok_or_else(|| ResolverError::config("CREDRESOLVER_VAULT_ADDR (or VAULT_ADDR) not set"))?;
        let token = env_var("CREDRESOLVER_VAULT_TOKEN", Some("VAULT_TOKEN")).ok_or_else(|| {
            ResolverError::config("CREDRESOLVER_VAULT_TOKEN (or VAULT_TOKEN) not set")
        })?;

        let mut config = Self::new(address, token);
        config.namespace = env_var("CREDRESOLVER_VAULT_NAMESPACE", Some("VAULT_NAMESPACE"));
        config.kv_mount = env_var("CREDRESOLVER_VAULT_KV_MOUNT", None);

        if let Some(version) = env_var("CREDRESOLVER_VAULT_KV_VERSION", None) {
            config.kv_version = version.parse()?;
        }
        if let Some(value) = env_var("CREDRESOLVER_VAULT_OPEN_TIMEOUT", None) {
            config.open_timeout_seconds = parse_seconds("open_timeout", &value)?;
        }
        if let Some(value) = env_var("CREDRESOLVER_VAULT_READ_TIMEOUT", None) {
            config.read_timeout_seconds = parse_seconds("read_timeout", &value)?;
        }
        config.tls = BackendTlsConfig::from_values(
            env_var("CREDRESOLVER_VAULT_CACERT", Some("VAULT_CACERT")).as_deref(),
            env_var("CREDRESOLVER_VAULT_TLS_VERIFY", None).as_deref(),
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(ResolverError::from)?;
        self.validate_custom()?;
        self.tls.validate()
    }

    fn validate_custom(&self) -> Result<()> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(ResolverError::config("Vault token cannot be empty"));
        }

        let url = url::Url::parse(&self.address).map_err(|e| {
            ResolverError::config(format!("Invalid Vault address '{}': {}", self.address, e))
        })?;

        match url.scheme() {
            "https" => {}
            "http" => {
                tracing::warn!(
                    address = %self.address,
                    "Vault address does not use TLS; credentials will travel in clear text"
                );
            }
            other => {
                return Err(ResolverError::config(format!(
                    "Vault address must use http or https, got '{}'",
                    other
                )));
            }
        }

        if let Some(mount) = &self.kv_mount {
            if mount.trim_matches('/').is_empty() {
                return Err(ResolverError::config("KV mount cannot be empty"));
            }
        }

        Ok(())
    }

    /// Connect timeout as Duration
    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(self.open_timeout_seconds)
    }

    /// Read timeout as Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    /// Upper bound for one backend round trip (connect plus read).
    pub fn request_deadline(&self) -> Duration {
        self.open_timeout() + self.read_timeout()
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable text
    pub json_logging: bool,

    /// Service name attached to log output
    pub service_name: String,

    /// Record resolution metrics through the `metrics` facade
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
            service_name: crate::APP_NAME.to_string(),
            enable_metrics: true,
        }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_level = env_var("CREDRESOLVER_LOG_LEVEL", None).unwrap_or(defaults.log_level);
        let json_logging = env_var("CREDRESOLVER_LOG_JSON", None)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.json_logging);
        let service_name =
            env_var("CREDRESOLVER_SERVICE_NAME", None).unwrap_or(defaults.service_name);
        let enable_metrics = env_var("CREDRESOLVER_ENABLE_METRICS", None)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.enable_metrics);

        Self { log_level, json_logging, service_name, enable_metrics }
    }
}

/// Look up a backend setting under either accepted prefix.
pub fn setting<'a>(settings: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    [SETTINGS_PREFIX, AGENT_SETTINGS_PREFIX]
        .iter()
        .filter_map(|prefix| settings.get(&format!("{}.{}", prefix, name)))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

fn require_setting<'a>(settings: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    setting(settings, name).ok_or_else(|| {
        ResolverError::config(format!("{}.{} not set", SETTINGS_PREFIX, name))
    })
}

fn parse_seconds(name: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        ResolverError::config(format!("Invalid {} '{}': expected whole seconds", name, value))
    })
}

fn env_var(primary: &str, fallback: Option<&str>) -> Option<String> {
    std::env::var(primary)
        .ok()
        .or_else(|| fallback.and_then(|name| std::env::var(name).ok()))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
