//! Secret backend client trait and types
//!
//! The resolver talks to its secret store only through [`SecretBackendClient`].

use super::error::BackendResult;
use super::record::SecretRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of secret backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretBackendType {
    /// HashiCorp Vault KV engine
    Vault,
    /// In-process backend (tests, local tooling)
    InMemory,
}

impl SecretBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::InMemory => "in_memory",
        }
    }
}

impl FromStr for SecretBackendType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "vault" => Ok(Self::Vault),
            "in_memory" => Ok(Self::InMemory),
            _ => Err(format!("Unknown secret backend type: {}", s)),
        }
    }
}

impl fmt::Display for SecretBackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authenticated read access to a secret store.
///
/// Implementations must be Send + Sync; one client is shared by every
/// in-flight resolution. Implementations MUST NOT log record values.
#[async_trait]
pub trait SecretBackendClient: Send + Sync + fmt::Debug {
    /// Read the flat record stored at `path`.
    ///
    /// Every failure (connect, TLS, auth, not found, timeout) is reported as a
    /// [`super::BackendError`]; backend library error types stay inside the
    /// implementation.
    async fn read(&self, path: &str) -> BackendResult<SecretRecord>;

    /// Get the backend type identifier
    fn backend_type(&self) -> SecretBackendType;

    /// Check that the backend is reachable and serving requests.
    async fn health_check(&self) -> BackendResult<()>;
}
