//! Secret backend access.
//!
//! The resolver reads one flat record per request through the
//! [`SecretBackendClient`] trait and never sees backend library types.
//!
//! # Backends
//!
//! - **HashiCorp Vault**: [`VaultBackendClient`], KV v1 and v2 engines with static token auth
//! - **In-memory**: [`InMemoryBackendClient`], for local tooling and tests
//!
//! # Example
//!
//! ```rust,ignore
//! use credential_resolver::config::BackendConfig;
//! use credential_resolver::secrets::{SecretBackendClient, VaultBackendClient};
//!
//! let config = BackendConfig::new("https://vault.example.com:8200", "hvs.token");
//! let client = VaultBackendClient::new(&config)?;
//!
//! let record = client.read("kv/windowscred").await?;
//! let username = record.get("username");
//! ```
//!
//! # Security Considerations
//!
//! - Record values and the token are never logged or included in error messages
//! - Secret values are held in [`SecretString`] or zeroed on drop

pub mod backend;
pub mod error;
pub mod memory;
pub mod record;
pub mod types;
pub mod vault;

pub use backend::{SecretBackendClient, SecretBackendType};
pub use error::{BackendError, BackendResult};
pub use memory::InMemoryBackendClient;
pub use record::SecretRecord;
pub use types::SecretString;
pub use vault::VaultBackendClient;
