//! # Credential Resolver
//!
//! Resolves opaque credential references (a secret path plus a declared
//! credential type) into concrete secret material read from HashiCorp Vault,
//! normalized into four fixed slots: `user`, `pswd`, `pkey` and `passphrase`.
//!
//! ## Architecture
//!
//! ```text
//! host → Resolver → SecretBackendClient (Vault KV) → CredentialTypeMapper → four-slot result
//!           ↓                  ↓
//!     BackendConfig     BackendError → ResolverError::BackendUnavailable
//! ```
//!
//! ## Core Components
//!
//! - **Mapping**: table-driven extraction profiles per credential type
//! - **Resolver**: request validation, one bounded backend read, cancellation
//! - **Secrets**: the backend client trait and its `vaultrs` implementation
//! - **Config**: host settings map, environment and TOML settings file loading
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use credential_resolver::{ResolutionRequest, Resolver, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = HashMap::from([
//!         ("ext.cred.hashicorp.vault.address".to_string(), "https://vault.example.com:8200".to_string()),
//!         ("ext.cred.hashicorp.vault.token".to_string(), "hvs.token".to_string()),
//!     ]);
//!
//!     let resolver = Resolver::configure(&settings)?;
//!     let resolution = resolver.resolve(&ResolutionRequest::new("kv/windowscred", "windows")).await?;
//!     println!("user = {}", resolution.credential.user);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod mapping;
pub mod observability;
pub mod resolver;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::{BackendConfig, ObservabilityConfig};
pub use errors::{ResolverError, Result};
pub use mapping::{CanonicalSlot, CredentialTypeMapper, Diagnostic, NormalizedCredential};
pub use resolver::{ResolutionRequest, Resolution, Resolver};
pub use secrets::{BackendError, SecretBackendClient, SecretRecord, SecretString};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Calling-convention version reported to the host
pub const API_VERSION: &str = "2.0";
