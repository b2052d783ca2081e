//! # Credential Resolution
//!
//! The orchestrator between the host, the secret backend and the mapper:
//!
//! ```text
//! host → Resolver::resolve(request) → SecretBackendClient::read(id)
//!      → CredentialTypeMapper::extract(type, record) → four-slot result → host
//! ```
//!
//! Request shape and configuration errors fail before any I/O. Every backend
//! failure surfaces as [`crate::errors::ResolverError::BackendUnavailable`].
//! The resolver never retries.

pub mod request;
pub mod service;

pub use request::{ResolutionRequest, ACTIVE_DIRECTORY_MARKER, ARG_ID, ARG_IP, ARG_MID, ARG_TYPE};
pub use service::{Resolution, Resolver};
