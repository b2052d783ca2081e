//! # Error Handling
//!
//! Error types for the credential resolver, defined with `thiserror`.
//! Transport-level failures live in [`crate::secrets::BackendError`] and are
//! folded into [`ResolverError::BackendUnavailable`] at the resolver boundary.

pub mod types;

pub use types::{ResolverError, Result};
