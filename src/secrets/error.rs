//! Transport-boundary errors raised by secret backend clients.
//!
//! Backend libraries convert their own failures into [`BackendError`] inside
//! the client implementation; nothing backend-specific crosses into the
//! resolver.

use thiserror::Error;

/// Result type for backend client operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Failures observed while talking to the secret backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached (DNS, TCP, TLS handshake).
    #[error("Backend connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The token was rejected.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Nothing is stored at the requested path.
    #[error("Secret not found at path '{path}'")]
    NotFound { path: String },

    /// The operation did not finish in time.
    #[error("Backend {operation} timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// The backend answered with an unexpected status.
    #[error("Backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The path cannot be turned into a backend request.
    #[error("Invalid secret path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The client could not be built from its settings.
    #[error("Backend client configuration error: {message}")]
    Config { message: String },

    /// Any other backend failure.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl BackendError {
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: message.into() }
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed { message: message.into() }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self::Timeout { operation: operation.into(), duration_ms }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api { status, message: message.into() }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into(), reason: reason.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionFailed { .. } => "connection_failed",
            Self::AuthenticationFailed { .. } => "authentication_failed",
            Self::NotFound { .. } => "not_found",
            Self::Timeout { .. } => "timeout",
            Self::Api { .. } => "api_error",
            Self::InvalidPath { .. } => "invalid_path",
            Self::Config { .. } => "config_error",
            Self::Backend { .. } => "backend_error",
        }
    }
}
