//! # Error Types
//!
//! The resolver's public failure taxonomy, built with `thiserror`.
//!
//! Only call-aborting conditions live here. An unrecognized credential type is
//! not an error: it travels as a [`crate::mapping::Diagnostic`] next to an
//! empty but well-formed credential.

use crate::secrets::BackendError;

/// Custom result type for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Main error type for credential resolution
#[derive(thiserror::Error, Debug)]
pub enum ResolverError {
    /// Required backend settings are missing or invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The request is missing its `id` or `type`
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String, field: Option<String> },

    /// The secret backend could not serve the read
    #[error("Secret backend unavailable while reading '{path}': {source}")]
    BackendUnavailable {
        path: String,
        #[source]
        source: BackendError,
    },

    /// The path addresses a secret engine this resolver does not read
    #[error("Unsupported secret path '{path}': {reason}")]
    UnsupportedSecretPath { path: String, reason: String },

    /// The caller cancelled the resolution before the backend answered
    #[error("Resolution of '{path}' was cancelled")]
    Cancelled { path: String },
}

impl ResolverError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest { message: message.into(), field: None }
    }

    /// Create an invalid request error naming the offending field
    pub fn invalid_request_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::InvalidRequest { message: message.into(), field: Some(field.into()) }
    }

    /// Wrap a transport failure for the given path
    pub fn backend_unavailable<P: Into<String>>(path: P, source: BackendError) -> Self {
        Self::BackendUnavailable { path: path.into(), source }
    }

    /// Create an unsupported secret path error
    pub fn unsupported_path<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::UnsupportedSecretPath { path: path.into(), reason: reason.into() }
    }

    /// Create a cancellation error
    pub fn cancelled<P: Into<String>>(path: P) -> Self {
        Self::Cancelled { path: path.into() }
    }

    /// Stable label for metrics and CLI reporting
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::Config { .. } => "config_error",
            ResolverError::InvalidRequest { .. } => "invalid_request",
            ResolverError::BackendUnavailable { .. } => "backend_unavailable",
            ResolverError::UnsupportedSecretPath { .. } => "unsupported_secret_path",
            ResolverError::Cancelled { .. } => "cancelled",
        }
    }

    /// Whether a higher layer may reasonably retry the call.
    ///
    /// The resolver itself never retries. A path the backend client cannot
    /// address fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResolverError::BackendUnavailable { source, .. } => {
                !matches!(source, BackendError::InvalidPath { .. } | BackendError::Config { .. })
            }
            _ => false,
        }
    }
}

impl From<validator::ValidationErrors> for ResolverError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        fields.sort();

        Self::config(format!("Validation failed: {}", fields.join("; ")))
    }
}

impl From<toml::de::Error> for ResolverError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid settings file: {}", error))
    }
}
