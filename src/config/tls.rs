use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ResolverError, Result};

/// TLS settings for the connection to the secret backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendTlsConfig {
    /// Verify the backend certificate chain and hostname
    #[serde(default = "default_verify")]
    pub verify: bool,

    /// Extra PEM CA bundles trusted for the backend connection
    #[serde(default)]
    pub ca_cert_paths: Vec<PathBuf>,
}

fn default_verify() -> bool {
    true
}

impl Default for BackendTlsConfig {
    fn default() -> Self {
        Self { verify: default_verify(), ca_cert_paths: Vec::new() }
    }
}

impl BackendTlsConfig {
    /// Build from the raw `ca_cert` / `tls_verify` setting values.
    pub fn from_values(ca_cert: Option<&str>, verify: Option<&str>) -> Result<Self> {
        let verify = match verify {
            Some(value) => parse_flag(value).ok_or_else(|| {
                ResolverError::config(format!("Invalid TLS verify flag '{}'", value))
            })?,
            None => default_verify(),
        };

        let ca_cert_paths = ca_cert
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { verify, ca_cert_paths })
    }

    /// CA bundle paths must exist when the backend client is built.
    pub fn validate(&self) -> Result<()> {
        for path in &self.ca_cert_paths {
            if !path.is_file() {
                return Err(ResolverError::config(format!(
                    "CA certificate bundle {} does not exist",
                    path.display()
                )));
            }
        }

        if !self.verify {
            tracing::warn!("TLS certificate verification is disabled for the secret backend");
        }

        Ok(())
    }

    /// CA bundle paths in the form the Vault client expects.
    pub fn ca_cert_strings(&self) -> Vec<String> {
        self.ca_cert_paths.iter().map(|path| path.display().to_string()).collect()
    }
}

/// Parse the boolean spellings accepted in settings and environment values.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
