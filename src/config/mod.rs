//! # Configuration Management
//!
//! Backend connection settings and observability settings for the resolver.
//! Settings reach the resolver as a flat key-value map from the host's
//! configuration store, from environment variables, or from a TOML file
//! holding the same keys.

pub mod settings;
pub mod tls;

use std::collections::HashMap;
use std::path::Path;

use crate::errors::{ResolverError, Result};

pub use settings::{
    setting, BackendConfig, KvVersion, ObservabilityConfig, AGENT_SETTINGS_PREFIX,
    DEFAULT_OPEN_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, SETTINGS_PREFIX,
};
pub use tls::BackendTlsConfig;

/// Load a flat settings map from a TOML file.
///
/// Keys may be written quoted (`"ext.cred.hashicorp.vault.address" = "..."`)
/// or as nested tables (`[ext.cred.hashicorp.vault]`); nested tables are
/// flattened into dotted keys. Scalars are stored as their text form and
/// arrays are joined with commas.
pub fn load_settings_file(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ResolverError::config(format!("Unable to read settings file {}: {}", path.display(), e))
    })?;

    parse_settings(&contents)
}

/// Parse TOML settings text into a flat settings map.
pub fn parse_settings(contents: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(contents)?;
    let mut settings = HashMap::new();
    flatten_table("", &table, &mut settings)?;
    Ok(settings)
}

fn flatten_table(
    prefix: &str,
    table: &toml::Table,
    out: &mut HashMap<String, String>,
) -> Result<()> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() { key.clone() } else { format!("{}.{}", prefix, key) };

        match value {
            toml::Value::Table(nested) => flatten_table(&full_key, nested, out)?,
            toml::Value::Array(items) => {
                let joined = items.iter().map(scalar_text).collect::<Result<Vec<_>>>()?;
                out.insert(full_key, joined.join(","));
            }
            other => {
                out.insert(full_key, scalar_text(other)?);
            }
        }
    }
    Ok(())
}

fn scalar_text(value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Datetime(d) => Ok(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            Err(ResolverError::config("Nested arrays and tables are not valid setting values"))
        }
    }
}
