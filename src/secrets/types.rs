//! Redacting string type for credential material.
//!
//! Passwords, private keys, passphrases and the backend token all pass
//! through [`SecretString`] so that a stray `{:?}` or a serialized log line
//! cannot leak them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string whose contents never appear in Debug, Display or serialized output.
///
/// - Debug prints `SecretString([REDACTED])`, Display prints `[REDACTED]`
/// - Serialization writes `"[REDACTED]"`; deserialization accepts real values
/// - The buffer is zeroed on drop
///
/// The value is only reachable through [`SecretString::expose_secret`].
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Wraps a value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrows the underlying value. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Moves the value out, leaving an empty buffer behind to be zeroed.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let token = SecretString::new("hvs.CAESIJ");
        assert_eq!(format!("{:?}", token), "SecretString([REDACTED])");
        assert_eq!(format!("{}", token), "[REDACTED]");
    }

    #[test]
    fn test_expose_and_into_inner() {
        let password = SecretString::new("p@ss");
        assert_eq!(password.expose_secret(), "p@ss");
        assert_eq!(password.len(), 4);
        assert_eq!(password.into_inner(), "p@ss");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(SecretString::default().is_empty());
    }

    #[test]
    fn test_serialization_redacts_inside_structs() {
        #[derive(Serialize)]
        struct Settings {
            address: String,
            token: SecretString,
        }

        let json = serde_json::to_string(&Settings {
            address: "https://vault.internal:8200".to_string(),
            token: SecretString::new("hvs.root-token"),
        })
        .unwrap();

        assert!(json.contains("vault.internal"));
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("hvs.root-token"));
    }

    #[test]
    fn test_deserialization_keeps_value() {
        let token: SecretString = serde_json::from_str("\"hvs.abc\"").unwrap();
        assert_eq!(token.expose_secret(), "hvs.abc");
    }
}
