//! Canonical output shape of a resolution.

use crate::secrets::SecretString;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Result key for the username slot
pub const VAL_USER: &str = "user";
/// Result key for the password slot
pub const VAL_PSWD: &str = "pswd";
/// Result key for the private key slot
pub const VAL_PKEY: &str = "pkey";
/// Result key for the passphrase slot
pub const VAL_PASSPHRASE: &str = "passphrase";

/// One of the four fixed output fields of every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalSlot {
    User,
    Pswd,
    Pkey,
    Passphrase,
}

impl CanonicalSlot {
    /// Every slot, in result order.
    pub const ALL: [CanonicalSlot; 4] = [Self::User, Self::Pswd, Self::Pkey, Self::Passphrase];

    /// Key of this slot in the host result map.
    pub fn key(&self) -> &'static str {
        match self {
            Self::User => VAL_USER,
            Self::Pswd => VAL_PSWD,
            Self::Pkey => VAL_PKEY,
            Self::Passphrase => VAL_PASSPHRASE,
        }
    }

    /// Whether the slot carries secret material.
    pub fn is_secret(&self) -> bool {
        !matches!(self, Self::User)
    }
}

impl FromStr for CanonicalSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            VAL_USER => Ok(Self::User),
            VAL_PSWD => Ok(Self::Pswd),
            VAL_PKEY => Ok(Self::Pkey),
            VAL_PASSPHRASE => Ok(Self::Passphrase),
            _ => Err(format!("Unknown canonical slot: {}", s)),
        }
    }
}

impl fmt::Display for CanonicalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A credential in the fixed four-slot shape handed back to the host.
///
/// Every slot is always present; slots that do not apply to the resolved type
/// hold the empty string. Secret slots are held in [`SecretString`] so the
/// value is redacted in `Debug` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCredential {
    pub user: String,
    pub pswd: SecretString,
    pub pkey: SecretString,
    pub passphrase: SecretString,
}

impl NormalizedCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `slot`. Never log the result for secret slots.
    pub fn get(&self, slot: CanonicalSlot) -> &str {
        match slot {
            CanonicalSlot::User => &self.user,
            CanonicalSlot::Pswd => self.pswd.expose_secret(),
            CanonicalSlot::Pkey => self.pkey.expose_secret(),
            CanonicalSlot::Passphrase => self.passphrase.expose_secret(),
        }
    }

    pub fn set(&mut self, slot: CanonicalSlot, value: impl Into<String>) {
        match slot {
            CanonicalSlot::User => self.user = value.into(),
            CanonicalSlot::Pswd => self.pswd = SecretString::new(value),
            CanonicalSlot::Pkey => self.pkey = SecretString::new(value),
            CanonicalSlot::Passphrase => self.passphrase = SecretString::new(value),
        }
    }

    /// True when every slot is empty.
    pub fn is_empty(&self) -> bool {
        CanonicalSlot::ALL.iter().all(|slot| self.get(*slot).is_empty())
    }

    /// Slots holding a non-empty value, for logging without values.
    pub fn populated_slots(&self) -> Vec<CanonicalSlot> {
        CanonicalSlot::ALL.into_iter().filter(|slot| !self.get(*slot).is_empty()).collect()
    }

    /// The four-key host result map.
    pub fn to_map(&self) -> HashMap<String, String> {
        CanonicalSlot::ALL
            .iter()
            .map(|slot| (slot.key().to_string(), self.get(*slot).to_string()))
            .collect()
    }

    /// Consume into the four-key host result map.
    pub fn into_map(self) -> HashMap<String, String> {
        let NormalizedCredential { user, pswd, pkey, passphrase } = self;
        HashMap::from([
            (VAL_USER.to_string(), user),
            (VAL_PSWD.to_string(), pswd.into_inner()),
            (VAL_PKEY.to_string(), pkey.into_inner()),
            (VAL_PASSPHRASE.to_string(), passphrase.into_inner()),
        ])
    }
}

/// Non-fatal condition reported alongside a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The declared type has no extraction profile; all slots are empty.
    ///
    /// `known` is set for tags acknowledged as unsupported (`ibm`, `azure`,
    /// `gcp`) and clear for unrecognized strings.
    UnsupportedCredentialType { credential_type: String, known: bool },
}

impl Diagnostic {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedCredentialType { .. } => "unsupported_credential_type",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCredentialType { credential_type, known: true } => {
                write!(f, "Credential type '{}' is not supported by this backend", credential_type)
            }
            Self::UnsupportedCredentialType { credential_type, known: false } => {
                write!(f, "Unknown credential type '{}'", credential_type)
            }
        }
    }
}

/// Output of one mapper call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub credential: NormalizedCredential,
    pub diagnostic: Option<Diagnostic>,
}

impl Extraction {
    pub fn is_supported(&self) -> bool {
        self.diagnostic.is_none()
    }
}
