//! Credential types and their extraction profiles.
//!
//! The built-in table is the one place that knows which backend field names
//! are authoritative for each credential type:
//!
//! | Types | Rules |
//! |-------|-------|
//! | `windows`, `ssh_password`, `vmware`, `jdbc`, `jms`, `basic` | `username`→user, `password`→pswd |
//! | `ssh_private_key`, `sn_cfg_ansible`, `sn_disco_certmgmt_certificate_ca`, `cfg_chef_credentials`, `infoblox`, `api_key` | plus `ssh_passphrase`→passphrase, `ssh_private_key`→pkey |
//! | `aws` | `access_key`→user, `secret_key`→pswd |
//!
//! `ibm`, `azure` and `gcp` are acknowledged but have no profile.

use super::types::CanonicalSlot;
use serde::Serialize;
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Credential-type tag declared by the caller.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CredentialType(Cow<'static, str>);

impl CredentialType {
    pub const WINDOWS: Self = Self::from_static("windows");
    pub const SSH_PASSWORD: Self = Self::from_static("ssh_password");
    pub const VMWARE: Self = Self::from_static("vmware");
    pub const JDBC: Self = Self::from_static("jdbc");
    pub const JMS: Self = Self::from_static("jms");
    pub const BASIC: Self = Self::from_static("basic");
    pub const SSH_PRIVATE_KEY: Self = Self::from_static("ssh_private_key");
    pub const SN_CFG_ANSIBLE: Self = Self::from_static("sn_cfg_ansible");
    pub const SN_DISCO_CERTMGMT_CERTIFICATE_CA: Self =
        Self::from_static("sn_disco_certmgmt_certificate_ca");
    pub const CFG_CHEF_CREDENTIALS: Self = Self::from_static("cfg_chef_credentials");
    pub const INFOBLOX: Self = Self::from_static("infoblox");
    pub const API_KEY: Self = Self::from_static("api_key");
    pub const AWS: Self = Self::from_static("aws");
    pub const IBM: Self = Self::from_static("ibm");
    pub const AZURE: Self = Self::from_static("azure");
    pub const GCP: Self = Self::from_static("gcp");

    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the tag is acknowledged as having no extraction support.
    pub fn is_known_unsupported(&self) -> bool {
        KNOWN_UNSUPPORTED.contains(self)
    }
}

impl From<&str> for CredentialType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for CredentialType {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

impl AsRef<str> for CredentialType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CredentialType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags the resolver recognizes but cannot extract.
pub const KNOWN_UNSUPPORTED: &[CredentialType] =
    &[CredentialType::IBM, CredentialType::AZURE, CredentialType::GCP];

/// Copy one backend record field into one canonical slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: Cow<'static, str>,
    pub slot: CanonicalSlot,
}

impl FieldRule {
    pub const fn new(field: &'static str, slot: CanonicalSlot) -> Self {
        Self { field: Cow::Borrowed(field), slot }
    }

    pub fn owned(field: impl Into<String>, slot: CanonicalSlot) -> Self {
        Self { field: Cow::Owned(field.into()), slot }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.field, self.slot)
    }
}

/// Ordered field rules for one credential type.
///
/// Rules run in order. A slot is filled by the first rule whose field exists
/// in the record; later rules for an already filled slot are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionProfile {
    rules: Cow<'static, [FieldRule]>,
}

impl ExtractionProfile {
    pub const fn from_static(rules: &'static [FieldRule]) -> Self {
        Self { rules: Cow::Borrowed(rules) }
    }

    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules: Cow::Owned(rules) }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Slots this profile can populate.
    pub fn slots(&self) -> Vec<CanonicalSlot> {
        CanonicalSlot::ALL
            .into_iter()
            .filter(|slot| self.rules.iter().any(|rule| rule.slot == *slot))
            .collect()
    }
}

impl FromIterator<FieldRule> for ExtractionProfile {
    fn from_iter<I: IntoIterator<Item = FieldRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for ExtractionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.rules.iter().map(FieldRule::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}

const USERNAME_PASSWORD_RULES: &[FieldRule] = &[
    FieldRule::new("username", CanonicalSlot::User),
    FieldRule::new("password", CanonicalSlot::Pswd),
];

const KEY_PAIR_RULES: &[FieldRule] = &[
    FieldRule::new("username", CanonicalSlot::User),
    FieldRule::new("password", CanonicalSlot::Pswd),
    FieldRule::new("ssh_passphrase", CanonicalSlot::Passphrase),
    FieldRule::new("ssh_private_key", CanonicalSlot::Pkey),
];

const ACCESS_KEY_RULES: &[FieldRule] = &[
    FieldRule::new("access_key", CanonicalSlot::User),
    FieldRule::new("secret_key", CanonicalSlot::Pswd),
];

/// Username and password only.
pub const USERNAME_PASSWORD: ExtractionProfile =
    ExtractionProfile::from_static(USERNAME_PASSWORD_RULES);

/// Username, password, private key and its passphrase.
pub const KEY_PAIR: ExtractionProfile = ExtractionProfile::from_static(KEY_PAIR_RULES);

/// Cloud access key id and secret.
pub const ACCESS_KEY: ExtractionProfile = ExtractionProfile::from_static(ACCESS_KEY_RULES);

/// The built-in type → profile table.
pub const BUILTIN_PROFILES: &[(CredentialType, ExtractionProfile)] = &[
    (CredentialType::WINDOWS, USERNAME_PASSWORD),
    (CredentialType::SSH_PASSWORD, USERNAME_PASSWORD),
    (CredentialType::VMWARE, USERNAME_PASSWORD),
    (CredentialType::JDBC, USERNAME_PASSWORD),
    (CredentialType::JMS, USERNAME_PASSWORD),
    (CredentialType::BASIC, USERNAME_PASSWORD),
    (CredentialType::SSH_PRIVATE_KEY, KEY_PAIR),
    (CredentialType::SN_CFG_ANSIBLE, KEY_PAIR),
    (CredentialType::SN_DISCO_CERTMGMT_CERTIFICATE_CA, KEY_PAIR),
    (CredentialType::CFG_CHEF_CREDENTIALS, KEY_PAIR),
    (CredentialType::INFOBLOX, KEY_PAIR),
    (CredentialType::API_KEY, KEY_PAIR),
    (CredentialType::AWS, ACCESS_KEY),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_table_has_no_duplicates() {
        let types: HashSet<&str> = BUILTIN_PROFILES.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(types.len(), BUILTIN_PROFILES.len());
        assert_eq!(types.len(), 13);
    }

    #[test]
    fn test_unsupported_tags_have_no_profile() {
        for tag in KNOWN_UNSUPPORTED {
            assert!(tag.is_known_unsupported());
            assert!(BUILTIN_PROFILES.iter().all(|(t, _)| t != tag));
        }
        assert!(!CredentialType::from("Azure").is_known_unsupported());
    }

    #[test]
    fn test_profile_slots() {
        assert_eq!(USERNAME_PASSWORD.slots(), vec![CanonicalSlot::User, CanonicalSlot::Pswd]);
        assert_eq!(KEY_PAIR.slots(), CanonicalSlot::ALL.to_vec());
        assert_eq!(ACCESS_KEY.rules()[0].field, "access_key");
    }

    #[test]
    fn test_profile_display() {
        assert_eq!(ACCESS_KEY.to_string(), "access_key -> user, secret_key -> pswd");
    }

    #[test]
    fn test_credential_type_equality_ignores_ownership() {
        assert_eq!(CredentialType::from("windows"), CredentialType::WINDOWS);
        assert_eq!(CredentialType::new(String::from("aws")).to_string(), "aws");
    }
}
