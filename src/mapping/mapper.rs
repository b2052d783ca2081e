//! The credential-type mapping engine.

use super::profile::{CredentialType, ExtractionProfile, BUILTIN_PROFILES, KNOWN_UNSUPPORTED};
use super::types::{Diagnostic, Extraction, NormalizedCredential};
use crate::secrets::SecretRecord;
use std::collections::HashMap;

/// Metric label for credential types the mapper does not recognize
pub const UNKNOWN_TYPE_LABEL: &str = "unknown";

/// Maps a backend record to a [`NormalizedCredential`] according to the
/// declared credential type.
///
/// Pure and immutable after construction: share one mapper by reference
/// across any number of concurrent resolutions.
#[derive(Debug, Clone)]
pub struct CredentialTypeMapper {
    profiles: HashMap<CredentialType, ExtractionProfile>,
}

impl Default for CredentialTypeMapper {
    fn default() -> Self {
        Self { profiles: BUILTIN_PROFILES.iter().cloned().collect() }
    }
}

impl CredentialTypeMapper {
    /// Mapper loaded with the built-in profile table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper with no profiles; every type is unsupported until added.
    pub fn empty() -> Self {
        Self { profiles: HashMap::new() }
    }

    /// Add or replace the profile for `credential_type`.
    pub fn with_profile(
        mut self,
        credential_type: impl Into<CredentialType>,
        profile: ExtractionProfile,
    ) -> Self {
        self.profiles.insert(credential_type.into(), profile);
        self
    }

    pub fn profile(&self, credential_type: &str) -> Option<&ExtractionProfile> {
        self.profiles.get(credential_type)
    }

    pub fn supports(&self, credential_type: &str) -> bool {
        self.profiles.contains_key(credential_type)
    }

    /// Types with a profile, sorted.
    pub fn supported_types(&self) -> Vec<&CredentialType> {
        let mut types: Vec<&CredentialType> = self.profiles.keys().collect();
        types.sort();
        types
    }

    /// Bounded label for `credential_type` in metrics.
    ///
    /// Types with a profile and the known-unsupported tags keep their name;
    /// anything else is reported as [`UNKNOWN_TYPE_LABEL`].
    pub fn metric_label<'a>(&self, credential_type: &'a str) -> &'a str {
        let known = self.supports(credential_type)
            || KNOWN_UNSUPPORTED.iter().any(|tag| tag.as_str() == credential_type);
        if known {
            credential_type
        } else {
            UNKNOWN_TYPE_LABEL
        }
    }

    /// Extract the four canonical slots from `record`.
    ///
    /// Never fails. Fields missing from the record leave their slot empty. A
    /// type without a profile yields an all-empty credential plus an
    /// [`Diagnostic::UnsupportedCredentialType`]. Values are copied verbatim.
    pub fn extract(&self, credential_type: &str, record: &SecretRecord) -> Extraction {
        let Some(profile) = self.profiles.get(credential_type) else {
            let credential_type = CredentialType::from(credential_type);
            return Extraction {
                credential: NormalizedCredential::default(),
                diagnostic: Some(Diagnostic::UnsupportedCredentialType {
                    known: credential_type.is_known_unsupported(),
                    credential_type: credential_type.to_string(),
                }),
            };
        };

        let mut credential = NormalizedCredential::default();
        let mut filled = Vec::with_capacity(profile.rules().len());

        for rule in profile.rules() {
            if filled.contains(&rule.slot) {
                continue;
            }
            if let Some(value) = record.get(&rule.field) {
                credential.set(rule.slot, value);
                filled.push(rule.slot);
            }
        }

        Extraction { credential, diagnostic: None }
    }
}
