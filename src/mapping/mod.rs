//! # Credential Mapping
//!
//! Turns a flat backend record into the four canonical slots (`user`,
//! `pswd`, `pkey`, `passphrase`) using a table of per-type extraction
//! profiles. Adding a credential type is a table entry, not new code.
//!
//! ```rust,ignore
//! use credential_resolver::mapping::CredentialTypeMapper;
//!
//! let mapper = CredentialTypeMapper::new();
//! let extraction = mapper.extract("windows", &record);
//! assert_eq!(extraction.credential.user, "alice");
//! ```

pub mod mapper;
pub mod profile;
pub mod types;

pub use mapper::{CredentialTypeMapper, UNKNOWN_TYPE_LABEL};
pub use profile::{
    CredentialType, ExtractionProfile, FieldRule, ACCESS_KEY, BUILTIN_PROFILES, KEY_PAIR,
    KNOWN_UNSUPPORTED, USERNAME_PASSWORD,
};
pub use types::{
    CanonicalSlot, Diagnostic, Extraction, NormalizedCredential, VAL_PASSPHRASE, VAL_PKEY,
    VAL_PSWD, VAL_USER,
};
