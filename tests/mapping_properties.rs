//! Property tests for the credential-type mapping table

use std::collections::HashMap;

use credential_resolver::mapping::{
    CanonicalSlot, CredentialTypeMapper, Diagnostic, ACCESS_KEY, BUILTIN_PROFILES, KEY_PAIR,
    KNOWN_UNSUPPORTED, USERNAME_PASSWORD,
};
use credential_resolver::secrets::SecretRecord;
use proptest::prelude::*;

const USERNAME_PASSWORD_TYPES: &[&str] = &["windows", "ssh_password", "vmware", "jdbc", "jms", "basic"];
const KEY_PAIR_TYPES: &[&str] = &[
    "ssh_private_key",
    "sn_cfg_ansible",
    "sn_disco_certmgmt_certificate_ca",
    "cfg_chef_credentials",
    "infoblox",
    "api_key",
];

const FIELD_NAMES: &[&str] = &[
    "username",
    "password",
    "ssh_private_key",
    "ssh_passphrase",
    "access_key",
    "secret_key",
    "token",
    "notes",
];

/// Records drawn over the fields the built-in profiles read plus some noise.
fn record_strategy() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map(
        prop::sample::select(FIELD_NAMES).prop_map(str::to_string),
        ".{0,24}",
        0..FIELD_NAMES.len(),
    )
}

fn expected(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

proptest! {
    #[test]
    fn username_password_types_fill_user_and_pswd(
        index in 0..USERNAME_PASSWORD_TYPES.len(),
        fields in record_strategy(),
    ) {
        let mapper = CredentialTypeMapper::new();
        let extraction = mapper.extract(USERNAME_PASSWORD_TYPES[index], &SecretRecord::from(fields.clone()));

        prop_assert!(extraction.diagnostic.is_none());
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::User), expected(&fields, "username"));
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pswd), expected(&fields, "password"));
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pkey), "");
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Passphrase), "");
    }

    #[test]
    fn key_pair_types_fill_all_four_slots(
        index in 0..KEY_PAIR_TYPES.len(),
        fields in record_strategy(),
    ) {
        let mapper = CredentialTypeMapper::new();
        let extraction = mapper.extract(KEY_PAIR_TYPES[index], &SecretRecord::from(fields.clone()));

        prop_assert!(extraction.diagnostic.is_none());
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::User), expected(&fields, "username"));
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pswd), expected(&fields, "password"));
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pkey), expected(&fields, "ssh_private_key"));
        prop_assert_eq!(
            extraction.credential.get(CanonicalSlot::Passphrase),
            expected(&fields, "ssh_passphrase")
        );
    }

    #[test]
    fn aws_maps_access_key_pair(fields in record_strategy()) {
        let mapper = CredentialTypeMapper::new();
        let extraction = mapper.extract("aws", &SecretRecord::from(fields.clone()));

        prop_assert_eq!(extraction.credential.get(CanonicalSlot::User), expected(&fields, "access_key"));
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pswd), expected(&fields, "secret_key"));
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pkey), "");
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Passphrase), "");
    }

    #[test]
    fn unknown_types_yield_empty_credential(
        tag in "[a-z_]{1,20}",
        fields in record_strategy(),
    ) {
        let mapper = CredentialTypeMapper::new();
        prop_assume!(!mapper.supports(&tag));

        let extraction = mapper.extract(&tag, &SecretRecord::from(fields));

        prop_assert!(extraction.credential.is_empty());
        let is_known = KNOWN_UNSUPPORTED.iter().any(|t| t.as_str() == tag);
        prop_assert_eq!(
            extraction.diagnostic,
            Some(Diagnostic::UnsupportedCredentialType { credential_type: tag, known: is_known })
        );
    }

    #[test]
    fn extraction_is_deterministic(
        index in 0..BUILTIN_PROFILES.len(),
        fields in record_strategy(),
    ) {
        let mapper = CredentialTypeMapper::new();
        let tag = BUILTIN_PROFILES[index].0.as_str();
        let record = SecretRecord::from(fields);

        prop_assert_eq!(mapper.extract(tag, &record), mapper.extract(tag, &record));
    }

    #[test]
    fn values_are_copied_verbatim(value in any::<String>()) {
        let mapper = CredentialTypeMapper::new();
        let record: SecretRecord = [("username", value.as_str()), ("password", value.as_str())]
            .into_iter()
            .collect();

        let extraction = mapper.extract("basic", &record);
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::User), value.as_str());
        prop_assert_eq!(extraction.credential.get(CanonicalSlot::Pswd), value.as_str());
    }
}

#[test]
fn builtin_groups_match_profiles() {
    let mapper = CredentialTypeMapper::new();

    for tag in USERNAME_PASSWORD_TYPES {
        assert_eq!(mapper.profile(tag), Some(&USERNAME_PASSWORD), "{tag}");
    }
    for tag in KEY_PAIR_TYPES {
        assert_eq!(mapper.profile(tag), Some(&KEY_PAIR), "{tag}");
    }
    assert_eq!(mapper.profile("aws"), Some(&ACCESS_KEY));
    assert_eq!(mapper.supported_types().len(), 13);
}

#[test]
fn type_matching_is_case_sensitive() {
    let mapper = CredentialTypeMapper::new();
    assert!(mapper.supports("windows"));
    assert!(!mapper.supports("Windows"));
    assert!(!mapper.supports(" windows"));
}
