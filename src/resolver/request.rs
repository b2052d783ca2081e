//! Resolution requests and the host key-value call contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::ResolverError;

/// Request key holding the backend secret path
pub const ARG_ID: &str = "id";
/// Request key holding the credential-type tag
pub const ARG_TYPE: &str = "type";
/// Request key holding the target system address
pub const ARG_IP: &str = "ip";
/// Request key holding the requesting agent name
pub const ARG_MID: &str = "mid";

/// Path marker of Vault active-directory secret engines
pub const ACTIVE_DIRECTORY_MARKER: &str = "ad/creds/";

/// One credential lookup.
///
/// `ip` and `mid` are diagnostic context only and never influence extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ResolutionRequest {
    /// Backend secret path, e.g. `kv/windowscred`
    #[validate(custom(function = "not_blank", message = "id is required"))]
    pub id: String,

    /// Credential-type tag, e.g. `windows`
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank", message = "type is required"))]
    pub credential_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
}

impl ResolutionRequest {
    pub fn new(id: impl Into<String>, credential_type: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            credential_type: credential_type.into().trim().to_string(),
            ip: None,
            mid: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = non_blank(ip.into());
        self
    }

    pub fn with_mid(mut self, mid: impl Into<String>) -> Self {
        self.mid = non_blank(mid.into());
        self
    }

    /// Parse the host's request map.
    ///
    /// Missing keys become empty fields, which [`ResolutionRequest::validate_request`]
    /// then rejects. Unrecognized keys are ignored.
    pub fn from_args(args: &HashMap<String, String>) -> Self {
        let arg = |key: &str| args.get(key).map(|value| value.trim().to_string());

        Self {
            id: arg(ARG_ID).unwrap_or_default(),
            credential_type: arg(ARG_TYPE).unwrap_or_default(),
            ip: arg(ARG_IP).and_then(non_blank),
            mid: arg(ARG_MID).and_then(non_blank),
        }
    }

    /// Check that `id` and `type` are present.
    pub fn validate_request(&self) -> Result<(), ResolverError> {
        self.validate().map_err(invalid_request)
    }

    /// Whether the id addresses an active-directory secret engine.
    pub fn is_active_directory_path(&self) -> bool {
        self.id.contains(ACTIVE_DIRECTORY_MARKER)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Report the first failing field under its host key name.
fn invalid_request(errors: ValidationErrors) -> ResolverError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&str> = field_errors.keys().map(|field| field.as_ref()).collect();
    fields.sort_unstable_by_key(|field| if *field == "id" { 0 } else { 1 });

    let Some(field) = fields.first() else {
        return ResolverError::invalid_request("request validation failed");
    };

    let message = field_errors
        .get(*field)
        .and_then(|errors| errors.first())
        .and_then(|error| error.message.as_ref())
        .map(|message| message.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field));

    let key = match *field {
        "credential_type" => ARG_TYPE,
        other => other,
    };
    ResolverError::invalid_request_field(message, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_args_full() {
        let request = ResolutionRequest::from_args(&args(&[
            ("id", " kv/windowscred "),
            ("type", "windows"),
            ("ip", "10.0.0.5"),
            ("mid", "agent-1"),
            ("extra", "ignored"),
        ]));

        assert_eq!(request.id, "kv/windowscred");
        assert_eq!(request.credential_type, "windows");
        assert_eq!(request.ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(request.mid.as_deref(), Some("agent-1"));
        assert!(request.validate_request().is_ok());
    }

    #[test]
    fn test_missing_id_rejected() {
        let request = ResolutionRequest::from_args(&args(&[("type", "windows")]));
        let err = request.validate_request().unwrap_err();

        match err {
            ResolverError::InvalidRequest { message, field } => {
                assert_eq!(field.as_deref(), Some("id"));
                assert_eq!(message, "id is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_type_rejected() {
        let err = ResolutionRequest::new("kv/windowscred", "   ").validate_request().unwrap_err();
        assert!(matches!(
            err,
            ResolverError::InvalidRequest { field: Some(ref f), .. } if f == "type"
        ));
    }

    #[test]
    fn test_both_missing_reports_id_first() {
        let err = ResolutionRequest::new("", "").validate_request().unwrap_err();
        assert!(matches!(
            err,
            ResolverError::InvalidRequest { field: Some(ref f), .. } if f == "id"
        ));
    }

    #[test]
    fn test_blank_optional_args_dropped() {
        let request = ResolutionRequest::new("kv/a", "basic").with_ip("  ").with_mid("mid-1");
        assert_eq!(request.ip, None);
        assert_eq!(request.mid.as_deref(), Some("mid-1"));
    }

    #[test]
    fn test_active_directory_marker() {
        assert!(ResolutionRequest::new("ad/creds/svc-account", "windows").is_active_directory_path());
        assert!(ResolutionRequest::new("team/ad/creds/svc", "windows").is_active_directory_path());
        assert!(!ResolutionRequest::new("kv/ad", "windows").is_active_directory_path());
    }

    #[test]
    fn test_serde_uses_host_keys() {
        let request: ResolutionRequest =
            serde_json::from_str(r#"{"id":"kv/aws","type":"aws"}"#).unwrap();
        assert_eq!(request.credential_type, "aws");
        assert_eq!(request.ip, None);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "aws");
        assert!(json.get("ip").is_none());
    }
}
