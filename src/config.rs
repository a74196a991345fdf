//! OpenID Connect provider configuration (discovery metadata).

use serde::{Deserialize, Serialize};

use crate::errors::OidcError;
use crate::jwks::{JsonWebKey, SigningKey};

/// A provider's discovery metadata, plus the signing keys resolved from its
/// published key set.
///
/// Every metadata field is optional: this crate resolves the configuration but
/// deliberately does not validate it (issuer match, endpoint completeness, and
/// so on are the caller's concern). The two key collections start empty and
/// are populated exactly once by the resolver; the metadata fields are never
/// mutated after parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OidcConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
    /// Address of the provider's key-set document. When absent or empty the
    /// resolver leaves both key collections empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_session_iframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introspection_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_types_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_modes_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grant_types_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_types_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_token_signing_alg_values_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_endpoint_auth_methods_supported: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claims_supported: Vec<String>,

    #[serde(skip)]
    signing_keys: Vec<SigningKey>,
    #[serde(skip)]
    key_set: Vec<JsonWebKey>,
}

impl OidcConfiguration {
    /// Parses a raw discovery document.
    pub fn from_json(document: &str) -> Result<Self, OidcError> {
        serde_json::from_str(document).map_err(OidcError::ConfigurationParse)
    }

    /// Signing keys converted from the published key set, in document order.
    pub fn signing_keys(&self) -> &[SigningKey] {
        &self.signing_keys
    }

    /// Every key entry of the published key set, converted or not.
    pub fn key_set(&self) -> &[JsonWebKey] {
        &self.key_set
    }

    /// Attaches the fully built key collections. Called once per resolution,
    /// after the conversion loop completes.
    pub(crate) fn attach_keys(
        &mut self,
        signing_keys: Vec<SigningKey>,
        key_set: Vec<JsonWebKey>,
    ) {
        self.signing_keys = signing_keys;
        self.key_set = key_set;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_discovery_document() {
        let config = OidcConfiguration::from_json(
            r#"{
                "issuer": "https://idp.example",
                "authorization_endpoint": "https://idp.example/authorize",
                "token_endpoint": "https://idp.example/token",
                "jwks_uri": "https://idp.example/keys",
                "subject_types_supported": ["public", "pairwise"],
                "response_types_supported": ["id_token"],
                "id_token_signing_alg_values_supported": ["RS256"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.issuer.as_deref(), Some("https://idp.example"));
        assert_eq!(config.jwks_uri.as_deref(), Some("https://idp.example/keys"));
        assert_eq!(config.subject_types_supported, ["public", "pairwise"]);
        assert!(config.signing_keys().is_empty());
        assert!(config.key_set().is_empty());
    }

    #[test]
    fn missing_jwks_uri_parses_as_none() {
        let config = OidcConfiguration::from_json(r#"{"issuer": "https://idp.example"}"#).unwrap();
        assert!(config.jwks_uri.is_none());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let config =
            OidcConfiguration::from_json(r#"{"jwks_uri": "https://idp/keys", "frobnicate": 7}"#)
                .unwrap();
        assert_eq!(config.jwks_uri.as_deref(), Some("https://idp/keys"));
    }

    #[test]
    fn malformed_document_fails_to_parse() {
        let err = OidcConfiguration::from_json("[]").unwrap_err();
        assert!(matches!(err, OidcError::ConfigurationParse(_)));
    }
}
