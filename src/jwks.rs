//! JSON Web Key Set handling and signing-key construction.
//!
//! A provider's key-set document is parsed into [`JsonWebKeySet`], and each
//! eligible entry is converted into a [`SigningKey`] wrapping the RSA public
//! key of the single X.509 certificate published in its `x5c` chain.
//!
//! Conversion policy: an entry converts only when its `use` designation allows
//! signature verification and its `x5c` chain holds exactly one certificate.
//! Intermediate certificates are never consumed here; chain validation is the
//! concern of whatever certificate-verification layer sits downstream of the
//! resolved keys.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use x509_cert::Certificate;
use x509_cert::der::Decode;
use x509_cert::spki::ObjectIdentifier;

use crate::errors::OidcError;

/// The JWK `use` value designating signature keys.
pub const USE_SIGNATURE: &str = "sig";

/// SPKI algorithm identifier for rsaEncryption. Only RSA certificates are
/// convertible; other key types are out of scope.
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// A provider's published key set, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    #[serde(default)]
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Parses a raw JWKS document.
    pub fn from_json(document: &str) -> Result<Self, OidcError> {
        serde_json::from_str(document).map_err(OidcError::KeySetParse)
    }
}

/// One key record of a JWKS document.
///
/// All fields are optional on the wire; entries are retained verbatim in the
/// resolved configuration whether or not they convert to a signing key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonWebKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Intended key use: `"sig"`, `"enc"`, or absent.
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Base64-encoded X.509 certificate chain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x5c: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x5t: Option<String>,
}

impl JsonWebKey {
    /// Whether this key may be used for signature verification: `use` absent,
    /// blank, or exactly `"sig"` (ordinal comparison).
    pub fn is_signature_use(&self) -> bool {
        match &self.key_use {
            None => true,
            Some(designation) => {
                designation.trim().is_empty() || designation == USE_SIGNATURE
            }
        }
    }
}

/// A verification key derived from a published X.509 certificate.
///
/// Wraps the certificate's RSA public key as a `jsonwebtoken::DecodingKey`
/// ready for token-signature verification, alongside the raw certificate DER
/// for callers that need the certificate itself.
#[derive(Clone)]
pub struct SigningKey {
    kid: Option<String>,
    certificate_der: Vec<u8>,
    key: DecodingKey,
}

impl SigningKey {
    /// Converts a key-set entry into a signing key.
    ///
    /// Returns `Ok(None)` when the entry is filtered rather than failed:
    /// designated for encryption (or any explicit non-`sig` use), or carrying
    /// anything other than exactly one `x5c` certificate. Invalid base64 or
    /// malformed certificate bytes are errors.
    pub fn from_jwk(jwk: &JsonWebKey) -> Result<Option<Self>, OidcError> {
        if !jwk.is_signature_use() {
            return Ok(None);
        }
        // Exactly one leaf certificate; chains are not consumed here.
        let [encoded] = jwk.x5c.as_slice() else {
            return Ok(None);
        };
        let der = STANDARD
            .decode(encoded)
            .map_err(|err| OidcError::CertificateDecoding {
                kid: jwk.kid.clone(),
                reason: format!("invalid base64 in x5c: {err}"),
            })?;
        Self::from_certificate_der(der, jwk.kid.clone()).map(Some)
    }

    /// Builds a signing key from raw DER-encoded certificate bytes.
    pub fn from_certificate_der(
        der: Vec<u8>,
        kid: Option<String>,
    ) -> Result<Self, OidcError> {
        let certificate =
            Certificate::from_der(&der).map_err(|err| OidcError::CertificateDecoding {
                kid: kid.clone(),
                reason: format!("malformed certificate: {err}"),
            })?;

        let spki = &certificate.tbs_certificate.subject_public_key_info;
        if spki.algorithm.oid != RSA_ENCRYPTION {
            return Err(OidcError::CertificateDecoding {
                kid,
                reason: format!("unsupported public key algorithm {}", spki.algorithm.oid),
            });
        }
        let pkcs1 = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| OidcError::CertificateDecoding {
                kid: kid.clone(),
                reason: "public key bit string has unused bits".to_string(),
            })?;

        let key = DecodingKey::from_rsa_der(pkcs1);

        Ok(Self {
            kid,
            certificate_der: der,
            key,
        })
    }

    /// Key id of the originating JWK entry, if it carried one.
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Raw DER bytes of the certificate this key was derived from.
    pub fn certificate_der(&self) -> &[u8] {
        &self.certificate_der
    }

    /// The decoding key for verifying token signatures.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("certificate_der", &format_args!("{} bytes", self.certificate_der.len()))
            .finish_non_exhaustive()
    }
}
