use thiserror::Error;

/// Errors surfaced while resolving an OpenID Connect provider configuration.
///
/// Resolution is all-or-nothing: none of these variants leave a partially
/// populated [`OidcConfiguration`](crate::OidcConfiguration) behind, and no
/// variant is retried internally. Retry policy belongs to the document
/// retriever, not to this crate.
#[derive(Debug, Error)]
pub enum OidcError {
    /// A required argument was empty or whitespace. Raised before any I/O.
    #[error("argument `{0}` must not be empty")]
    InvalidArgument(&'static str),

    /// The transport failed while fetching a document: network error,
    /// timeout, or a non-success response status.
    #[error("failed to retrieve document from {address}: {source}")]
    Retrieval {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    /// The discovery document could not be parsed.
    #[error("failed to parse OIDC configuration document: {0}")]
    ConfigurationParse(#[source] serde_json::Error),

    /// The key-set document could not be parsed.
    #[error("failed to parse key set document: {0}")]
    KeySetParse(#[source] serde_json::Error),

    /// An `x5c` entry held invalid base64, malformed certificate bytes, or a
    /// certificate whose public key is not an RSA key.
    #[error("failed to decode certificate (kid {kid:?}): {reason}")]
    CertificateDecoding {
        kid: Option<String>,
        reason: String,
    },

    /// The cancellation signal fired during a fetch.
    #[error("configuration resolution was cancelled")]
    Cancelled,

    /// The default HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
