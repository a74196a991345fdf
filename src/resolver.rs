//! The configuration resolver: discovery document, then key set, then keys.
//!
//! Resolution is a single logical operation with two strictly ordered
//! suspension points. The discovery document is fetched and parsed first;
//! only if it names a `jwks_uri` is the key-set document fetched, and each of
//! its entries filtered and converted. No step is retried and no partial
//! configuration is ever returned: a transport or parse failure at either
//! stage aborts the whole operation.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::OidcConfiguration;
use crate::errors::OidcError;
use crate::jwks::{JsonWebKeySet, SigningKey};
use crate::retriever::{DocumentRetriever, HttpDocumentRetriever};

/// What to do when an `x5c` certificate fails to decode.
///
/// Use-filtered entries and chain-length mismatches are silently skipped
/// under either policy; this only governs entries that *should* convert but
/// carry undecodable certificate material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CertificatePolicy {
    /// Abort the whole resolution. The default.
    #[default]
    Strict,
    /// Skip the offending entry (it still lands in the raw key set) and
    /// continue.
    Lenient,
}

/// Resolves a provider configuration with a default HTTP retriever.
pub async fn get(
    address: &str,
    cancel: &CancellationToken,
) -> Result<OidcConfiguration, OidcError> {
    let retriever = HttpDocumentRetriever::new()?;
    get_with_retriever(&retriever, address, cancel).await
}

/// Resolves a provider configuration over a caller-supplied `reqwest::Client`.
pub async fn get_with_client(
    address: &str,
    client: reqwest::Client,
    cancel: &CancellationToken,
) -> Result<OidcConfiguration, OidcError> {
    let retriever = HttpDocumentRetriever::with_client(client);
    get_with_retriever(&retriever, address, cancel).await
}

/// Resolves a provider configuration through any [`DocumentRetriever`], with
/// the strict certificate policy.
pub async fn get_with_retriever<R>(
    retriever: &R,
    address: &str,
    cancel: &CancellationToken,
) -> Result<OidcConfiguration, OidcError>
where
    R: DocumentRetriever + ?Sized,
{
    resolve(retriever, address, CertificatePolicy::Strict, cancel).await
}

async fn resolve<R>(
    retriever: &R,
    address: &str,
    policy: CertificatePolicy,
    cancel: &CancellationToken,
) -> Result<OidcConfiguration, OidcError>
where
    R: DocumentRetriever + ?Sized,
{
    if address.trim().is_empty() {
        return Err(OidcError::InvalidArgument("address"));
    }

    let document = retriever.get_document(address, cancel).await?;
    let mut configuration = OidcConfiguration::from_json(&document)?;

    let Some(jwks_uri) = configuration
        .jwks_uri
        .clone()
        .filter(|uri| !uri.is_empty())
    else {
        return Ok(configuration);
    };

    let document = retriever.get_document(&jwks_uri, cancel).await?;
    let key_set = JsonWebKeySet::from_json(&document)?;

    // Build both collections locally and attach once, so a failure partway
    // through the loop never leaks into the configuration.
    let mut signing_keys = Vec::new();
    let mut raw_keys = Vec::with_capacity(key_set.keys.len());

    for jwk in key_set.keys {
        match SigningKey::from_jwk(&jwk) {
            Ok(Some(key)) => signing_keys.push(key),
            Ok(None) => {}
            Err(err) => match policy {
                CertificatePolicy::Strict => return Err(err),
                CertificatePolicy::Lenient => {
                    warn!(kid = ?jwk.kid, error = %err, "skipping key with undecodable certificate");
                }
            },
        }
        raw_keys.push(jwk);
    }

    debug!(
        signing_keys = signing_keys.len(),
        published_keys = raw_keys.len(),
        "resolved provider key set"
    );
    configuration.attach_keys(signing_keys, raw_keys);
    Ok(configuration)
}

/// Capability of resolving one kind of configuration document through a
/// [`DocumentRetriever`].
///
/// Lets this resolver be composed polymorphically alongside resolvers for
/// other provider metadata types that share the same retrieval contract.
#[async_trait]
pub trait ConfigurationRetriever {
    type Configuration;

    async fn get_configuration(
        &self,
        retriever: &dyn DocumentRetriever,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<Self::Configuration, OidcError>;
}

/// [`ConfigurationRetriever`] adapter for OpenID Connect configurations.
///
/// Also the place to opt into the lenient certificate policy; the free
/// functions in this module always resolve strictly.
#[derive(Debug, Clone, Copy, Default)]
pub struct OidcConfigurationRetriever {
    certificate_policy: CertificatePolicy,
}

impl OidcConfigurationRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip entries with undecodable certificates instead of failing.
    pub fn lenient() -> Self {
        Self {
            certificate_policy: CertificatePolicy::Lenient,
        }
    }
}

#[async_trait]
impl ConfigurationRetriever for OidcConfigurationRetriever {
    type Configuration = OidcConfiguration;

    async fn get_configuration(
        &self,
        retriever: &dyn DocumentRetriever,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<OidcConfiguration, OidcError> {
        resolve(retriever, address, self.certificate_policy, cancel).await
    }
}
