//! Document retrieval over HTTP.
//!
//! The resolver treats transport as an opaque collaborator: anything that can
//! turn an address into the textual document published there satisfies
//! [`DocumentRetriever`]. The provided [`HttpDocumentRetriever`] is a thin
//! reqwest wrapper; tests and embedders can substitute their own
//! implementation (a fixture store, an instrumented client, ...).

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::OidcError;

/// Default per-request timeout for [`HttpDocumentRetriever::new`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Asynchronously retrieves the raw textual content at an address.
///
/// Implementations fail with [`OidcError::Retrieval`] on network errors,
/// timeouts, and non-success response statuses, and with
/// [`OidcError::Cancelled`] when the cancellation token fires mid-fetch.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn get_document(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<String, OidcError>;
}

/// A [`DocumentRetriever`] backed by a `reqwest::Client`.
///
/// [`HttpDocumentRetriever::new`] builds its own client; use
/// [`HttpDocumentRetriever::with_client`] to supply a preconfigured one
/// (custom TLS roots, proxies, timeouts).
#[derive(Debug, Clone)]
pub struct HttpDocumentRetriever {
    client: reqwest::Client,
}

impl HttpDocumentRetriever {
    /// Creates a retriever with a default HTTP client.
    pub fn new() -> Result<Self, OidcError> {
        let client = reqwest::ClientBuilder::new()
            // Following redirects opens the client up to SSRF vulnerabilities.
            .redirect(reqwest::redirect::Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Creates a retriever around a caller-supplied client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentRetriever for HttpDocumentRetriever {
    async fn get_document(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> Result<String, OidcError> {
        debug!(address, "fetching document");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OidcError::Cancelled),
            result = self.client.get(address).send() => {
                result.map_err(|source| OidcError::Retrieval {
                    address: address.to_string(),
                    source,
                })?
            }
        };

        let response = response
            .error_for_status()
            .map_err(|source| OidcError::Retrieval {
                address: address.to_string(),
                source,
            })?;

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OidcError::Cancelled),
            result = response.text() => {
                result.map_err(|source| OidcError::Retrieval {
                    address: address.to_string(),
                    source,
                })?
            }
        };

        Ok(body)
    }
}
