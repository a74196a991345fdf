/*!
Resolves the operational configuration of an OpenID Connect identity
provider: fetch the discovery document, fetch the key set it references, and
turn each eligible published key into a verification key ready for
token-signature checks.

```no_run
use oidc_discovery::resolver;
use tokio_util::sync::CancellationToken;

# async fn run() -> Result<(), oidc_discovery::OidcError> {
let cancel = CancellationToken::new();
let config = resolver::get(
    "https://idp.example/.well-known/openid-configuration",
    &cancel,
)
.await?;

for key in config.signing_keys() {
    println!("signing key: {:?}", key.kid());
}
# Ok(())
# }
```

What this crate does not do: validate the discovery metadata against the
OpenID Connect specification, cache or refresh configurations, verify
certificate chains, or support non-RSA keys. Those concerns belong to the
layers around it.
*/

pub mod config;
pub mod errors;
pub mod jwks;
pub mod resolver;
pub mod retriever;

pub use config::OidcConfiguration;
pub use errors::OidcError;
pub use jwks::{JsonWebKey, JsonWebKeySet, SigningKey};
pub use resolver::{CertificatePolicy, ConfigurationRetriever, OidcConfigurationRetriever};
pub use retriever::{DocumentRetriever, HttpDocumentRetriever};
