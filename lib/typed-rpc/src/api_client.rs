//! Generic API client wrapper.
//!
//! [`ApiClient`] pairs any [`HttpClient`] with a base URL to make an
//! [`RpcClient`] that endpoints can call through.

use std::future::Future;

use bytes::Bytes;
use url::Url;

use crate::{Error, HttpClient, Request, Response, Result, RpcClient};

/// An [`HttpClient`] bound to a base URL.
///
/// Share one `HyperClient` (and its connection pool) across several remote
/// services by wrapping it once per base URL.
///
/// # Example
///
/// ```ignore
/// use typed_rpc::{ApiClient, HyperClient};
///
/// let http = HyperClient::builder().with_logging().build();
///
/// let users = ApiClient::new(http.clone(), "https://users.internal/api")?;
/// let billing = ApiClient::new(http, "https://billing.internal")?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    client: C,
    base_url: Url,
}

impl<C> ApiClient<C> {
    /// Create a new API client with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        })
    }

    /// Create a new API client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C> RpcClient for ApiClient<C>
where
    C: HttpClient + Clone,
{
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        self.client.execute(request)
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}
