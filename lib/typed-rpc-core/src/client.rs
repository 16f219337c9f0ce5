//! Transport traits.
//!
//! - [`HttpClient`] - executes a rendered request
//! - [`RpcClient`] - an [`HttpClient`] bound to a base URL, used by remote endpoints
//!
//! Implement [`RpcClient`] directly for custom authentication or for tests.

use std::future::Future;

use bytes::Bytes;
use url::Url;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations should be async-first and support connection pooling.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// A response with a failure status is still `Ok`; classifying it is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns a transport error ([`Error::Connection`](crate::Error::Connection),
    /// [`Error::Tls`](crate::Error::Tls) or [`Error::Timeout`](crate::Error::Timeout))
    /// when no response was received.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// A client remote endpoints can call through.
///
/// # Example
///
/// ```ignore
/// use typed_rpc::{HttpClient, HyperClient, Request, Response, Result, RpcClient};
/// use bytes::Bytes;
/// use url::Url;
///
/// #[derive(Clone)]
/// struct AuthenticatedClient {
///     inner: HyperClient,
///     base_url: Url,
///     token: String,
/// }
///
/// impl RpcClient for AuthenticatedClient {
///     async fn execute(&self, mut request: Request<Bytes>) -> Result<Response<Bytes>> {
///         let value = format!("Bearer {}", self.token).parse().expect("valid header");
///         request.headers_mut().insert("authorization", value);
///         self.inner.execute(request).await
///     }
///
///     fn base_url(&self) -> &Url {
///         &self.base_url
///     }
/// }
/// ```
pub trait RpcClient: Clone + Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns a transport error when no response was received.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;

    /// Base URL every endpoint path is appended to.
    fn base_url(&self) -> &Url;
}
