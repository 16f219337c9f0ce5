//! Remote endpoints: typed functions backed by an HTTP call.
//!
//! An [`Endpoint`] turns `I → O` into encode-request, execute, error check and
//! decode-response. [`Getter`], [`Consumer`] and [`Action`] are the shapes
//! without an input, an output, or either.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use crate::{
    EncodeRequest, Error, Handler, Method, PathTemplate, RequestEnvelope, Response, Result,
    RpcClient,
};

type Encoder<I> = Arc<dyn Fn(&I, &mut RequestEnvelope) -> Result<()> + Send + Sync>;
type Decoder<O> = Arc<dyn Fn(&Response<Bytes>) -> Result<O> + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(Result<Response<Bytes>>) -> Result<Response<Bytes>> + Send + Sync>;

/// Passes transport errors through, then turns a 4xx or 5xx status into
/// [`Error::Http`] carrying the canonical status text and the body.
///
/// # Errors
///
/// Returns the transport error, or the status error.
pub fn default_error_handler(outcome: Result<Response<Bytes>>) -> Result<Response<Bytes>> {
    let response = outcome?;
    if response.is_client_error() || response.is_server_error() {
        let status = response.status();
        let message = response.status_text();
        return Err(Error::http_with_body(status, message, response.into_body()));
    }
    Ok(response)
}

/// A typed remote call `I → O`.
///
/// By default the input is encoded with [`EncodeRequest`], the response is
/// checked with [`default_error_handler`], and the body is decoded as JSON
/// (an empty body gives `O::default()`). Each step can be replaced. An output
/// type without `Default` is read by the decoder given to
/// [`Endpoint::decoded_by`].
///
/// # Example
///
/// ```ignore
/// use typed_rpc::{ApiClient, Binding, Endpoint, HyperClient, Method};
///
/// #[derive(Debug, Default, Binding, Serialize, Deserialize)]
/// struct UpdateItem {
///     #[rpc(path)]
///     id: u64,
///     #[rpc(header = "Authorization")]
///     token: String,
///     #[rpc(body)]
///     title: String,
/// }
///
/// let client = ApiClient::new(HyperClient::new(), "http://localhost:8080")?;
/// let update: Endpoint<_, UpdateItem, Item> =
///     Endpoint::new(client, Method::PUT, "/items/{id}");
/// let item = update.call(request).await?;
/// ```
pub struct Endpoint<C, I, O> {
    client: C,
    method: Method,
    template: PathTemplate,
    encoder: Encoder<I>,
    decoder: Decoder<O>,
    error_handler: ErrorHandler,
}

impl<C: Clone, I, O> Clone for Endpoint<C, I, O> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            method: self.method.clone(),
            template: self.template.clone(),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
            error_handler: Arc::clone(&self.error_handler),
        }
    }
}

impl<C, I, O> fmt::Debug for Endpoint<C, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.method)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl<C, I, O> Endpoint<C, I, O>
where
    C: RpcClient,
    I: EncodeRequest + 'static,
    O: DeserializeOwned + Default + 'static,
{
    /// Create an endpoint with the default encoder, decoder and error handler.
    pub fn new(client: C, method: Method, template: impl Into<PathTemplate>) -> Self {
        Self::decoded_by(client, method, template, |response| {
            response.json_or_default::<O>()
        })
    }
}

impl<C, I, O> Endpoint<C, I, O>
where
    C: RpcClient,
    I: EncodeRequest + 'static,
    O: 'static,
{
    /// Create an endpoint whose response body is read by `decoder`.
    pub fn decoded_by(
        client: C,
        method: Method,
        template: impl Into<PathTemplate>,
        decoder: impl Fn(&Response<Bytes>) -> Result<O> + Send + Sync + 'static,
    ) -> Self {
        Self {
            client,
            method,
            template: template.into(),
            encoder: Arc::new(|input: &I, envelope: &mut RequestEnvelope| input.encode(envelope)),
            decoder: Arc::new(decoder),
            error_handler: Arc::new(default_error_handler),
        }
    }
}

impl<C, O> Endpoint<C, (), O>
where
    C: RpcClient,
    O: DeserializeOwned + Default + 'static,
{
    /// Create a [`Getter`]: no input, typed output.
    pub fn getter(client: C, method: Method, template: impl Into<PathTemplate>) -> Getter<C, O> {
        Getter(Endpoint::new(client, method, template))
    }
}

impl<C, I> Endpoint<C, I, IgnoredAny>
where
    C: RpcClient,
    I: EncodeRequest + 'static,
{
    /// Create a [`Consumer`]: typed input, the response body is discarded.
    pub fn consumer(
        client: C,
        method: Method,
        template: impl Into<PathTemplate>,
    ) -> Consumer<C, I> {
        Consumer(Endpoint::new(client, method, template))
    }
}

impl<C> Endpoint<C, (), IgnoredAny>
where
    C: RpcClient,
{
    /// Create an [`Action`]: no input, the response body is discarded.
    pub fn action(client: C, method: Method, template: impl Into<PathTemplate>) -> Action<C> {
        Action(Endpoint::new(client, method, template))
    }
}

impl<C, I, O> Endpoint<C, I, O>
where
    C: RpcClient,
    I: 'static,
    O: 'static,
{
    /// Replace the request encoder.
    #[must_use]
    pub fn with_encoder(
        mut self,
        encoder: impl Fn(&I, &mut RequestEnvelope) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    /// Replace the response decoder.
    #[must_use]
    pub fn with_decoder(
        mut self,
        decoder: impl Fn(&Response<Bytes>) -> Result<O> + Send + Sync + 'static,
    ) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Replace the response decoder with one producing a dynamic JSON value.
    ///
    /// The value is converted to `O`; a value of the wrong shape is an
    /// [`Error::TypeMismatch`].
    #[must_use]
    pub fn with_value_decoder(
        self,
        decoder: impl Fn(&Response<Bytes>) -> Result<serde_json::Value> + Send + Sync + 'static,
    ) -> Self
    where
        O: DeserializeOwned,
    {
        self.with_decoder(move |response| {
            let value = decoder(response)?;
            serde_json::from_value(value).map_err(Error::type_mismatch::<O>)
        })
    }

    /// Replace the error handler.
    ///
    /// The handler sees the transport outcome before decoding; returning
    /// `Ok` hands the response to the decoder.
    #[must_use]
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(Result<Response<Bytes>>) -> Result<Response<Bytes>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    /// HTTP method of the endpoint.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path template of the endpoint.
    #[must_use]
    pub const fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Call the endpoint.
    ///
    /// # Errors
    ///
    /// Encoding errors, then whatever the error handler returns (by default
    /// the transport error or [`Error::Http`]), then decoding errors.
    pub async fn call(&self, input: I) -> Result<O> {
        let mut envelope = RequestEnvelope::new();
        (self.encoder)(&input, &mut envelope)?;
        let request =
            envelope.into_request(self.method.clone(), self.client.base_url(), &self.template)?;

        debug!(
            method = %self.method,
            endpoint = %self.template,
            url = %request.url(),
            "calling endpoint"
        );
        let outcome = self.client.execute(request).await;

        let response = (self.error_handler)(outcome).inspect_err(|err| {
            warn!(
                method = %self.method,
                endpoint = %self.template,
                error = %err,
                "endpoint call failed"
            );
        })?;

        let output = (self.decoder)(&response).inspect_err(|err| {
            warn!(
                method = %self.method,
                endpoint = %self.template,
                error = %err,
                "cannot decode response"
            );
        })?;
        debug!(
            method = %self.method,
            endpoint = %self.template,
            status = response.status(),
            "endpoint call completed"
        );
        Ok(output)
    }
}

impl<C, I, O> Handler<I, O> for Endpoint<C, I, O>
where
    C: RpcClient,
    I: Send + 'static,
    O: Send + 'static,
{
    fn call(&self, input: I) -> impl Future<Output = Result<O>> + Send {
        Endpoint::call(self, input)
    }
}

/// A remote call without input: `() → O`.
pub struct Getter<C, O>(Endpoint<C, (), O>);

impl<C: Clone, O> Clone for Getter<C, O> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C, O> fmt::Debug for Getter<C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Getter").field(&self.0).finish()
    }
}

impl<C, O> Getter<C, O>
where
    C: RpcClient,
    O: 'static,
{
    /// Replace the response decoder.
    #[must_use]
    pub fn with_decoder(
        self,
        decoder: impl Fn(&Response<Bytes>) -> Result<O> + Send + Sync + 'static,
    ) -> Self {
        Self(self.0.with_decoder(decoder))
    }

    /// Replace the error handler.
    #[must_use]
    pub fn with_error_handler(
        self,
        handler: impl Fn(Result<Response<Bytes>>) -> Result<Response<Bytes>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(self.0.with_error_handler(handler))
    }

    /// The underlying endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint<C, (), O> {
        &self.0
    }

    /// Call the endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::call`].
    pub async fn call(&self) -> Result<O> {
        self.0.call(()).await
    }
}

impl<C, O> Handler<(), O> for Getter<C, O>
where
    C: RpcClient,
    O: Send + 'static,
{
    fn call(&self, (): ()) -> impl Future<Output = Result<O>> + Send {
        self.0.call(())
    }
}

/// A remote call without output: `I → ()`. Any response body is discarded.
pub struct Consumer<C, I>(Endpoint<C, I, IgnoredAny>);

impl<C: Clone, I> Clone for Consumer<C, I> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C, I> fmt::Debug for Consumer<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Consumer").field(&self.0).finish()
    }
}

impl<C, I> Consumer<C, I>
where
    C: RpcClient,
    I: 'static,
{
    /// Replace the request encoder.
    #[must_use]
    pub fn with_encoder(
        self,
        encoder: impl Fn(&I, &mut RequestEnvelope) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self(self.0.with_encoder(encoder))
    }

    /// Replace the error handler.
    #[must_use]
    pub fn with_error_handler(
        self,
        handler: impl Fn(Result<Response<Bytes>>) -> Result<Response<Bytes>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(self.0.with_error_handler(handler))
    }

    /// The underlying endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint<C, I, IgnoredAny> {
        &self.0
    }

    /// Call the endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::call`].
    pub async fn call(&self, input: I) -> Result<()> {
        self.0.call(input).await.map(|_| ())
    }
}

impl<C, I> Handler<I, ()> for Consumer<C, I>
where
    C: RpcClient,
    I: Send + 'static,
{
    fn call(&self, input: I) -> impl Future<Output = Result<()>> + Send {
        Consumer::call(self, input)
    }
}

/// A remote call without input or output: `() → ()`.
pub struct Action<C>(Endpoint<C, (), IgnoredAny>);

impl<C: Clone> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.0).finish()
    }
}

impl<C> Action<C>
where
    C: RpcClient,
{
    /// Replace the error handler.
    #[must_use]
    pub fn with_error_handler(
        self,
        handler: impl Fn(Result<Response<Bytes>>) -> Result<Response<Bytes>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(self.0.with_error_handler(handler))
    }

    /// The underlying endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint<C, (), IgnoredAny> {
        &self.0
    }

    /// Call the endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::call`].
    pub async fn call(&self) -> Result<()> {
        self.0.call(()).await.map(|_| ())
    }
}

impl<C> Handler<(), ()> for Action<C>
where
    C: RpcClient,
{
    fn call(&self, (): ()) -> impl Future<Output = Result<()>> + Send {
        Action::call(self)
    }
}
