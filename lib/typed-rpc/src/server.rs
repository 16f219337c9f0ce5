//! Axum handlers from typed functions.
//!
//! [`wrap_handler`] turns an `I → O` function into an axum handler: the
//! request is read into an [`InboundRequest`], decoded into `I`, passed to the
//! function, and the output is written as a JSON 200 response. Any failure is
//! handed to the error handler, by default a 500 with `{"error": "<message>"}`.
//!
//! ```ignore
//! use axum::{Router, routing::MethodFilter};
//! use typed_rpc::server::{RouterExt, wrap_getter, wrap_handler};
//!
//! let app = Router::new()
//!     .rpc(MethodFilter::PUT, "/items/{id}", wrap_handler(update_item))
//!     .rpc(MethodFilter::GET, "/health", wrap_getter(health));
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, on};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{DecodeRequest, Error, Handler, InboundRequest, PathTemplate, Result, ServerConfig};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Function<I, O> = Arc<dyn Fn(I) -> BoxFuture<Result<O>> + Send + Sync>;
type Decoder<I> = Arc<dyn Fn(&InboundRequest) -> Result<I> + Send + Sync>;
type Encoder<O> = Arc<dyn Fn(O) -> Result<Response> + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(Error) -> Response + Send + Sync>;

/// Output of handlers that return nothing, written as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Empty {}

/// Body of the default error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The error message.
    pub error: String,
}

/// Writes `output` as JSON with status 200.
///
/// # Errors
///
/// Returns [`Error::JsonSerialization`] when `output` cannot be serialized.
pub fn json_response<O: Serialize>(output: O) -> Result<Response> {
    let body = crate::to_json(&output)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Writes any error as a 500 with an [`ErrorBody`].
pub fn default_error_response(error: Error) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

/// A typed function wrapped as an axum handler.
///
/// Built by [`wrap_handler`] and friends; the decoder, encoder and error
/// handler can be replaced before the handler is routed.
pub struct Wrapped<I, O> {
    function: Function<I, O>,
    decoder: Decoder<I>,
    encoder: Encoder<O>,
    error_handler: ErrorHandler,
    config: ServerConfig,
}

impl<I, O> Clone for Wrapped<I, O> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
            decoder: Arc::clone(&self.decoder),
            encoder: Arc::clone(&self.encoder),
            error_handler: Arc::clone(&self.error_handler),
            config: self.config,
        }
    }
}

impl<I, O> fmt::Debug for Wrapped<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<I, O> Wrapped<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Replace the request decoder.
    #[must_use]
    pub fn with_decoder(
        mut self,
        decoder: impl Fn(&InboundRequest) -> Result<I> + Send + Sync + 'static,
    ) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Replace the request decoder with one producing a dynamic JSON value.
    ///
    /// The value is converted to `I`; a value of the wrong shape is an
    /// [`Error::TypeMismatch`].
    #[must_use]
    pub fn with_value_decoder(
        self,
        decoder: impl Fn(&InboundRequest) -> Result<serde_json::Value> + Send + Sync + 'static,
    ) -> Self
    where
        I: DeserializeOwned,
    {
        self.with_decoder(move |request| {
            let value = decoder(request)?;
            serde_json::from_value(value).map_err(Error::type_mismatch::<I>)
        })
    }

    /// Replace the response encoder.
    #[must_use]
    pub fn with_encoder(
        mut self,
        encoder: impl Fn(O) -> Result<Response> + Send + Sync + 'static,
    ) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }

    /// Replace the error handler.
    ///
    /// It receives every failure: reading the request, decoding, the
    /// function itself, and encoding.
    #[must_use]
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(Error) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    async fn read<S: Send + Sync>(
        &self,
        request: axum::extract::Request,
        state: &S,
    ) -> Result<InboundRequest> {
        let (mut parts, body) = request.into_parts();

        let path_params = match RawPathParams::from_request_parts(&mut parts, state).await {
            Ok(params) => params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            // Not routed through a `Router`: no matched parameters.
            Err(RawPathParamsRejection::MissingPathParams(_)) => Vec::new(),
            Err(rejection) => return Err(Error::invalid_request(rejection.body_text())),
        };

        let body = axum::body::to_bytes(body, self.config.body_limit)
            .await
            .map_err(|e| Error::invalid_request(format!("cannot read request body: {e}")))?;

        Ok(InboundRequest::new(parts.method)
            .with_path_params(path_params)
            .with_query(parts.uri.query())
            .with_headers(parts.headers)
            .with_body(body))
    }

    async fn respond<S: Send + Sync>(
        &self,
        request: axum::extract::Request,
        state: &S,
    ) -> Result<Response> {
        let inbound = self.read(request, state).await?;

        let input = (self.decoder)(&inbound).inspect_err(|err| {
            debug!(method = %inbound.method(), error = %err, "cannot decode request");
        })?;

        let output = (self.function)(input).await.inspect_err(|err| {
            warn!(method = %inbound.method(), error = %err, "handler failed");
        })?;

        (self.encoder)(output)
    }
}

impl<I, O, S> axum::handler::Handler<(), S> for Wrapped<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
    S: Clone + Send + Sync + 'static,
{
    type Future = BoxFuture<Response>;

    fn call(self, request: axum::extract::Request, state: S) -> Self::Future {
        Box::pin(async move {
            self.respond(request, &state)
                .await
                .unwrap_or_else(|err| (self.error_handler)(err))
        })
    }
}

/// Wrap `I → O`.
///
/// `I` is decoded with [`DecodeRequest`] (usually derived with
/// `#[derive(Binding)]`), `O` is written as JSON.
pub fn wrap_handler<I, O, H>(handler: H) -> Wrapped<I, O>
where
    I: DecodeRequest + Send + 'static,
    O: Serialize + Send + 'static,
    H: Handler<I, O> + 'static,
{
    let handler = Arc::new(handler);
    Wrapped {
        function: Arc::new(move |input: I| -> BoxFuture<Result<O>> {
            let handler = Arc::clone(&handler);
            Box::pin(async move { Handler::call(&*handler, input).await })
        }),
        decoder: Arc::new(I::decode),
        encoder: Arc::new(json_response::<O>),
        error_handler: Arc::new(default_error_response),
        config: ServerConfig::default(),
    }
}

/// Wrap `() → O`; the request is not decoded.
pub fn wrap_getter<O, F, Fut>(getter: F) -> Wrapped<(), O>
where
    O: Serialize + Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O>> + Send + 'static,
{
    wrap_handler(move |(): ()| getter())
}

/// Wrap `I → ()`; the response is `{}`.
pub fn wrap_consumer<I, F, Fut>(consumer: F) -> Wrapped<I, Empty>
where
    I: DecodeRequest + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    wrap_handler(move |input: I| {
        let done = consumer(input);
        async move { done.await.map(|()| Empty {}) }
    })
}

/// Wrap `() → ()`; the request is not decoded and the response is `{}`.
pub fn wrap_action<F, Fut>(action: F) -> Wrapped<(), Empty>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    wrap_handler(move |(): ()| {
        let done = action();
        async move { done.await.map(|()| Empty {}) }
    })
}

/// Routing of wrapped handlers by path template.
pub trait RouterExt<S> {
    /// Route `handler` for `method` at `template`.
    ///
    /// The template may use `{name}` or `:name` placeholders; it is rendered
    /// in the router's own syntax.
    #[must_use]
    fn rpc<H, T>(self, method: MethodFilter, template: &str, handler: H) -> Self
    where
        H: axum::handler::Handler<T, S>,
        T: 'static;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn rpc<H, T>(self, method: MethodFilter, template: &str, handler: H) -> Self
    where
        H: axum::handler::Handler<T, S>,
        T: 'static,
    {
        let route = PathTemplate::new(template).to_route();
        self.route(&route, on(method, handler))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use axum::body::Body;
    use http_body_util::BodyExt;

    use super::*;
    use crate::Json;

    async fn body_of(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes()
            .to_vec()
    }

    #[test]
    fn empty_is_an_empty_object() {
        check!(serde_json::to_string(&Empty {}).expect("serializable") == "{}");
    }

    #[tokio::test]
    async fn default_error_response_is_500_json() {
        let response = default_error_response(Error::invalid_request("bad"));
        check!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = serde_json::from_slice(&body_of(response).await).expect("json");
        check!(body.error == "invalid request: bad");
    }

    #[tokio::test]
    async fn handler_outside_a_router_has_no_path_params() {
        let wrapped = wrap_handler(|Json(n): Json<u32>| async move { Ok::<_, Error>(n + 1) });
        let request = axum::extract::Request::builder()
            .method("POST")
            .uri("/anything?x=1")
            .body(Body::from("41"))
            .expect("valid request");

        let response = axum::handler::Handler::<(), ()>::call(wrapped, request, ()).await;
        check!(response.status() == StatusCode::OK);
        check!(body_of(response).await == b"42");
    }

    #[tokio::test]
    async fn body_limit_is_enforced() {
        let wrapped = wrap_handler(|Json(text): Json<String>| async move { Ok::<_, Error>(text) })
            .with_config(ServerConfig::builder().body_limit(4).build());
        let request = axum::extract::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("\"far too long\""))
            .expect("valid request");

        let response = axum::handler::Handler::<(), ()>::call(wrapped, request, ()).await;
        check!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
        let_assert!(Ok(body) = serde_json::from_slice::<ErrorBody>(&body_of(response).await));
        check!(body.error.contains("cannot read request body"));
    }
}
