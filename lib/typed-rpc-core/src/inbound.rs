//! Server-side view of an incoming request.

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::{FromParam, ParamLocation, Result};

/// Path parameters, query pairs, headers and raw body of an incoming request.
///
/// The server glue builds one per call from the framework request; decoders
/// read from it without caring which framework produced it.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    method: Method,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
}

impl InboundRequest {
    /// Create an inbound request without parameters or body.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the matched path parameters.
    #[must_use]
    pub fn with_path_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.path_params = params.into_iter().collect();
        self
    }

    /// Parse and set the raw query string (without the leading `?`).
    #[must_use]
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        self
    }

    /// Set the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Raw value of a path parameter.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Header value, if it is valid visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Declared `Content-Type`.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
    }

    /// All path parameters.
    #[must_use]
    pub fn path_params(&self) -> &[(String, String)] {
        &self.path_params
    }

    /// All query pairs, in order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// All headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Whether at least one path parameter was matched.
    #[must_use]
    pub fn has_path_params(&self) -> bool {
        !self.path_params.is_empty()
    }

    /// Whether the query string has at least one pair.
    #[must_use]
    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }

    /// Whether the body has a nonzero length.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Parse a scalar from `location`.
    ///
    /// Returns `Ok(None)` when the value is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`](crate::Error::Bind) naming the location and
    /// parameter when the raw value does not parse.
    pub fn param<T: FromParam>(&self, location: ParamLocation, name: &str) -> Result<Option<T>> {
        let raw = match location {
            ParamLocation::Path => self.path_param(name),
            ParamLocation::Query => self.query_param(name),
            ParamLocation::Header => self.header(name),
            ParamLocation::Body => None,
        };
        raw.map(|raw| T::from_param(raw).map_err(|e| crate::Error::bind(location, name, e)))
            .transpose()
    }

    /// Decode the whole body according to the declared content type.
    ///
    /// JSON is used when the content type is absent or `*+json`.
    ///
    /// # Errors
    ///
    /// Fails on unsupported media types and on payloads that do not match `T`.
    pub fn parse_body<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        crate::decode_body(self.content_type(), &self.body)
    }
}
