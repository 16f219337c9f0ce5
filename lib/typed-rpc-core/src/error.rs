//! Error types for typed-rpc.

use derive_more::{Display, Error, From};

use crate::ParamLocation;

/// Boxed business error carried by [`Error::Service`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for typed-rpc operations.
///
/// The variants fall into four families:
/// - decode errors ([`Error::Bind`], [`Error::JsonDeserialization`],
///   [`Error::FormDeserialization`], [`Error::UnsupportedMediaType`]),
/// - transport errors ([`Error::Connection`], [`Error::Tls`], [`Error::Timeout`]),
/// - declared failure status ([`Error::Http`]),
/// - contract violations of custom codecs ([`Error::TypeMismatch`]).
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status text (e.g. `Not Found`).
        message: String,
        /// Response body, if any.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration (bad template, unbound placeholder, ...).
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// A scalar path, query or header value could not be parsed.
    #[display("cannot bind {location} parameter '{name}': {message}")]
    #[from(skip)]
    Bind {
        /// Where the value was read from.
        location: ParamLocation,
        /// Wire name of the parameter.
        name: String,
        /// Parser message.
        message: String,
    },

    /// The request body has a content type we cannot decode.
    #[display("unsupported media type: {_0}")]
    #[from(skip)]
    UnsupportedMediaType(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// Form URL-encoded deserialization error.
    #[display("form deserialization error: {_0}")]
    #[from(skip)]
    FormDeserialization(#[error(not(source))] String),

    /// A custom codec produced a value whose shape does not match the declared type.
    #[display("{expected} expected, but the decoder returned a mismatching value: {message}")]
    #[from(skip)]
    TypeMismatch {
        /// Name of the declared type.
        expected: &'static str,
        /// Conversion message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Error returned by a business function.
    #[display("{_0}")]
    #[from(skip)]
    Service(BoxError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a binding error for a scalar parameter.
    #[must_use]
    pub fn bind(
        location: ParamLocation,
        name: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Bind {
            location,
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a type mismatch error for the declared type `T`.
    #[must_use]
    pub fn type_mismatch<T: ?Sized>(message: impl std::fmt::Display) -> Self {
        Self::TypeMismatch {
            expected: std::any::type_name::<T>(),
            message: message.to_string(),
        }
    }

    /// Wrap a business error.
    #[must_use]
    pub fn service(error: impl Into<BoxError>) -> Self {
        Self::Service(error.into())
    }

    /// Returns the business error if it has type `E`.
    #[must_use]
    pub fn downcast_service_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Service(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` for errors raised while decoding input or output.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Bind { .. }
                | Self::JsonDeserialization { .. }
                | Self::FormDeserialization(_)
                | Self::UnsupportedMediaType(_)
        )
    }

    /// Returns `true` if this is a [`Error::TypeMismatch`].
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Debug, Deserialize)]
    /// struct ApiError {
    ///     code: String,
    ///     message: String,
    /// }
    ///
    /// if let Err(err) = get_user.call(GetUser { id: 7 }).await {
    ///     if let Some(Ok(api_error)) = err.decode_body::<ApiError>() {
    ///         eprintln!("{}: {}", api_error.code, api_error.message);
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("user not found")]
    struct NotFound;

    #[test]
    fn error_display() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::bind(ParamLocation::Path, "id", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "cannot bind path parameter 'id': invalid digit found in string"
        );

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(err.is_not_found());
        assert!(!err.is_server_error());

        let err = Error::http(500, "Internal Server Error");
        assert!(err.is_server_error());

        assert_eq!(Error::Timeout.status(), None);
    }

    #[test]
    fn error_families() {
        assert!(Error::Timeout.is_timeout());
        assert!(Error::connection("refused").is_connection());
        assert!(Error::bind(ParamLocation::Query, "page", "nope").is_decode());
        assert!(Error::UnsupportedMediaType("text/xml".to_string()).is_decode());
        assert!(!Error::http(400, "Bad Request").is_decode());
        assert!(Error::type_mismatch::<u64>("expected u64").is_type_mismatch());
    }

    #[test]
    fn type_mismatch_names_the_declared_type() {
        let err = Error::type_mismatch::<Vec<String>>("invalid type: map");
        let msg = err.to_string();
        assert!(msg.contains("alloc::vec::Vec<alloc::string::String>"), "{msg}");
        assert!(msg.contains("invalid type: map"), "{msg}");
    }

    #[test]
    fn service_error_downcast() {
        let err = Error::service(NotFound);
        assert_eq!(err.to_string(), "user not found");
        assert!(err.downcast_service_ref::<NotFound>().is_some());
        assert!(Error::Timeout.downcast_service_ref::<NotFound>().is_none());
    }

    #[test]
    fn error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let body = bytes::Bytes::from(r#"{"error": "not found"}"#);
        let err = Error::http_with_body(404, "Not Found", body);

        let decoded = err
            .decode_body::<ApiError>()
            .expect("should have body")
            .expect("should decode");
        assert_eq!(
            decoded,
            ApiError {
                error: "not found".to_string()
            }
        );

        assert!(Error::http(404, "Not Found").decode_body::<ApiError>().is_none());
        assert!(Error::Timeout.decode_body::<ApiError>().is_none());
    }
}
