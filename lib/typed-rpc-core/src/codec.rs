//! Body codecs.

use bytes::Bytes;

use crate::{Error, Result};

/// Content type of a request or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }

    /// Classify a `Content-Type` header value.
    ///
    /// Parameters such as `charset` are ignored. A missing value is JSON, and
    /// so is any `+json` structured syntax suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMediaType`] for anything else.
    pub fn from_header(value: Option<&str>) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::Json);
        };
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "" | "application/json" => Ok(Self::Json),
            "application/x-www-form-urlencoded" => Ok(Self::FormUrlEncoded),
            other if other.ends_with("+json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedMediaType(value.to_string())),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use typed_rpc_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String }
///
/// let user = User { name: "Alice".to_string() };
/// let bytes = to_json(&user).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns [`Error::JsonDeserialization`] with the path to the field that
/// failed (e.g. `user.address.city`).
///
/// # Example
///
/// ```
/// use typed_rpc_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let user: User = from_json(br#"{"name":"Alice"}"#).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}

/// Serialize a value to form URL-encoded bytes.
///
/// Uses `serde_html_form` which supports `Vec<T>` for repeated fields
/// (e.g., `tags=a&tags=b`).
///
/// # Errors
///
/// Returns an error if form serialization fails.
pub fn to_form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize form URL-encoded bytes.
///
/// # Errors
///
/// Returns [`Error::FormDeserialization`] if the payload does not match `T`.
pub fn from_form<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_html_form::from_bytes(bytes).map_err(|e| Error::FormDeserialization(e.to_string()))
}

/// Decode a body according to its content type.
///
/// # Errors
///
/// Fails when the content type is not supported or the payload does not
/// match `T`.
pub fn decode_body<T: serde::de::DeserializeOwned>(
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<T> {
    match ContentType::from_header(content_type)? {
        ContentType::Json => from_json(bytes),
        ContentType::FormUrlEncoded => from_form(bytes),
    }
}
