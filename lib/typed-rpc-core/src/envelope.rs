//! Outgoing request envelope.
//!
//! An [`EncodeRequest`](crate::EncodeRequest) implementation fills a
//! [`RequestEnvelope`]; the client pipeline then renders it against a base URL
//! and a [`PathTemplate`] with [`RequestEnvelope::into_request`].

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;
use serde_json::{Map, Value};
use url::Url;

use crate::{ContentType, PathTemplate, Request, Result, ToParam};

/// Body payload of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The whole input value, as JSON.
    Whole(Value),
    /// Only the body-tagged fields, as a JSON object.
    Fields(Map<String, Value>),
    /// A form URL-encoded payload.
    Form(Bytes),
    /// Pre-encoded bytes with their content type.
    Raw {
        /// `Content-Type` header value.
        content_type: String,
        /// Payload.
        bytes: Bytes,
    },
}

fn json_content_type() -> String {
    ContentType::Json.as_str().to_string()
}

impl Body {
    fn into_parts(self) -> Result<(String, Bytes)> {
        match self {
            Self::Whole(value) => Ok((json_content_type(), crate::to_json(&value)?)),
            Self::Fields(fields) => Ok((json_content_type(), crate::to_json(&fields)?)),
            Self::Form(bytes) => Ok((ContentType::FormUrlEncoded.as_str().to_string(), bytes)),
            Self::Raw {
                content_type,
                bytes,
            } => Ok((content_type, bytes)),
        }
    }
}

/// Per-call accumulation of path substitutions, query pairs, headers and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestEnvelope {
    path_params: BTreeMap<String, String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Body>,
}

impl RequestEnvelope {
    /// Create an empty envelope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a path substitution. `None` values are skipped.
    pub fn path_param(&mut self, name: &str, value: &(impl ToParam + ?Sized)) -> &mut Self {
        if let Some(value) = value.to_param() {
            self.path_params.insert(name.to_string(), value);
        }
        self
    }

    /// Append a query pair. `None` values are skipped.
    pub fn query(&mut self, name: &str, value: &(impl ToParam + ?Sized)) -> &mut Self {
        if let Some(value) = value.to_param() {
            self.query.push((name.to_string(), value));
        }
        self
    }

    /// Append a header. `None` values are skipped.
    pub fn header(&mut self, name: &str, value: &(impl ToParam + ?Sized)) -> &mut Self {
        if let Some(value) = value.to_param() {
            self.headers.push((name.to_string(), value));
        }
        self
    }

    /// Use `value` as the whole JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonSerialization`](crate::Error::JsonSerialization)
    /// if `value` cannot be represented as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.body = Some(Body::Whole(serde_json::to_value(value)?));
        Ok(self)
    }

    /// Add one member to the JSON body object.
    ///
    /// Replaces a whole-value body if one was set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonSerialization`](crate::Error::JsonSerialization)
    /// if `value` cannot be represented as JSON.
    pub fn body_field<T: serde::Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<&mut Self> {
        let value = serde_json::to_value(value)?;
        match &mut self.body {
            Some(Body::Fields(fields)) => {
                fields.insert(name.to_string(), value);
            }
            body => {
                let mut fields = Map::new();
                fields.insert(name.to_string(), value);
                *body = Some(Body::Fields(fields));
            }
        }
        Ok(self)
    }

    /// Use `value` as a form URL-encoded body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormSerialization`](crate::Error::FormSerialization)
    /// if `value` is not a flat record.
    pub fn form<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.body = Some(Body::Form(crate::to_form(value)?));
        Ok(self)
    }

    /// Use pre-encoded bytes as the body.
    pub fn raw_body(
        &mut self,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> &mut Self {
        self.body = Some(Body::Raw {
            content_type: content_type.into(),
            bytes: bytes.into(),
        });
        self
    }

    /// Path substitutions set so far.
    #[must_use]
    pub const fn path_params(&self) -> &BTreeMap<String, String> {
        &self.path_params
    }

    /// Query pairs set so far.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Headers set so far.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Render the envelope into a request.
    ///
    /// The expanded template is appended to the path of `base`. Query pairs
    /// are appended only when present, and a JSON body sets
    /// `Content-Type: application/json` unless a header already did.
    ///
    /// # Errors
    ///
    /// Fails when a placeholder is not bound, a header is invalid or the body
    /// cannot be encoded.
    pub fn into_request(
        self,
        method: Method,
        base: &Url,
        template: &PathTemplate,
    ) -> Result<Request<Bytes>> {
        let path = template.expand(&self.path_params)?;

        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        let full_path = format!("{}{path}", base.path().trim_end_matches('/'));
        url.set_path(&full_path);

        let mut builder = Request::builder(method, url)
            .query_pairs(&self.query)
            .extension(template.clone());

        let has_content_type = self
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = self.body {
            let (content_type, bytes) = body.into_parts()?;
            if !has_content_type {
                builder = builder.header("Content-Type", &content_type);
            }
            builder = builder.body(bytes);
        }

        builder.build()
    }
}
