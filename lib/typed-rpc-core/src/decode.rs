//! Inbound binding: an [`InboundRequest`] into a typed input.

use std::fmt;

use tracing::trace;

use crate::{InboundRequest, Json, ParamLocation, Result, Tagged};

/// One of the binding passes run by [`decode_bound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindPass {
    /// Path parameters.
    Path,
    /// Request body.
    Body,
    /// Query string.
    Query,
    /// Headers.
    Header,
}

impl BindPass {
    /// The location this pass reads from.
    #[must_use]
    pub const fn location(self) -> ParamLocation {
        match self {
            Self::Path => ParamLocation::Path,
            Self::Body => ParamLocation::Body,
            Self::Query => ParamLocation::Query,
            Self::Header => ParamLocation::Header,
        }
    }
}

impl fmt::Display for BindPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.location().fmt(f)
    }
}

/// Field-by-field binding of a request-shaped struct.
///
/// Implemented by `#[derive(Binding)]`. A pass writes only the fields tagged
/// for its own location and leaves every other field as it found it; a value
/// missing from the request leaves its field unchanged.
pub trait BindRequest: Tagged + Default {
    /// Run one binding pass.
    ///
    /// # Errors
    ///
    /// Returns a decode error when a value present in the request does not
    /// parse into its field.
    fn bind(&mut self, pass: BindPass, request: &InboundRequest) -> Result<()>;
}

/// Decode `T` from `request` with the default binding passes.
///
/// Starting from `T::default()`:
/// 1. path pass, when at least one path parameter was matched,
/// 2. body pass, when the body is not empty,
/// 3. query pass, when the query string has at least one pair,
/// 4. header pass, when `T` declares header-tagged fields.
///
/// The first failing pass aborts decoding.
///
/// # Errors
///
/// Returns the error of the first failing pass.
pub fn decode_bound<T: BindRequest>(request: &InboundRequest) -> Result<T> {
    let mut value = T::default();

    let passes = [
        (BindPass::Path, request.has_path_params()),
        (BindPass::Body, request.has_body()),
        (BindPass::Query, request.has_query()),
        (BindPass::Header, T::declares(ParamLocation::Header)),
    ];

    for (pass, applies) in passes {
        if applies {
            trace!(%pass, target_type = std::any::type_name::<T>(), "binding pass");
            value.bind(pass, request)?;
        }
    }

    Ok(value)
}

/// A value that can be read from an incoming request.
///
/// Derived types go through [`decode_bound`]; `()` ignores the request and
/// [`Json`] reads the whole body.
pub trait DecodeRequest: Sized {
    /// Decode a value from `request`.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the request does not match `Self`.
    fn decode(request: &InboundRequest) -> Result<Self>;
}

impl DecodeRequest for () {
    fn decode(_request: &InboundRequest) -> Result<Self> {
        Ok(())
    }
}

impl<T: DecodeRequest> DecodeRequest for Box<T> {
    fn decode(request: &InboundRequest) -> Result<Self> {
        T::decode(request).map(Box::new)
    }
}

/// An empty body yields `T::default()`.
impl<T: serde::de::DeserializeOwned + Default> DecodeRequest for Json<T> {
    fn decode(request: &InboundRequest) -> Result<Self> {
        if request.has_body() {
            request.parse_body().map(Json)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use http::Method;

    use super::*;
    use crate::{Binding, Error, FieldDescriptor};

    /// Records the passes it went through.
    #[derive(Debug, Default)]
    struct Recorder {
        id: u64,
        title: String,
        token: Option<String>,
        passes: Vec<BindPass>,
    }

    impl Tagged for Recorder {
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new("id", Some(Binding::Path("id")), false),
            FieldDescriptor::new("title", Some(Binding::Body("title")), false),
            FieldDescriptor::new("token", Some(Binding::Header("Authorization")), true),
        ];
    }

    impl BindRequest for Recorder {
        fn bind(&mut self, pass: BindPass, request: &InboundRequest) -> Result<()> {
            self.passes.push(pass);
            match pass {
                BindPass::Path => {
                    if let Some(id) = request.param(ParamLocation::Path, "id")? {
                        self.id = id;
                    }
                }
                BindPass::Body => {
                    let body: serde_json::Value = request.parse_body()?;
                    if let Some(title) = body.get("title").and_then(|t| t.as_str()) {
                        self.title = title.to_string();
                    }
                }
                BindPass::Header => {
                    if let Some(token) = request.param(ParamLocation::Header, "Authorization")? {
                        self.token = token;
                    }
                }
                BindPass::Query => {}
            }
            Ok(())
        }
    }

    #[test]
    fn path_only_request_runs_path_and_header_passes() {
        let request = InboundRequest::new(Method::GET)
            .with_path_params([("id".to_string(), "42".to_string())]);

        let value: Recorder = decode_bound(&request).expect("decode");

        check!(value.id == 42);
        check!(value.title.is_empty());
        check!(value.token.is_none());
        check!(value.passes == [BindPass::Path, BindPass::Header]);
    }

    /// Only a path field, no header.
    #[derive(Debug, Default)]
    struct PathOnly {
        id: u64,
        passes: Vec<BindPass>,
    }

    impl Tagged for PathOnly {
        const FIELDS: &'static [FieldDescriptor] =
            &[FieldDescriptor::new("id", Some(Binding::Path("id")), false)];
    }

    impl BindRequest for PathOnly {
        fn bind(&mut self, pass: BindPass, request: &InboundRequest) -> Result<()> {
            self.passes.push(pass);
            if pass == BindPass::Path
                && let Some(id) = request.param(ParamLocation::Path, "id")?
            {
                self.id = id;
            }
            Ok(())
        }
    }

    #[test]
    fn header_pass_is_skipped_without_header_fields() {
        let request = InboundRequest::new(Method::GET)
            .with_path_params([("id".to_string(), "7".to_string())]);

        let value: PathOnly = decode_bound(&request).expect("decode");

        check!(value.id == 7);
        check!(value.passes == [BindPass::Path]);
    }

    #[test]
    fn passes_run_in_order() {
        let request = InboundRequest::new(Method::POST)
            .with_path_params([("id".to_string(), "1".to_string())])
            .with_query(Some("x=1"))
            .with_body(r#"{"title":"hello"}"#);

        let value: Recorder = decode_bound(&request).expect("decode");

        check!(value.title == "hello");
        check!(
            value.passes
                == [
                    BindPass::Path,
                    BindPass::Body,
                    BindPass::Query,
                    BindPass::Header
                ]
        );
    }

    #[test]
    fn first_failure_aborts() {
        let request = InboundRequest::new(Method::POST)
            .with_path_params([("id".to_string(), "nope".to_string())])
            .with_body(r#"{"title":"hello"}"#);

        let result = decode_bound::<Recorder>(&request);

        let_assert!(Err(Error::Bind { location, name, .. }) = result);
        check!(location == ParamLocation::Path);
        check!(name == "id");
    }

    #[test]
    fn json_wrapper_defaults_on_empty_body() {
        let empty = InboundRequest::new(Method::POST);
        let Json(values) = Json::<Vec<u32>>::decode(&empty).expect("empty");
        check!(values.is_empty());

        let full = InboundRequest::new(Method::POST).with_body("[1,2]");
        let Json(values) = Json::<Vec<u32>>::decode(&full).expect("full");
        check!(values == [1, 2]);
    }
}
