//! Field descriptors for request-shaped types.
//!
//! `#[derive(Binding)]` emits one [`FieldDescriptor`] per field into
//! [`Tagged::FIELDS`]. The table is built at compile time and both the
//! outbound and the inbound binder consult it.

use std::fmt;

/// Parameter location in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Path parameter (e.g., `/users/{id}`)
    Path,
    /// Query parameter (e.g., `?limit=10`)
    Query,
    /// Header parameter
    Header,
    /// Request body
    Body,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Destination of one field, with its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Substituted into a `{name}` placeholder of the URL template.
    Path(&'static str),
    /// Appended as a query pair (`form` is an alias).
    Query(&'static str),
    /// Sent as a request header.
    Header(&'static str),
    /// Member of the JSON body object.
    Body(&'static str),
}

impl Binding {
    /// The location this binding targets.
    #[must_use]
    pub const fn location(&self) -> ParamLocation {
        match self {
            Self::Path(_) => ParamLocation::Path,
            Self::Query(_) => ParamLocation::Query,
            Self::Header(_) => ParamLocation::Header,
            Self::Body(_) => ParamLocation::Body,
        }
    }

    /// The wire name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Path(name) | Self::Query(name) | Self::Header(name) | Self::Body(name) => name,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location(), self.name())
    }
}

/// Compile-time description of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The Rust field name.
    pub field: &'static str,
    /// Where the field goes, `None` for an untagged field.
    pub binding: Option<Binding>,
    /// Whether the field is an `Option<_>`.
    pub optional: bool,
}

impl FieldDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub const fn new(field: &'static str, binding: Option<Binding>, optional: bool) -> Self {
        Self {
            field,
            binding,
            optional,
        }
    }

    /// Returns `true` if the field targets `location`.
    #[must_use]
    pub const fn is_bound_to(&self, location: ParamLocation) -> bool {
        match &self.binding {
            Some(binding) => binding.location() as u8 == location as u8,
            None => false,
        }
    }
}

/// How the body of a request-shaped type is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// No field carries a tag: every field is a member of the body.
    Whole,
    /// The body is the object of the body-tagged fields.
    Fields,
    /// Some fields are tagged, none for the body.
    None,
}

/// A type with a static field-binding table.
///
/// Implemented by `#[derive(Binding)]`.
pub trait Tagged {
    /// One descriptor per non-skipped field, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Returns `true` if any field is bound to `location`.
    #[must_use]
    fn declares(location: ParamLocation) -> bool {
        Self::FIELDS.iter().any(|field| field.is_bound_to(location))
    }

    /// The body mode derived from the tags.
    #[must_use]
    fn body_mode() -> BodyMode {
        if Self::FIELDS.iter().all(|field| field.binding.is_none()) {
            BodyMode::Whole
        } else if Self::declares(ParamLocation::Body) {
            BodyMode::Fields
        } else {
            BodyMode::None
        }
    }
}
