//! Attribute parsing for `#[derive(Binding)]`.

use syn::{Attribute, LitStr};

/// Which impls the derive generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Side {
    /// Encode and decode (default).
    #[default]
    Both,
    /// Only `EncodeRequest`, for client-only types.
    EncodeOnly,
    /// Only `BindRequest`/`DecodeRequest`, for server-only types.
    DecodeOnly,
}

impl Side {
    pub(crate) const fn encodes(self) -> bool {
        matches!(self, Self::Both | Self::EncodeOnly)
    }

    pub(crate) const fn decodes(self) -> bool {
        matches!(self, Self::Both | Self::DecodeOnly)
    }
}

/// Struct-level options parsed from `#[rpc(...)]`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StructOptions {
    pub(crate) side: Side,
}

/// Where a field is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Destination {
    Path,
    Query,
    Header,
    Body,
}

/// A tag as written, before precedence is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Tag {
    Path,
    Query,
    Form,
    Header,
    Body,
}

impl Tag {
    const fn destination(self) -> Destination {
        match self {
            Self::Path => Destination::Path,
            Self::Query | Self::Form => Destination::Query,
            Self::Header => Destination::Header,
            Self::Body => Destination::Body,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "form" => Some(Self::Form),
            "header" => Some(Self::Header),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

/// Field options parsed from `#[rpc(...)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldOptions {
    /// `#[rpc(skip)]`: not part of the request contract.
    pub(crate) skip: bool,
    /// Every tag seen, with its explicit wire name.
    pub(crate) tags: Vec<(Tag, Option<String>)>,
}

impl FieldOptions {
    /// The single destination of the field.
    ///
    /// First match wins in the order path, query, form, header, body.
    pub(crate) fn resolve(&self, field_name: &str) -> Option<(Destination, String)> {
        self.tags
            .iter()
            .min_by_key(|(tag, _)| *tag)
            .map(|(tag, name)| {
                let name = name.clone().unwrap_or_else(|| field_name.to_string());
                (tag.destination(), name)
            })
    }
}

/// Parse struct-level options.
pub(crate) fn parse_struct_options(attrs: &[Attribute]) -> syn::Result<StructOptions> {
    let mut options = StructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("rpc") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let side = if meta.path.is_ident("encode_only") {
                Side::EncodeOnly
            } else if meta.path.is_ident("decode_only") {
                Side::DecodeOnly
            } else {
                return Err(meta.error("expected `encode_only` or `decode_only`"));
            };
            if options.side != Side::Both && options.side != side {
                return Err(meta.error("`encode_only` and `decode_only` are exclusive"));
            }
            options.side = side;
            Ok(())
        })?;
    }

    Ok(options)
}

/// Parse field options.
pub(crate) fn parse_field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("rpc") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                return Ok(());
            }

            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();
            let Some(tag) = Tag::from_key(&key) else {
                return Err(meta.error(
                    "expected one of `path`, `query`, `form`, `header`, `body` or `skip`",
                ));
            };

            let name = if meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(syn::Error::new_spanned(&value, "wire name cannot be empty"));
                }
                Some(value.value())
            } else {
                None
            };
            options.tags.push((tag, name));
            Ok(())
        })?;
    }

    Ok(options)
}
