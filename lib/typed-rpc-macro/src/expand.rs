//! `#[derive(Binding)]` expansion.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, Type, parse2};

use crate::attrs::{Destination, StructOptions, parse_field_options, parse_struct_options};

/// A non-skipped field with its resolved destination.
struct BoundField {
    ident: Ident,
    ty: Type,
    optional: bool,
    destination: Option<(Destination, String)>,
}

impl BoundField {
    fn routed_to(&self, destination: Destination) -> Option<&str> {
        match &self.destination {
            Some((dest, name)) if *dest == destination => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Whole,
    Fields,
    None,
}

/// Expand the `#[derive(Binding)]` macro.
pub(crate) fn expand_binding(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Binding derive does not support generic structs",
        ));
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Binding derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Binding derive only supports structs",
            ));
        }
    };

    let options: StructOptions = parse_struct_options(&input.attrs)?;

    let mut fields = Vec::new();
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let field_options = parse_field_options(&field.attrs)?;
        if field_options.skip {
            continue;
        }
        let destination = field_options.resolve(&unraw(&ident));
        fields.push(BoundField {
            optional: is_option_type(&field.ty),
            ty: field.ty.clone(),
            ident,
            destination,
        });
    }

    let body_mode = if fields.iter().all(|f| f.destination.is_none()) {
        BodyMode::Whole
    } else if fields.iter().any(|f| f.routed_to(Destination::Body).is_some()) {
        BodyMode::Fields
    } else {
        BodyMode::None
    };

    let tagged = generate_tagged(name, &fields);
    let encode = options
        .side
        .encodes()
        .then(|| generate_encode(name, &fields, body_mode));
    let decode = options
        .side
        .decodes()
        .then(|| generate_decode(name, &fields, body_mode));

    Ok(quote! {
        #tagged
        #encode
        #decode
    })
}

fn generate_tagged(name: &Ident, fields: &[BoundField]) -> TokenStream {
    let descriptors = fields.iter().map(|field| {
        let field_name = unraw(&field.ident);
        let optional = field.optional;
        let binding = match &field.destination {
            Some((destination, wire)) => {
                let variant = match destination {
                    Destination::Path => quote!(Path),
                    Destination::Query => quote!(Query),
                    Destination::Header => quote!(Header),
                    Destination::Body => quote!(Body),
                };
                quote!(::core::option::Option::Some(::typed_rpc::Binding::#variant(#wire)))
            }
            None => quote!(::core::option::Option::None),
        };
        quote! {
            ::typed_rpc::FieldDescriptor::new(#field_name, #binding, #optional)
        }
    });

    quote! {
        impl ::typed_rpc::Tagged for #name {
            const FIELDS: &'static [::typed_rpc::FieldDescriptor] = &[
                #(#descriptors),*
            ];
        }
    }
}

fn generate_encode(name: &Ident, fields: &[BoundField], body_mode: BodyMode) -> TokenStream {
    let params = |destination: Destination, method: Ident| {
        let statements = fields.iter().filter_map(|field| {
            let wire = field.routed_to(destination)?;
            let ident = &field.ident;
            Some(quote! {
                envelope.#method(#wire, &self.#ident);
            })
        });
        quote!(#(#statements)*)
    };

    let path = params(Destination::Path, format_ident!("path_param"));
    let query = params(Destination::Query, format_ident!("query"));
    let header = params(Destination::Header, format_ident!("header"));

    let members = body_members(fields, body_mode).into_iter().map(|(field, wire)| {
        let ident = &field.ident;
        if field.optional {
            quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    envelope.body_field(#wire, value)?;
                }
            }
        } else {
            quote! {
                envelope.body_field(#wire, &self.#ident)?;
            }
        }
    });
    let body = quote!(#(#members)*);

    quote! {
        impl ::typed_rpc::EncodeRequest for #name {
            fn encode(
                &self,
                envelope: &mut ::typed_rpc::RequestEnvelope,
            ) -> ::typed_rpc::Result<()> {
                #path
                #query
                #header
                #body
                ::core::result::Result::Ok(())
            }
        }
    }
}

fn generate_decode(name: &Ident, fields: &[BoundField], body_mode: BodyMode) -> TokenStream {
    let params = |destination: Destination, location: TokenStream| {
        let statements = fields.iter().filter_map(|field| {
            let wire = field.routed_to(destination)?;
            let ident = &field.ident;
            let ty = &field.ty;
            Some(quote! {
                if let ::core::option::Option::Some(value) =
                    request.param::<#ty>(::typed_rpc::ParamLocation::#location, #wire)?
                {
                    self.#ident = value;
                }
            })
        });
        quote!(#(#statements)*)
    };

    let path = params(Destination::Path, quote!(Path));
    let query = params(Destination::Query, quote!(Query));
    let header = params(Destination::Header, quote!(Header));

    let body_fields: Vec<_> = body_members(fields, body_mode)
        .into_iter()
        .map(|(field, wire)| (field, format_ident!("__{}", unraw(&field.ident)), wire))
        .collect();

    let body = if body_fields.is_empty() {
        quote!()
    } else {
        let members = body_fields.iter().map(|(field, slot, wire)| {
            let ty = &field.ty;
            quote! {
                #[serde(rename = #wire, default)]
                #slot: ::core::option::Option<#ty>,
            }
        });
        let assignments = body_fields.iter().map(|(field, slot, _)| {
            let ident = &field.ident;
            quote! {
                if let ::core::option::Option::Some(value) = body.#slot {
                    self.#ident = value;
                }
            }
        });

        quote! {
            #[derive(::typed_rpc::serde::Deserialize)]
            #[serde(crate = "::typed_rpc::serde")]
            #[allow(non_snake_case)]
            struct __RpcBody {
                #(#members)*
            }

            let body: __RpcBody = request.parse_body()?;
            #(#assignments)*
        }
    };

    quote! {
        impl ::typed_rpc::BindRequest for #name {
            #[allow(unused_variables)]
            fn bind(
                &mut self,
                pass: ::typed_rpc::BindPass,
                request: &::typed_rpc::InboundRequest,
            ) -> ::typed_rpc::Result<()> {
                match pass {
                    ::typed_rpc::BindPass::Path => { #path }
                    ::typed_rpc::BindPass::Body => { #body }
                    ::typed_rpc::BindPass::Query => { #query }
                    ::typed_rpc::BindPass::Header => { #header }
                }
                ::core::result::Result::Ok(())
            }
        }

        impl ::typed_rpc::DecodeRequest for #name {
            fn decode(request: &::typed_rpc::InboundRequest) -> ::typed_rpc::Result<Self> {
                ::typed_rpc::decode_bound(request)
            }
        }
    }
}

/// Fields written to and read from the JSON body, with their member names.
///
/// Without any tagged field every non-skipped field is a member named after
/// the field; otherwise only the `body`-tagged fields are.
fn body_members(fields: &[BoundField], body_mode: BodyMode) -> Vec<(&BoundField, String)> {
    match body_mode {
        BodyMode::Whole => fields
            .iter()
            .map(|field| (field, unraw(&field.ident)))
            .collect(),
        BodyMode::Fields => fields
            .iter()
            .filter_map(|field| {
                field
                    .routed_to(Destination::Body)
                    .map(|wire| (field, wire.to_string()))
            })
            .collect(),
        BodyMode::None => Vec::new(),
    }
}

/// Field name without the `r#` prefix of raw identifiers.
fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
}

/// Check if a type is `Option<T>`.
fn is_option_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path)
        if type_path.path.segments.last()
            .is_some_and(|seg| seg.ident == "Option"))
}
