//! Procedural macros for typed-rpc.
//!
//! This crate provides `#[derive(Binding)]`, which reads the `#[rpc(...)]`
//! field attributes once at compile time and generates the field table and the
//! binding code of a request-shaped struct.

mod attrs;
mod expand;

use proc_macro::TokenStream;

/// Derive the request binding of a struct with named fields.
///
/// Generates `Tagged`, `EncodeRequest`, `BindRequest` and `DecodeRequest`.
///
/// # Field attributes
///
/// - `#[rpc(path)]` / `#[rpc(path = "name")]` - URL path placeholder
/// - `#[rpc(query)]` / `#[rpc(query = "name")]` - query parameter
/// - `#[rpc(form)]` / `#[rpc(form = "name")]` - alias of `query`
/// - `#[rpc(header = "name")]` - request header
/// - `#[rpc(body)]` / `#[rpc(body = "name")]` - member of the JSON body object
/// - `#[rpc(skip)]` - not part of the request
///
/// A field listing several destinations goes to the first one in the order
/// path, query, form, header, body. `None` values are never sent.
///
/// Without any tagged field every field is a member of the JSON body, named
/// after the field. Skipped fields and `None` values are never sent, and
/// skipped fields are never read. Wrap a value in `Json` to send its own
/// serde representation instead.
///
/// # Struct attributes
///
/// - `#[rpc(encode_only)]` - only generate the client side
/// - `#[rpc(decode_only)]` - only generate the server side
///
/// The server side needs `Default`: decoding starts from the default value
/// and overwrites what the request provides.
///
/// # Example
///
/// ```ignore
/// use typed_rpc::Binding;
///
/// #[derive(Debug, Default, Binding)]
/// pub struct UpdateItem {
///     #[rpc(path)]
///     id: u64,
///     #[rpc(header = "Authorization")]
///     token: String,
///     #[rpc(body)]
///     title: String,
///     #[rpc(query = "notify")]
///     notify: Option<bool>,
/// }
/// ```
#[proc_macro_derive(Binding, attributes(rpc))]
pub fn derive_binding(input: TokenStream) -> TokenStream {
    expand::expand_binding(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
