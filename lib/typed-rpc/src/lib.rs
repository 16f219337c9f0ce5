//! Typed business functions as HTTP handlers and as HTTP clients.
//!
//! A request type declares, field by field, where each value travels:
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use typed_rpc::prelude::*;
//!
//! #[derive(Debug, Default, Binding, Serialize, Deserialize)]
//! pub struct UpdateItem {
//!     #[rpc(path)]
//!     id: u64,
//!     #[rpc(header = "Authorization")]
//!     token: String,
//!     #[rpc(body)]
//!     title: String,
//! }
//! ```
//!
//! The same type then drives both sides of the wire:
//!
//! - server: [`server::wrap_handler`] turns `async fn(UpdateItem) -> Result<Item>`
//!   into an axum handler that decodes the path, the body, the query and the
//!   headers, and writes the output as JSON;
//! - client: [`Endpoint`] turns `PUT /items/{id}` into a typed
//!   `UpdateItem → Item` call over any [`RpcClient`], such as an
//!   [`ApiClient`] around a [`HyperClient`].
//!
//! Both sides also come in the [`Getter`], [`Consumer`] and [`Action`] shapes
//! for functions without an input, an output, or either. Every shape
//! implements [`Handler`], so a remote client stands in for a local
//! implementation.

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod remote;
#[cfg(feature = "server")]
pub mod server;

pub use api_client::ApiClient;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, ServerConfig, ServerConfigBuilder};
pub use remote::{Action, Consumer, Endpoint, Getter, default_error_handler};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use typed_rpc_core::{
    BindPass, BindRequest, Binding, Body, BodyMode, BoxError, ContentType,
    DecodeRequest, EncodeRequest, Error, FieldDescriptor, FromParam, Handler, HttpClient,
    InboundRequest, Json, Method, ParamError, ParamLocation, PathTemplate, Request,
    RequestBuilder, RequestEnvelope, Response, Result, RpcClient, StatusCode, Tagged, ToParam,
    decode_body, decode_bound, from_form, from_json, header, to_form, to_json,
};

// Re-export crates for macro-generated code
pub use serde;
pub use serde_json;
pub use url;

// The derive shares its name with the `Binding` enum, in the macro namespace
pub use typed_rpc_macro::Binding;
