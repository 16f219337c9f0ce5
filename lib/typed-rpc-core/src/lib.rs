//! Core types and traits for typed-rpc.
//!
//! This crate holds the request marshaling engine shared by the client and
//! server sides:
//! - [`Tagged`], [`FieldDescriptor`], [`Binding`] - static per-type field tables
//! - [`ToParam`] / [`FromParam`] - scalar formatting for path, query and header values
//! - [`EncodeRequest`] and [`RequestEnvelope`] - outbound binding
//! - [`DecodeRequest`], [`BindRequest`] and [`InboundRequest`] - inbound binding
//! - [`PathTemplate`] - `{name}` / `:name` URL templates
//! - [`Handler`] - the `I -> O` business function shape
//! - [`Request`], [`Response`], [`HttpClient`], [`RpcClient`] - transport
//! - [`Error`] and [`Result`] - error handling

mod binding;
mod client;
mod codec;
mod decode;
mod encode;
mod envelope;
mod error;
mod handler;
mod inbound;
mod param;
mod path_template;
pub mod prelude;
mod request;
mod response;

pub use binding::{Binding, BodyMode, FieldDescriptor, ParamLocation, Tagged};
pub use client::{HttpClient, RpcClient};
pub use codec::{ContentType, decode_body, from_form, from_json, to_form, to_json};
pub use decode::{BindPass, BindRequest, DecodeRequest, decode_bound};
pub use encode::{EncodeRequest, Json};
pub use envelope::{Body, RequestEnvelope};
pub use error::{BoxError, Error, Result};
pub use handler::Handler;
pub use inbound::InboundRequest;
pub use param::{FromParam, ParamError, ToParam};
pub use path_template::PathTemplate;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for methods, status codes and headers
pub use http::{Method, StatusCode, header};
