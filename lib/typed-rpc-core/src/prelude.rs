//! Prelude module for convenient imports.
//!
//! ```ignore
//! use typed_rpc_core::prelude::*;
//! ```

pub use crate::{
    BindRequest, DecodeRequest, EncodeRequest, Error, FromParam, Handler, HttpClient,
    InboundRequest, Json, Method, PathTemplate, RequestEnvelope, Result, RpcClient, Tagged,
    ToParam,
};
