//! Prelude module for convenient imports.
//!
//! ```ignore
//! use typed_rpc::prelude::*;
//! ```

pub use crate::{
    Action, ApiClient, Binding, Consumer, Endpoint, Error, Getter, Handler, HyperClient, Json,
    Method, Result, RpcClient,
};
pub use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
pub use crate::server::{RouterExt, wrap_action, wrap_consumer, wrap_getter, wrap_handler};
