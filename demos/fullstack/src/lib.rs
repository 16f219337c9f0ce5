//! Full-stack demo
//!
//! One [`Service`] trait with two implementations: [`ServiceImpl`] runs the
//! business logic over a [`MemoryStore`], [`ServiceClient`] calls the same
//! operations on a remote [`router`].

// Example-specific lint allowances
#![allow(missing_docs)]

mod client;
pub mod model;
mod router;
mod service;
mod service_impl;
mod store;

pub use self::client::ServiceClient;
pub use self::router::{error_response, router};
pub use self::service::{Service, ServiceError};
pub use self::service_impl::ServiceImpl;
pub use self::store::MemoryStore;
