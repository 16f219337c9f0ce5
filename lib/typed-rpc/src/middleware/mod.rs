//! Tower middleware for [`HyperClient`](crate::HyperClient).
//!
//! Any `tower::Layer` over [`BoxedService`](crate::BoxedService) can be added
//! with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer):
//!
//! ```ignore
//! use std::time::Duration;
//! use typed_rpc::{HyperClient, middleware::{ConcurrencyLimitLayer, LoggingLayer}};
//!
//! let client = HyperClient::builder()
//!     .layer(ConcurrencyLimitLayer::new(16))
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::limit::ConcurrencyLimitLayer;
