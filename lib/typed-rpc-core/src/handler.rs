//! The business function shape shared by servers and clients.

use std::future::Future;

use crate::Result;

/// An asynchronous `I -> O` operation that may fail.
///
/// Implemented by async closures and by the remote call shapes of the
/// `typed-rpc` client, so a local implementation and a remote one are
/// interchangeable wherever a `Handler` is expected.
///
/// # Example
///
/// ```
/// use typed_rpc_core::{Handler, Result};
///
/// async fn run(handler: impl Handler<u32, u32>) -> Result<u32> {
///     handler.call(20).await
/// }
///
/// let double = |n: u32| async move { Ok::<_, typed_rpc_core::Error>(n * 2) };
/// # let _ = run(double);
/// ```
pub trait Handler<I, O>: Send + Sync {
    /// Run the operation.
    fn call(&self, input: I) -> impl Future<Output = Result<O>> + Send;
}

impl<F, Fut, I, O> Handler<I, O> for F
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O>> + Send,
{
    fn call(&self, input: I) -> impl Future<Output = Result<O>> + Send {
        self(input)
    }
}
