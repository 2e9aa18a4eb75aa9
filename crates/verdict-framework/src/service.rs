//! tower integration.
//!
//! [`HandlerService`] turns any [`AsyncEventHandler`], including a whole
//! [`AsyncDecorator`](crate::AsyncDecorator) pipeline, into a
//! [`tower::Service`]. Domain failures stay inside the [`Outcome`]; the service
//! itself never errors, so tower middleware (timeouts, concurrency limits,
//! response mapping) can be stacked on top without touching the pipeline.
//!
//! # Example
//!
//! ```
//! use tower::{ServiceBuilder, ServiceExt};
//! use verdict_core::Outcome;
//! use verdict_framework::{AsyncDecorator, ServiceBuilderExt, async_handler_fn};
//!
//! # tokio_test::block_on(async {
//! let pipeline = AsyncDecorator::new(async_handler_fn(|n: u32| async move { Outcome::ok(n * 2) }));
//!
//! let service = ServiceBuilder::new()
//!     .map_response(|outcome: Outcome<u32>| outcome.into_option())
//!     .handler(pipeline);
//!
//! assert_eq!(service.oneshot(21).await, Ok(Some(42)));
//! # });
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::layer::Layer;
use tower::{Service, ServiceBuilder};
use verdict_core::Outcome;

use crate::handler::AsyncEventHandler;

// ============================================================================
// HandlerService
// ============================================================================

/// A tower [`Service`] that runs an [`AsyncEventHandler`].
///
/// Cloning is cheap; all clones share the same handler.
#[derive(Debug)]
pub struct HandlerService<H> {
    handler: Arc<H>,
}

impl<H> HandlerService<H> {
    /// Wraps `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Wraps an already shared handler.
    pub fn from_arc(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Returns the wrapped handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

impl<H> Clone for HandlerService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H> From<H> for HandlerService<H> {
    fn from(handler: H) -> Self {
        HandlerService::new(handler)
    }
}

impl<Req, H> Service<Req> for HandlerService<H>
where
    Req: Send + Sync + 'static,
    H: AsyncEventHandler<Req> + 'static,
{
    type Response = Outcome<H::Response>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Req) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        async move { Ok(handler.handle(&request).await) }.boxed()
    }
}

// ============================================================================
// ServiceBuilderExt
// ============================================================================

/// Extension trait for [`tower::ServiceBuilder`] that finishes a stack with
/// an event handler.
pub trait ServiceBuilderExt<L> {
    /// Wraps `handler` in a [`HandlerService`] and applies all stacked layers.
    ///
    /// Equivalent to `.service(HandlerService::new(handler))`.
    fn handler<H>(self, handler: H) -> L::Service
    where
        L: Layer<HandlerService<H>>;
}

impl<L> ServiceBuilderExt<L> for ServiceBuilder<L> {
    fn handler<H>(self, handler: H) -> L::Service
    where
        L: Layer<HandlerService<H>>,
    {
        self.service(HandlerService::new(handler))
    }
}
