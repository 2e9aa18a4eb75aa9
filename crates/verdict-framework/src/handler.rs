//! Event handlers: the unit of domain logic a pipeline wraps.
//!
//! An event handler turns a request into an [`Outcome`]. Handlers report
//! domain failures through the outcome; they never need to know about the
//! validators or post-processors a [`Decorator`](crate::Decorator) adds
//! around them.
//!
//! # Example
//!
//! ```
//! use verdict_core::Outcome;
//! use verdict_framework::{EventHandler, handler_fn};
//!
//! struct Greet {
//!     name: String,
//! }
//!
//! let handler = handler_fn(|req: &Greet| Outcome::ok(format!("hello, {}", req.name)));
//! let outcome = handler.handle(&Greet { name: "ada".into() });
//! assert_eq!(outcome.value(), "hello, ada");
//! ```

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use verdict_core::Outcome;

// ============================================================================
// Handler traits
// ============================================================================

/// Synchronous domain logic for a request type.
pub trait EventHandler<Req>: Send + Sync {
    /// The value produced on success.
    type Response;

    /// Handles a request.
    fn handle(&self, request: &Req) -> Outcome<Self::Response>;
}

/// Asynchronous domain logic for a request type.
///
/// Cancellation of the returned future (dropping it, or cancelling through
/// [`AsyncDecorator::handle_cancellable`](crate::AsyncDecorator::handle_cancellable))
/// is a fault outside the outcome channel, never a domain failure.
#[async_trait]
pub trait AsyncEventHandler<Req: Sync>: Send + Sync {
    /// The value produced on success.
    type Response: Send;

    /// Handles a request.
    async fn handle(&self, request: &Req) -> Outcome<Self::Response>;
}

// ============================================================================
// Closure handlers
// ============================================================================

/// A synchronous handler backed by a closure. Created by [`handler_fn`].
pub struct HandlerFn<F, Res> {
    f: F,
    _marker: PhantomData<fn() -> Res>,
}

impl<F: Clone, Res> Clone for HandlerFn<F, Res> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

/// Wraps a closure as an [`EventHandler`].
pub fn handler_fn<Req, Res, F>(f: F) -> HandlerFn<F, Res>
where
    F: Fn(&Req) -> Outcome<Res> + Send + Sync,
{
    HandlerFn {
        f,
        _marker: PhantomData,
    }
}

impl<Req, Res, F> EventHandler<Req> for HandlerFn<F, Res>
where
    F: Fn(&Req) -> Outcome<Res> + Send + Sync,
{
    type Response = Res;

    fn handle(&self, request: &Req) -> Outcome<Res> {
        (self.f)(request)
    }
}

/// An asynchronous handler backed by a closure. Created by [`async_handler_fn`].
///
/// The closure receives an owned clone of the request, so the future it
/// returns does not borrow from the caller.
pub struct AsyncHandlerFn<F, Res> {
    f: F,
    _marker: PhantomData<fn() -> Res>,
}

impl<F: Clone, Res> Clone for AsyncHandlerFn<F, Res> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

/// Wraps an async closure as an [`AsyncEventHandler`].
pub fn async_handler_fn<Req, Res, F, Fut>(f: F) -> AsyncHandlerFn<F, Res>
where
    Req: Clone,
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<Res>> + Send,
{
    AsyncHandlerFn {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<Req, Res, F, Fut> AsyncEventHandler<Req> for AsyncHandlerFn<F, Res>
where
    Req: Clone + Sync,
    Res: Send,
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<Res>> + Send,
{
    type Response = Res;

    async fn handle(&self, request: &Req) -> Outcome<Res> {
        (self.f)(request.clone()).await
    }
}

/// Runs a synchronous handler where an asynchronous one is expected.
#[derive(Debug, Clone)]
pub struct Blocking<H>(pub H);

#[async_trait]
impl<Req, H> AsyncEventHandler<Req> for Blocking<H>
where
    Req: Sync,
    H: EventHandler<Req>,
    H::Response: Send,
{
    type Response = H::Response;

    async fn handle(&self, request: &Req) -> Outcome<H::Response> {
        self.0.handle(request)
    }
}
