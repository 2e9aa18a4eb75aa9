//! Pipelines that wrap an event handler.
//!
//! # Architecture
//!
//! ```text
//! request ──► validators (all, in order) ──► combined Outcome
//!                                                │
//!                          failed ◄──────────────┴──────────► passed
//!                            │                                  │
//!                            │                             handler.handle
//!                            ▼                                  ▼
//!                         Outcome ──► post-processors (each exactly once) ──► caller
//! ```
//!
//! [`Decorator`] runs synchronously; [`AsyncDecorator`] awaits each stage in
//! the same order and additionally supports cooperative cancellation.
//! Both are cheap to clone and can be shared across threads.

mod asynchronous;
mod stage;
mod sync;

pub use asynchronous::{AsyncDecorator, BoxedAsyncPostProcessor, BoxedAsyncValidator};
pub use stage::PipelineStage;
pub use sync::{BoxedPostProcessor, BoxedValidator, Decorator};
