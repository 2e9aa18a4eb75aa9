//! # Verdict Framework
//!
//! Request pipelines built on the [`verdict_core`] result algebra.
//!
//! This layer provides:
//! - [`Rule`] and [`Validator`] for declarative, aggregating request validation
//! - [`EventHandler`] / [`AsyncEventHandler`] for the domain logic itself
//! - [`PostProcessor`] / [`AsyncPostProcessor`] for side effects after a
//!   pipeline completes, such as [`LoggingPostProcessor`]
//! - [`Decorator`] / [`AsyncDecorator`], which wrap a handler with validators
//!   and post-processors
//! - [`HandlerService`], a tower adapter so pipelines compose with tower
//!   middleware
//!
//! ## Example
//!
//! ```
//! use verdict_framework::prelude::*;
//!
//! struct Signup {
//!     email: String,
//!     password: String,
//! }
//!
//! let validator = Validator::new()
//!     .rule(
//!         Rule::with_failure(Failure::with_handle("email is required", "email"))
//!             .invalid_when(|s: &Signup| s.email.is_empty()),
//!     )
//!     .rule(
//!         Rule::with_failure(Failure::with_handle("password is too short", "password"))
//!             .invalid_when(|s: &Signup| s.password.len() < 8),
//!     );
//!
//! let pipeline = Decorator::new(handler_fn(|s: &Signup| Outcome::ok(s.email.clone())))
//!     .named("signup")
//!     .add_request_validator(validator)
//!     .add_post_processor(LoggingPostProcessor::new("signup"));
//!
//! let outcome = pipeline.handle(&Signup {
//!     email: String::new(),
//!     password: "hunter2".into(),
//! });
//! let handles: Vec<_> = outcome.failures().iter().map(|f| f.ui_handle()).collect();
//! assert_eq!(handles, [Some("email"), Some("password")]);
//! ```

pub mod decorator;
pub mod error;
pub mod handler;
pub mod logging;
pub mod post_processor;
pub mod rule;
pub mod service;
pub mod validator;

pub use decorator::{
    AsyncDecorator, BoxedAsyncPostProcessor, BoxedAsyncValidator, BoxedPostProcessor,
    BoxedValidator, Decorator, PipelineStage,
};
pub use error::{PipelineError, PipelineResult};
pub use handler::{
    AsyncEventHandler, AsyncHandlerFn, Blocking, EventHandler, HandlerFn, async_handler_fn,
    handler_fn,
};
pub use logging::LoggingPostProcessor;
pub use post_processor::{AsyncPostProcessor, PostProcessor};
pub use rule::{FailureFactory, Predicate, Rule};
pub use service::{HandlerService, ServiceBuilderExt};
pub use validator::{AsyncRequestValidator, RequestValidator, Validator, ValidatorFn, validator_fn};

pub use tokio_util::sync::CancellationToken;

/// Prelude for common imports.
pub mod prelude {
    pub use verdict_core::prelude::*;

    pub use super::{
        AsyncDecorator, AsyncEventHandler, AsyncPostProcessor, AsyncRequestValidator, Blocking,
        CancellationToken, Decorator, EventHandler, LoggingPostProcessor, PipelineError,
        PostProcessor, RequestValidator, Rule, ServiceBuilderExt, Validator, async_handler_fn,
        handler_fn, validator_fn,
    };
}
