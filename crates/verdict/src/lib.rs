//! # Verdict
//!
//! Functional outcomes, rule-based request validation and handler pipelines.
//!
//! ## Overview
//!
//! Expected failures (bad input, broken business rules, missing records) are
//! values, not errors: they travel in an [`Outcome`](core::Outcome) that
//! either holds a value or a non-empty list of user-facing failures. Pipelines
//! wrap domain handlers with validation and side effects so that handlers only
//! ever see requests that passed every rule.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────────────────┐     ┌─────────┐     ┌─────────────────┐
//! │   Request   │────▶│ Validators (all, aggregated)│────▶│ Handler │────▶│ Post-processors │──▶ Outcome
//! └─────────────┘     └─────────────────────────────┘     └─────────┘     └─────────────────┘
//!                                   │ failed                                    ▲
//!                                   └───────────────────────────────────────────┘
//! ```
//!
//! - **Core** ([`core`]): `Outcome`, `Maybe`, `Failure`, sync and async combinators
//! - **Framework** ([`framework`]): rules, validators, handlers, post-processors,
//!   `Decorator` / `AsyncDecorator`, tower integration
//! - **Runtime** ([`runtime`]): layered configuration and logging setup
//!
//! ## Quick Start
//!
//! ```
//! use verdict::prelude::*;
//!
//! #[derive(Clone)]
//! struct Transfer {
//!     amount: u64,
//!     to: String,
//! }
//!
//! let pipeline = Decorator::new(handler_fn(|t: &Transfer| {
//!     Outcome::ok(format!("sent {} to {}", t.amount, t.to))
//! }))
//! .add_request_validator(
//!     Validator::new()
//!         .rule(
//!             Rule::with_failure(Failure::with_handle("amount must be positive", "amount"))
//!                 .invalid_when(|t: &Transfer| t.amount == 0),
//!         )
//!         .rule(
//!             Rule::with_failure(Failure::with_handle("recipient is required", "to"))
//!                 .invalid_when(|t: &Transfer| t.to.is_empty()),
//!         ),
//! );
//!
//! let ok = pipeline.handle(&Transfer { amount: 5, to: "ada".into() });
//! assert_eq!(ok.value(), "sent 5 to ada");
//!
//! let rejected = pipeline.handle(&Transfer { amount: 0, to: String::new() });
//! assert_eq!(rejected.failures().len(), 2);
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use verdict_core as core;
pub use verdict_framework as framework;
pub use verdict_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use verdict::prelude::*;
/// ```
pub mod prelude {
    pub use verdict_framework::prelude::*;

    pub use verdict_runtime::{ConfigLoader, LoggingBuilder, VerdictConfig};
}
