//! # Verdict Core
//!
//! The result algebra the Verdict pipeline is built on.
//!
//! This crate provides:
//! - [`Failure`] / [`Failures`]: user-facing failure messages, optionally tied
//!   to the input field they concern
//! - [`Outcome`]: success with a value, or a non-empty list of failures
//! - [`Maybe`]: an optional value for lookups where absence is not an error
//! - Combinators (`map`, `then`, taps) in synchronous and asynchronous forms,
//!   plus [`OutcomeFutureExt`] for chaining futures of outcomes
//!
//! ## Two error channels
//!
//! Expected conditions (bad input, domain rule violations, "not found") travel
//! inside an [`Outcome`]. Misuse of the types (an empty failure list, reading
//! the value of a failed outcome) is a bug in the caller and panics.
//!
//! ## Example
//!
//! ```
//! use verdict_core::{Failure, Maybe, Outcome};
//!
//! fn find_user(id: u32) -> Maybe<String> {
//!     Maybe::from_option((id == 1).then(|| "ada".to_string()))
//! }
//!
//! let greeting = find_user(1)
//!     .to_outcome(Failure::with_handle("no such user", "id"))
//!     .map(|name| format!("hello, {name}"));
//! assert_eq!(greeting, Outcome::ok("hello, ada".to_string()));
//!
//! let missing = find_user(2).to_outcome(Failure::with_handle("no such user", "id"));
//! assert_eq!(missing.failures()[0].ui_handle(), Some("id"));
//! ```

pub mod failure;
pub mod future;
pub mod maybe;
pub mod outcome;

pub use failure::{EmptyFailures, Failure, Failures};
pub use future::OutcomeFutureExt;
pub use maybe::Maybe;
pub use outcome::Outcome;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{Failure, Failures, Maybe, Outcome, OutcomeFutureExt};
}
