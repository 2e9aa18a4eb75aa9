//! Request validators.
//!
//! A [`Validator`] is an ordered list of [`Rule`]s. Every rule is evaluated,
//! and each violated rule contributes one failure, in registration order.
//! Unlike [`Outcome::then`], validation aggregates: it never stops at the
//! first violation.
//!
//! Pipelines consume validators through the [`RequestValidator`] and
//! [`AsyncRequestValidator`] traits, so hand-written validators (or plain
//! closures, via [`validator_fn`]) can sit next to rule-based ones.

use std::fmt;

use async_trait::async_trait;
use tracing::trace;
use verdict_core::{Failure, Outcome};

use crate::rule::Rule;

// ============================================================================
// Traits
// ============================================================================

/// Validates a request synchronously.
pub trait RequestValidator<Req>: Send + Sync {
    /// Returns success, or every failure found in `request`.
    fn validate(&self, request: &Req) -> Outcome;
}

/// Validates a request, possibly performing asynchronous I/O.
#[async_trait]
pub trait AsyncRequestValidator<Req: Sync>: Send + Sync {
    /// Returns success, or every failure found in `request`.
    async fn validate(&self, request: &Req) -> Outcome;
}

// ============================================================================
// Validator
// ============================================================================

/// A rule-based validator.
///
/// # Example
///
/// ```
/// use verdict_core::Failure;
/// use verdict_framework::{RequestValidator, Rule, Validator};
///
/// struct Signup {
///     email: String,
///     password: String,
/// }
///
/// let validator = Validator::new()
///     .rule(
///         Rule::with_failure(Failure::with_handle("email is required", "email"))
///             .invalid_when(|s: &Signup| s.email.is_empty()),
///     )
///     .rule(
///         Rule::with_failure(Failure::with_handle("password is too short", "password"))
///             .invalid_when(|s: &Signup| s.password.len() < 8),
///     );
///
/// let outcome = validator.validate(&Signup {
///     email: String::new(),
///     password: "short".into(),
/// });
/// assert_eq!(outcome.failures().len(), 2);
/// ```
pub struct Validator<Req> {
    rules: Vec<Rule<Req>>,
}

impl<Req> Default for Validator<Req> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req> Clone for Validator<Req> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<Req> Validator<Req> {
    /// Creates a validator with no rules; it accepts every request.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule (builder pattern).
    pub fn rule(mut self, rule: Rule<Req>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a rule.
    pub fn add_rule(&mut self, rule: Rule<Req>) {
        self.rules.push(rule);
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates every rule against `request`.
    pub fn validate(&self, request: &Req) -> Outcome {
        let failures: Vec<Failure> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let failure = rule.check(request)?;
                trace!(
                    rule = rule.name().unwrap_or("unnamed"),
                    message = failure.message(),
                    "Rule violated"
                );
                Some(failure)
            })
            .collect();

        if failures.is_empty() {
            Outcome::success()
        } else {
            Outcome::fail_many(failures)
        }
    }
}

impl<Req> RequestValidator<Req> for Validator<Req> {
    fn validate(&self, request: &Req) -> Outcome {
        Validator::validate(self, request)
    }
}

impl<Req> fmt::Debug for Validator<Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .finish()
    }
}

// ============================================================================
// Closure validators
// ============================================================================

/// A validator backed by a closure. Created by [`validator_fn`].
#[derive(Clone)]
pub struct ValidatorFn<F> {
    f: F,
}

/// Wraps a closure as a [`RequestValidator`].
pub fn validator_fn<Req, F>(f: F) -> ValidatorFn<F>
where
    F: Fn(&Req) -> Outcome + Send + Sync,
{
    ValidatorFn { f }
}

impl<Req, F> RequestValidator<Req> for ValidatorFn<F>
where
    F: Fn(&Req) -> Outcome + Send + Sync,
{
    fn validate(&self, request: &Req) -> Outcome {
        (self.f)(request)
    }
}

/// Runs a synchronous validator where an asynchronous one is expected.
pub(crate) struct SyncValidator<V>(pub(crate) V);

#[async_trait]
impl<Req, V> AsyncRequestValidator<Req> for SyncValidator<V>
where
    Req: Sync,
    V: RequestValidator<Req>,
{
    async fn validate(&self, request: &Req) -> Outcome {
        self.0.validate(request)
    }
}
