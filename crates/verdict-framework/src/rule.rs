//! Predicate-based validation rules.
//!
//! A [`Rule`] is violated for a request iff at least one of its `invalid_when`
//! predicates holds **and** none of its `except_when` predicates holds. A
//! violated rule produces exactly one [`Failure`] through its failure factory.
//!
//! ```
//! use verdict_core::Failure;
//! use verdict_framework::Rule;
//!
//! struct Signup {
//!     email: String,
//!     invited: bool,
//! }
//!
//! let rule = Rule::new(|_: &Signup| Failure::with_handle("email is required", "email"))
//!     .invalid_when(|s: &Signup| s.email.is_empty())
//!     .except_when(|s: &Signup| s.invited);
//!
//! assert!(rule.is_violated(&Signup { email: String::new(), invited: false }));
//! assert!(!rule.is_violated(&Signup { email: String::new(), invited: true }));
//! ```

use std::fmt;
use std::sync::Arc;

use verdict_core::Failure;

/// A type-erased request predicate.
pub type Predicate<Req> = Arc<dyn Fn(&Req) -> bool + Send + Sync>;

/// A type-erased failure factory.
pub type FailureFactory<Req> = Arc<dyn Fn(&Req) -> Failure + Send + Sync>;

/// A single validation rule.
///
/// Cloning is cheap: predicates and the failure factory are shared.
pub struct Rule<Req> {
    name: Option<String>,
    failure_factory: FailureFactory<Req>,
    invalid_when: Vec<Predicate<Req>>,
    except_when: Vec<Predicate<Req>>,
}

impl<Req> Clone for Rule<Req> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            failure_factory: Arc::clone(&self.failure_factory),
            invalid_when: self.invalid_when.clone(),
            except_when: self.except_when.clone(),
        }
    }
}

impl<Req> Rule<Req> {
    /// Creates a rule whose failure is built from the offending request.
    ///
    /// A rule without any `invalid_when` predicate is never violated.
    pub fn new<F>(failure_factory: F) -> Self
    where
        F: Fn(&Req) -> Failure + Send + Sync + 'static,
    {
        Self {
            name: None,
            failure_factory: Arc::new(failure_factory),
            invalid_when: Vec::new(),
            except_when: Vec::new(),
        }
    }

    /// Creates a rule that always reports the same failure.
    pub fn with_failure(failure: Failure) -> Self {
        Self::new(move |_| failure.clone())
    }

    /// Names the rule for diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a predicate that marks the request as invalid.
    pub fn invalid_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Req) -> bool + Send + Sync + 'static,
    {
        self.invalid_when.push(Arc::new(predicate));
        self
    }

    /// Adds a predicate that exempts the request from this rule.
    pub fn except_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Req) -> bool + Send + Sync + 'static,
    {
        self.except_when.push(Arc::new(predicate));
        self
    }

    /// The rule's name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if the rule is violated by `request`.
    pub fn is_violated(&self, request: &Req) -> bool {
        self.invalid_when.iter().any(|p| p(request)) && !self.except_when.iter().any(|p| p(request))
    }

    /// Evaluates the rule, returning its failure when violated.
    pub fn check(&self, request: &Req) -> Option<Failure> {
        self.is_violated(request)
            .then(|| (self.failure_factory)(request))
    }
}

impl<Req> fmt::Debug for Rule<Req> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("invalid_when", &self.invalid_when.len())
            .field("except_when", &self.except_when.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Age(i32);

    fn minor_rule() -> Rule<Age> {
        Rule::new(|age: &Age| Failure::with_handle(format!("{} is too young", age.0), "age"))
            .invalid_when(|age| age.0 < 18)
    }

    #[test]
    fn test_rule_without_predicates_never_violated() {
        let rule = Rule::<Age>::with_failure(Failure::new("never"));
        assert!(!rule.is_violated(&Age(0)));
        assert!(rule.check(&Age(0)).is_none());
    }

    #[test]
    fn test_rule_violation_builds_failure_from_request() {
        let rule = minor_rule();
        assert_eq!(
            rule.check(&Age(12)),
            Some(Failure::with_handle("12 is too young", "age"))
        );
        assert!(rule.check(&Age(30)).is_none());
    }

    #[test]
    fn test_any_invalid_predicate_triggers() {
        let rule = minor_rule().invalid_when(|age| age.0 > 120);
        assert!(rule.is_violated(&Age(150)));
        assert!(rule.is_violated(&Age(3)));
        assert!(!rule.is_violated(&Age(40)));
    }

    #[test]
    fn test_any_exception_suppresses() {
        let rule = minor_rule()
            .except_when(|age| age.0 == 16)
            .except_when(|age| age.0 == 17);
        assert!(!rule.is_violated(&Age(16)));
        assert!(!rule.is_violated(&Age(17)));
        assert!(rule.is_violated(&Age(15)));
    }

    #[test]
    fn test_named_rule_debug() {
        let rule = minor_rule().named("adult");
        assert_eq!(rule.name(), Some("adult"));
        let rendered = format!("{rule:?}");
        assert!(rendered.contains("adult"));
        assert!(rendered.contains("invalid_when: 1"));
    }
}
