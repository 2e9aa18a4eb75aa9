//! Optional values where absence is not an error.
//!
//! [`Maybe`] is a thin wrapper over [`Option`] with the combinator vocabulary
//! of [`Outcome`], so repository-style lookups can be chained and finally
//! turned into an outcome with [`Maybe::to_outcome`].

use std::fmt;
use std::future::Future;

use crate::failure::Failure;
use crate::outcome::Outcome;

/// A value that may be absent.
///
/// Two `Maybe`s are equal iff both are none, or both hold equal values. A none
/// never equals a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Maybe<T>(Option<T>);

impl<T> Maybe<T> {
    /// Wraps a present value.
    pub fn some(value: T) -> Self {
        Self(Some(value))
    }

    /// The empty variant.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wraps an optional value; `None` yields the empty variant.
    pub fn from_option(value: Option<T>) -> Self {
        Self(value)
    }

    /// Returns `true` if a value is present.
    pub fn has_value(&self) -> bool {
        self.0.is_some()
    }

    /// Returns `true` if no value is present.
    pub fn has_no_value(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the value.
    ///
    /// # Panics
    ///
    /// Panics on the empty variant.
    pub fn value(&self) -> &T {
        match &self.0 {
            Some(value) => value,
            None => panic!("called `Maybe::value()` on a none value"),
        }
    }

    /// Consumes the wrapper, returning the inner option.
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    /// Borrows the inner value.
    pub fn as_ref(&self) -> Maybe<&T> {
        Maybe(self.0.as_ref())
    }

    /// Returns the value, or `default` when absent.
    pub fn unwrap_or(self, default: T) -> T {
        self.0.unwrap_or(default)
    }

    /// Returns the value, or the result of `factory` when absent.
    pub fn unwrap_or_else<F>(self, factory: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.0.unwrap_or_else(factory)
    }

    /// Transforms the value. `f` is never called on none.
    pub fn map<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        Maybe(self.0.map(f))
    }

    /// Chains a lookup that may itself come back empty.
    pub fn then<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self.0 {
            Some(value) => f(value),
            None => Maybe(None),
        }
    }

    /// Keeps the value only if it satisfies `predicate`.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        Maybe(self.0.filter(predicate))
    }

    /// Observes the wrapper whichever variant it is.
    pub fn tee<F>(self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(&self);
        self
    }

    /// Observes a present value.
    pub fn tee_on_value<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Some(value) = &self.0 {
            f(value);
        }
        self
    }

    /// Runs `f` when no value is present.
    pub fn tee_on_none<F>(self, f: F) -> Self
    where
        F: FnOnce(),
    {
        if self.0.is_none() {
            f();
        }
        self
    }

    /// Converts into an outcome, failing with `failure_if_absent` on none.
    pub fn to_outcome(self, failure_if_absent: Failure) -> Outcome<T> {
        match self.0 {
            Some(value) => Outcome::Success(value),
            None => Outcome::fail(failure_if_absent),
        }
    }

    /// Like [`to_outcome`](Self::to_outcome), building the failure lazily.
    pub fn to_outcome_with<F>(self, factory: F) -> Outcome<T>
    where
        F: FnOnce() -> Failure,
    {
        match self.0 {
            Some(value) => Outcome::Success(value),
            None => Outcome::fail(factory()),
        }
    }

    /// Async [`map`](Self::map).
    pub async fn map_async<U, F, Fut>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self.0 {
            Some(value) => Maybe(Some(f(value).await)),
            None => Maybe(None),
        }
    }

    /// Async [`then`](Self::then).
    pub async fn then_async<U, F, Fut>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Maybe<U>>,
    {
        match self.0 {
            Some(value) => f(value).await,
            None => Maybe(None),
        }
    }

    /// Async [`tee_on_value`](Self::tee_on_value).
    pub async fn tee_on_value_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Some(value) = &self.0 {
            f(value).await;
        }
        self
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.0
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_from_none_equals_none() {
        assert_eq!(Maybe::<i32>::from_option(None), Maybe::none());
        assert!(Maybe::<i32>::none().has_no_value());
    }

    #[test]
    fn test_from_value() {
        let five = Maybe::from_option(Some(5));
        assert!(five.has_value());
        assert_eq!(*five.value(), 5);
        assert_ne!(five, Maybe::none());
        assert_ne!(five, Maybe::some(6));
        assert_eq!(five, Maybe::some(5));
    }

    #[test]
    #[should_panic(expected = "none value")]
    fn test_value_on_none_panics() {
        let _ = Maybe::<i32>::none().value();
    }

    #[test]
    fn test_display() {
        assert_eq!(Maybe::some(5).to_string(), "5");
        assert_eq!(Maybe::<i32>::none().to_string(), "None");
    }

    #[test]
    fn test_map_is_lazy_on_none() {
        let calls = Cell::new(0);
        let mapped = Maybe::<i32>::none().map(|v| {
            calls.set(calls.get() + 1);
            v
        });
        assert_eq!(mapped, Maybe::none());
        assert_eq!(calls.get(), 0);
        assert_eq!(Maybe::some(2).map(|v| v * 3), Maybe::some(6));
    }

    #[test]
    fn test_then_and_filter() {
        let half = |v: i32| {
            if v % 2 == 0 {
                Maybe::some(v / 2)
            } else {
                Maybe::none()
            }
        };
        assert_eq!(Maybe::some(8).then(half).then(half), Maybe::some(2));
        assert_eq!(Maybe::some(6).then(half).then(half), Maybe::none());
        assert_eq!(Maybe::some(3).filter(|v| *v > 5), Maybe::none());
        assert_eq!(Maybe::some(9).filter(|v| *v > 5), Maybe::some(9));
    }

    #[test]
    fn test_unwrap_fallbacks() {
        assert_eq!(Maybe::some(1).unwrap_or(0), 1);
        assert_eq!(Maybe::none().unwrap_or(0), 0);
        assert_eq!(Maybe::none().unwrap_or_else(|| 42), 42);
    }

    #[test]
    fn test_taps_do_not_alter_value() {
        let seen = Cell::new(0);
        let maybe = Maybe::some(4)
            .tee_on_value(|v| seen.set(*v))
            .tee_on_none(|| seen.set(100))
            .tee(|m| assert!(m.has_value()));
        assert_eq!(maybe, Maybe::some(4));
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn test_to_outcome() {
        let missing = Failure::with_handle("not found", "id");
        assert_eq!(Maybe::some(1).to_outcome(missing.clone()), Outcome::ok(1));
        assert_eq!(
            Maybe::<i32>::none().to_outcome(missing.clone()),
            Outcome::fail(missing)
        );
        assert!(
            Maybe::<i32>::none()
                .to_outcome_with(|| Failure::new("gone"))
                .is_failed()
        );
    }

    #[tokio::test]
    async fn test_async_combinators() {
        let maybe = Maybe::some(2)
            .map_async(|v| async move { v + 1 })
            .await
            .then_async(|v| async move { Maybe::some(v * 2) })
            .await;
        assert_eq!(maybe, Maybe::some(6));

        let none = Maybe::<i32>::none()
            .then_async(|v| async move { Maybe::some(v) })
            .await;
        assert_eq!(none, Maybe::none());
    }
}
