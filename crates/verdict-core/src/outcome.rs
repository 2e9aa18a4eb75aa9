//! The [`Outcome`] type: success with a value, or one-or-more failures.
//!
//! `Outcome<()>` is the untyped form used by validators; `Outcome<T>` carries a
//! value on success. Both share the same failure semantics and convert into
//! each other with [`Outcome::into_untyped`] and [`Outcome::with_value`].
//!
//! # Combinators
//!
//! | combinator         | on success                  | on failure                     |
//! |--------------------|-----------------------------|--------------------------------|
//! | [`map`]            | `Success(f(v))`             | failures kept, `f` not called  |
//! | [`then`]           | `f(v)` returned as-is       | failures kept, `f` not called  |
//! | [`tee_on_success`] | `f(&v)`, outcome unchanged  | unchanged                      |
//! | [`tee_on_failure`] | unchanged                   | `f(&failures)`, unchanged      |
//! | [`tee`]            | `f(&outcome)`, unchanged    | `f(&outcome)`, unchanged       |
//!
//! Every combinator has an `_async` twin that awaits the closure's future and
//! otherwise behaves identically.
//!
//! [`map`]: Outcome::map
//! [`then`]: Outcome::then
//! [`tee_on_success`]: Outcome::tee_on_success
//! [`tee_on_failure`]: Outcome::tee_on_failure
//! [`tee`]: Outcome::tee
//!
//! # Example
//!
//! ```
//! use verdict_core::{Failure, Outcome};
//!
//! fn parse_age(input: &str) -> Outcome<u32> {
//!     input
//!         .parse::<u32>()
//!         .map_err(|_| Failure::with_handle("age must be a number", "age"))
//!         .into()
//! }
//!
//! let adult = parse_age("42").then(|age| {
//!     if age >= 18 {
//!         Outcome::ok(age)
//!     } else {
//!         Outcome::fail(Failure::with_handle("must be an adult", "age"))
//!     }
//! });
//! assert_eq!(adult, Outcome::ok(42));
//! ```

use std::future::Future;

use crate::failure::{Failure, Failures};

/// A success carrying a value of type `T`, or a non-empty list of failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "an outcome may be failed and should be inspected"]
pub enum Outcome<T = ()> {
    /// The operation succeeded.
    Success(T),
    /// The operation failed for one or more reasons.
    Failed(Failures),
}

// ============================================================================
// Untyped outcome
// ============================================================================

impl Outcome<()> {
    /// Creates an untyped success.
    pub fn success() -> Self {
        Outcome::Success(())
    }

    /// Attaches a value to an untyped success; failures are carried over.
    pub fn with_value<T>(self, value: T) -> Outcome<T> {
        match self {
            Outcome::Success(()) => Outcome::Success(value),
            Outcome::Failed(failures) => Outcome::Failed(failures),
        }
    }

    /// Combines several outcomes into one.
    ///
    /// The result succeeds iff every input succeeded. Otherwise it carries the
    /// failures of every failed input, concatenated in input order. Values of
    /// successful inputs are discarded.
    pub fn combine<T, I>(outcomes: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome<T>>,
    {
        let mut collected: Option<Failures> = None;
        for outcome in outcomes {
            if let Outcome::Failed(failures) = outcome {
                match collected.as_mut() {
                    Some(all) => all.extend(failures),
                    None => collected = Some(failures),
                }
            }
        }
        match collected {
            Some(failures) => Outcome::Failed(failures),
            None => Outcome::Success(()),
        }
    }

    /// Like [`combine`](Self::combine), but borrows the inputs.
    pub fn combine_ref<'a, T, I>(outcomes: I) -> Outcome
    where
        T: 'a,
        I: IntoIterator<Item = &'a Outcome<T>>,
    {
        Self::combine(outcomes.into_iter().map(|outcome| match outcome {
            Outcome::Success(_) => Outcome::Success(()),
            Outcome::Failed(failures) => Outcome::Failed(failures.clone()),
        }))
    }
}

// ============================================================================
// Construction and inspection
// ============================================================================

impl<T> Outcome<T> {
    /// Creates a successful outcome carrying `value`.
    pub fn ok(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Creates a failed outcome with a single failure.
    pub fn fail(failure: Failure) -> Self {
        Outcome::Failed(Failures::single(failure))
    }

    /// Creates a failed outcome from several failures.
    ///
    /// # Panics
    ///
    /// Panics if `failures` yields nothing; a failed outcome without a reason
    /// is a programming error.
    pub fn fail_many<I>(failures: I) -> Self
    where
        I: IntoIterator<Item = Failure>,
    {
        Outcome::Failed(Failures::new(failures.into_iter().collect()))
    }

    /// Creates a failed outcome from an existing failure list.
    pub fn from_failures(failures: Failures) -> Self {
        Outcome::Failed(failures)
    }

    /// Returns `true` if the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` if the outcome failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome failed.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failed(failures) => {
                panic!("called `Outcome::value()` on a failed outcome: {failures}")
            }
        }
    }

    /// Consumes the outcome and returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if the outcome failed.
    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failed(failures) => {
                panic!("called `Outcome::into_value()` on a failed outcome: {failures}")
            }
        }
    }

    /// Returns the failures; empty on success.
    pub fn failures(&self) -> &[Failure] {
        match self {
            Outcome::Success(_) => &[],
            Outcome::Failed(failures) => failures,
        }
    }

    /// Converts into `Option<T>`, discarding failures.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    /// Converts into a standard [`Result`] so `?` can be used.
    pub fn into_result(self) -> Result<T, Failures> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failed(failures) => Err(failures),
        }
    }

    /// Borrows the success value.
    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failed(failures) => Outcome::Failed(failures.clone()),
        }
    }

    /// Drops the value, keeping only success or the failures.
    pub fn into_untyped(self) -> Outcome {
        match self {
            Outcome::Success(_) => Outcome::Success(()),
            Outcome::Failed(failures) => Outcome::Failed(failures),
        }
    }
}

// ============================================================================
// Synchronous combinators
// ============================================================================

impl<T> Outcome<T> {
    /// Transforms the success value. `f` is never called on a failure.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failed(failures) => Outcome::Failed(failures),
        }
    }

    /// Chains a fallible step.
    ///
    /// On success the step's outcome is returned directly; on failure the
    /// chain short-circuits and `f` is never called.
    pub fn then<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failed(failures) => Outcome::Failed(failures),
        }
    }

    /// Observes the outcome, whichever variant it is.
    pub fn tee<F>(self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(&self);
        self
    }

    /// Observes the success value.
    pub fn tee_on_success<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Outcome::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Observes the failures.
    pub fn tee_on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(&Failures),
    {
        if let Outcome::Failed(failures) = &self {
            f(failures);
        }
        self
    }
}

// ============================================================================
// Asynchronous combinators
// ============================================================================

impl<T> Outcome<T> {
    /// Async [`map`](Self::map).
    pub async fn map_async<U, F, Fut>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value).await),
            Outcome::Failed(failures) => Outcome::Failed(failures),
        }
    }

    /// Async [`then`](Self::then).
    pub async fn then_async<U, F, Fut>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        match self {
            Outcome::Success(value) => f(value).await,
            Outcome::Failed(failures) => Outcome::Failed(failures),
        }
    }

    /// Async [`tee`](Self::tee).
    ///
    /// The returned future must not borrow the outcome; clone what it needs.
    pub async fn tee_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(&Self) -> Fut,
        Fut: Future<Output = ()>,
    {
        f(&self).await;
        self
    }

    /// Async [`tee_on_success`](Self::tee_on_success).
    pub async fn tee_on_success_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Outcome::Success(value) = &self {
            f(value).await;
        }
        self
    }

    /// Async [`tee_on_failure`](Self::tee_on_failure).
    pub async fn tee_on_failure_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(&Failures) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Outcome::Failed(failures) = &self {
            f(failures).await;
        }
        self
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Outcome::fail(failure)
    }
}

impl<T> From<Failures> for Outcome<T> {
    fn from(failures: Failures) -> Self {
        Outcome::Failed(failures)
    }
}

impl<T> From<Result<T, Failure>> for Outcome<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(failure) => Outcome::fail(failure),
        }
    }
}

impl<T> From<Result<T, Failures>> for Outcome<T> {
    fn from(result: Result<T, Failures>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(failures) => Outcome::Failed(failures),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Failures> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}

/// Collects outcomes, aggregating every failure instead of stopping at the
/// first one.
impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        let mut values = Vec::new();
        let mut collected: Option<Failures> = None;
        for outcome in iter {
            match outcome {
                Outcome::Success(value) => values.push(value),
                Outcome::Failed(failures) => match collected.as_mut() {
                    Some(all) => all.extend(failures),
                    None => collected = Some(failures),
                },
            }
        }
        match collected {
            Some(failures) => Outcome::Failed(failures),
            None => Outcome::Success(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn bad() -> Failure {
        Failure::with_handle("bad", "field")
    }

    #[test]
    fn test_ok_carries_value() {
        let outcome = Outcome::ok(5);
        assert!(outcome.is_success());
        assert!(!outcome.is_failed());
        assert_eq!(*outcome.value(), 5);
        assert!(outcome.failures().is_empty());
    }

    #[test]
    fn test_fail_carries_failures() {
        let outcome: Outcome<i32> = Outcome::fail(bad());
        assert!(outcome.is_failed());
        assert_eq!(outcome.failures(), &[bad()]);
    }

    #[test]
    #[should_panic(expected = "at least one failure")]
    fn test_fail_many_empty_panics() {
        let _: Outcome = Outcome::fail_many(Vec::new());
    }

    #[test]
    #[should_panic(expected = "failed outcome")]
    fn test_value_on_failure_panics() {
        let outcome: Outcome<i32> = Outcome::fail(bad());
        let _ = outcome.value();
    }

    #[test]
    fn test_combine_concatenates_in_input_order() {
        let combined = Outcome::combine(vec![
            Outcome::fail(Failure::new("first")),
            Outcome::success(),
            Outcome::fail_many(vec![Failure::new("second"), Failure::new("third")]),
        ]);
        let messages: Vec<_> = combined.failures().iter().map(Failure::message).collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[test]
    fn test_combine_all_success() {
        assert_eq!(
            Outcome::combine(vec![Outcome::ok(1), Outcome::ok(2)]),
            Outcome::success()
        );
        assert_eq!(Outcome::combine(Vec::<Outcome>::new()), Outcome::success());
    }

    #[test]
    fn test_combine_ref_leaves_inputs() {
        let inputs = [Outcome::ok(1), Outcome::fail(bad())];
        let combined = Outcome::combine_ref(&inputs);
        assert_eq!(combined.failures(), &[bad()]);
        assert_eq!(*inputs[0].value(), 1);
    }

    #[test]
    fn test_untyped_conversion() {
        assert_eq!(Outcome::ok("x").into_untyped(), Outcome::success());
        let failed: Outcome<&str> = Outcome::fail(bad());
        assert_eq!(failed.into_untyped(), Outcome::fail(bad()));
        assert_eq!(Outcome::success().with_value(3), Outcome::ok(3));
    }

    #[test]
    fn test_map_applies_on_success() {
        assert_eq!(Outcome::ok(2).map(|v| v * 10), Outcome::ok(20));
    }

    #[test]
    fn test_map_is_lazy_on_failure() {
        let calls = Cell::new(0);
        let outcome: Outcome<i32> = Outcome::fail(bad());
        let mapped = outcome.map(|v| {
            calls.set(calls.get() + 1);
            v + 1
        });
        assert_eq!(mapped, Outcome::fail(bad()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_map_identity_law() {
        assert_eq!(Outcome::ok(7).map(|v| v), Outcome::ok(7));
        let failed: Outcome<i32> = Outcome::fail(bad());
        assert_eq!(failed.clone().map(|v| v), failed);
    }

    #[test]
    fn test_then_short_circuits_chain() {
        let second = Cell::new(0);
        let third = Cell::new(0);

        let outcome = Outcome::ok(1)
            .then(|_| Outcome::<i32>::fail(Failure::new("step one")))
            .then(|v| {
                second.set(second.get() + 1);
                Outcome::ok(v + 1)
            })
            .then(|v| {
                third.set(third.get() + 1);
                Outcome::ok(v + 1)
            });

        assert_eq!(outcome.failures(), &[Failure::new("step one")]);
        assert_eq!(second.get(), 0);
        assert_eq!(third.get(), 0);
    }

    #[test]
    fn test_then_is_associative() {
        let f = |v: i32| Outcome::ok(v + 1);
        let g = |v: i32| {
            if v > 2 {
                Outcome::fail(Failure::new("too big"))
            } else {
                Outcome::ok(v * 2)
            }
        };

        for start in [0, 1, 2, 5] {
            let left = Outcome::ok(start).then(f).then(g);
            let right = Outcome::ok(start).then(|v| f(v).then(g));
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_taps_do_not_alter_outcome() {
        let seen = Cell::new(0);
        let outcome = Outcome::ok(3)
            .tee(|_| seen.set(seen.get() + 1))
            .tee_on_success(|v| seen.set(seen.get() + v))
            .tee_on_failure(|_| seen.set(100));
        assert_eq!(outcome, Outcome::ok(3));
        assert_eq!(seen.get(), 4);

        let failed: Outcome<i32> = Outcome::fail(bad());
        let failed = failed
            .tee_on_success(|_| seen.set(100))
            .tee_on_failure(|f| seen.set(f.len() as i32));
        assert_eq!(failed, Outcome::fail(bad()));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_result_conversions() {
        let from_ok: Outcome<i32> = Ok::<_, Failure>(1).into();
        assert_eq!(from_ok, Outcome::ok(1));

        let from_err: Outcome<i32> = Err::<i32, Failure>(bad()).into();
        assert_eq!(from_err, Outcome::fail(bad()));

        let back: Result<i32, Failures> = from_err.into();
        assert_eq!(back.unwrap_err().first(), &bad());
    }

    #[test]
    fn test_collect_aggregates_every_failure() {
        let collected: Outcome<Vec<i32>> = vec![
            Outcome::ok(1),
            Outcome::fail(Failure::new("a")),
            Outcome::ok(2),
            Outcome::fail(Failure::new("b")),
        ]
        .into_iter()
        .collect();
        assert_eq!(collected.failures().len(), 2);

        let collected: Outcome<Vec<i32>> =
            vec![Outcome::ok(1), Outcome::ok(2)].into_iter().collect();
        assert_eq!(collected, Outcome::ok(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_async_map_and_then() {
        let outcome = Outcome::ok(2)
            .map_async(|v| async move { v + 1 })
            .await
            .then_async(|v| async move { Outcome::ok(v * 2) })
            .await;
        assert_eq!(outcome, Outcome::ok(6));
    }

    #[tokio::test]
    async fn test_async_then_short_circuits() {
        let calls = Cell::new(0);
        let failed: Outcome<i32> = Outcome::fail(bad());
        let outcome = failed
            .then_async(|v| {
                calls.set(calls.get() + 1);
                async move { Outcome::ok(v) }
            })
            .await
            .map_async(|v| {
                calls.set(calls.get() + 1);
                async move { v }
            })
            .await;
        assert_eq!(outcome, Outcome::fail(bad()));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_async_taps_do_not_alter_outcome() {
        let seen = Cell::new(0);
        let outcome = Outcome::ok(3)
            .tee_on_success_async(|v| {
                seen.set(*v);
                async {}
            })
            .await
            .tee_on_failure_async(|_| {
                seen.set(100);
                async {}
            })
            .await
            .tee_async(|o| {
                assert!(o.is_success());
                async {}
            })
            .await;
        assert_eq!(outcome, Outcome::ok(3));
        assert_eq!(seen.get(), 3);
    }
}
