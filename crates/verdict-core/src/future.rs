//! Chaining combinators on futures that resolve to an [`Outcome`].
//!
//! These let an asynchronous chain be assembled before the first `.await`,
//! with the same short-circuit rules as the synchronous combinators.
//!
//! ```
//! use verdict_core::{Failure, Outcome, OutcomeFutureExt};
//!
//! async fn load(id: u32) -> Outcome<u32> {
//!     if id == 0 {
//!         Outcome::fail(Failure::with_handle("unknown id", "id"))
//!     } else {
//!         Outcome::ok(id)
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let name = load(7)
//!     .map_outcome(|id| id * 2)
//!     .then_outcome(|id| async move { Outcome::ok(format!("user-{id}")) })
//!     .await;
//! assert_eq!(name, Outcome::ok("user-14".to_string()));
//! # });
//! ```

use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::failure::Failures;
use crate::outcome::Outcome;

/// Extension trait for futures resolving to an [`Outcome`].
pub trait OutcomeFutureExt<'a, T>: Future<Output = Outcome<T>> + Send + Sized + 'a
where
    T: Send + 'a,
{
    /// Maps the success value once the future resolves.
    fn map_outcome<U, F>(self, f: F) -> BoxFuture<'a, Outcome<U>>
    where
        F: FnOnce(T) -> U + Send + 'a,
    {
        self.map(move |outcome| outcome.map(f)).boxed()
    }

    /// Chains an asynchronous fallible step; skipped if the future fails.
    fn then_outcome<U, F, Fut>(self, f: F) -> BoxFuture<'a, Outcome<U>>
    where
        F: FnOnce(T) -> Fut + Send + 'a,
        Fut: Future<Output = Outcome<U>> + Send + 'a,
    {
        async move {
            match self.await {
                Outcome::Success(value) => f(value).await,
                Outcome::Failed(failures) => Outcome::Failed(failures),
            }
        }
        .boxed()
    }

    /// Observes the success value without changing the outcome.
    fn tee_success<F>(self, f: F) -> BoxFuture<'a, Outcome<T>>
    where
        F: FnOnce(&T) + Send + 'a,
    {
        self.map(move |outcome| outcome.tee_on_success(f)).boxed()
    }

    /// Observes the failures without changing the outcome.
    fn tee_failure<F>(self, f: F) -> BoxFuture<'a, Outcome<T>>
    where
        F: FnOnce(&Failures) + Send + 'a,
    {
        self.map(move |outcome| outcome.tee_on_failure(f)).boxed()
    }
}

impl<'a, T, Fut> OutcomeFutureExt<'a, T> for Fut
where
    Fut: Future<Output = Outcome<T>> + Send + 'a,
    T: Send + 'a,
{
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Failure;

    async fn fetch(value: i32) -> Outcome<i32> {
        if value < 0 {
            Outcome::fail(Failure::with_handle("negative", "value"))
        } else {
            Outcome::ok(value)
        }
    }

    #[tokio::test]
    async fn test_chain_on_success() {
        let outcome = fetch(3)
            .map_outcome(|v| v + 1)
            .then_outcome(|v| async move { Outcome::ok(v * 10) })
            .await;
        assert_eq!(outcome, Outcome::ok(40));
    }

    #[tokio::test]
    async fn test_chain_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c1 = Arc::clone(&calls);
        let c2 = Arc::clone(&calls);

        let outcome = fetch(-1)
            .then_outcome(move |v| {
                c1.fetch_add(1, Ordering::SeqCst);
                async move { Outcome::ok(v) }
            })
            .map_outcome(move |v| {
                c2.fetch_add(1, Ordering::SeqCst);
                v
            })
            .await;

        assert_eq!(
            outcome.failures(),
            &[Failure::with_handle("negative", "value")]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_taps_keep_outcome() {
        let seen = Arc::new(AtomicUsize::new(0));
        let on_success = Arc::clone(&seen);
        let on_failure = Arc::clone(&seen);

        let outcome = fetch(5)
            .tee_success(move |v| {
                on_success.store(*v as usize, Ordering::SeqCst);
            })
            .tee_failure(move |_| {
                on_failure.store(100, Ordering::SeqCst);
            })
            .await;

        assert_eq!(outcome, Outcome::ok(5));
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }
}
