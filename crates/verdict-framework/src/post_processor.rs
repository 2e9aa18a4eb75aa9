//! Post-processors: side-effect hooks run once after a pipeline completes.
//!
//! A post-processor observes the request and the final [`Outcome`]; it cannot
//! change what the caller receives. [`PostProcessor::process`] always calls
//! [`on_both`](PostProcessor::on_both) first, then either
//! [`on_success`](PostProcessor::on_success) or
//! [`on_failure`](PostProcessor::on_failure).

use async_trait::async_trait;
use verdict_core::{Failures, Outcome};

/// A synchronous post-processing hook.
///
/// All hooks default to doing nothing; implement the ones you need.
pub trait PostProcessor<Req, Res>: Send + Sync {
    /// Called for every outcome, before the variant-specific hook.
    fn on_both(&self, _request: &Req, _outcome: &Outcome<Res>) {}

    /// Called when the pipeline succeeded.
    fn on_success(&self, _request: &Req, _response: &Res) {}

    /// Called when validation or the handler failed.
    fn on_failure(&self, _request: &Req, _failures: &Failures) {}

    /// Dispatches to the hooks. Pipelines call this exactly once per invocation.
    fn process(&self, request: &Req, outcome: &Outcome<Res>) {
        self.on_both(request, outcome);
        match outcome {
            Outcome::Success(response) => self.on_success(request, response),
            Outcome::Failed(failures) => self.on_failure(request, failures),
        }
    }
}

/// An asynchronous post-processing hook.
#[async_trait]
pub trait AsyncPostProcessor<Req: Sync, Res: Sync>: Send + Sync {
    /// Called for every outcome, before the variant-specific hook.
    async fn on_both(&self, _request: &Req, _outcome: &Outcome<Res>) {}

    /// Called when the pipeline succeeded.
    async fn on_success(&self, _request: &Req, _response: &Res) {}

    /// Called when validation or the handler failed.
    async fn on_failure(&self, _request: &Req, _failures: &Failures) {}

    /// Dispatches to the hooks. Pipelines call this exactly once per invocation.
    async fn process(&self, request: &Req, outcome: &Outcome<Res>) {
        self.on_both(request, outcome).await;
        match outcome {
            Outcome::Success(response) => self.on_success(request, response).await,
            Outcome::Failed(failures) => self.on_failure(request, failures).await,
        }
    }
}

/// Runs a synchronous post-processor where an asynchronous one is expected.
pub(crate) struct SyncPostProcessor<P>(pub(crate) P);

#[async_trait]
impl<Req, Res, P> AsyncPostProcessor<Req, Res> for SyncPostProcessor<P>
where
    Req: Sync,
    Res: Sync,
    P: PostProcessor<Req, Res>,
{
    async fn process(&self, request: &Req, outcome: &Outcome<Res>) {
        self.0.process(request, outcome);
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use verdict_core::Failure;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<&'static str>>,
    }

    impl PostProcessor<(), i32> for Recorder {
        fn on_both(&self, _request: &(), _outcome: &Outcome<i32>) {
            self.calls.lock().push("both");
        }

        fn on_success(&self, _request: &(), _response: &i32) {
            self.calls.lock().push("success");
        }

        fn on_failure(&self, _request: &(), _failures: &Failures) {
            self.calls.lock().push("failure");
        }
    }

    #[test]
    fn test_process_calls_both_then_success() {
        let recorder = Recorder::default();
        recorder.process(&(), &Outcome::ok(1));
        assert_eq!(*recorder.calls.lock(), ["both", "success"]);
    }

    #[test]
    fn test_process_calls_both_then_failure() {
        let recorder = Recorder::default();
        recorder.process(&(), &Outcome::<i32>::fail(Failure::new("nope")));
        assert_eq!(*recorder.calls.lock(), ["both", "failure"]);
    }

    #[test]
    fn test_default_hooks_are_noops() {
        struct Silent;
        impl PostProcessor<(), i32> for Silent {}

        Silent.process(&(), &Outcome::ok(1));
        Silent.process(&(), &Outcome::<i32>::fail(Failure::new("nope")));
    }

    #[tokio::test]
    async fn test_sync_adapter_dispatches() {
        let adapter = SyncPostProcessor(Recorder::default());
        AsyncPostProcessor::process(&adapter, &(), &Outcome::<i32>::fail(Failure::new("x"))).await;
        assert_eq!(*adapter.0.calls.lock(), ["both", "failure"]);
    }
}
