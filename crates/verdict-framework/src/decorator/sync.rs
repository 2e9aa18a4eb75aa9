//! The synchronous pipeline.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span, trace};
use verdict_core::Outcome;

use super::stage::PipelineStage;
use crate::handler::EventHandler;
use crate::post_processor::PostProcessor;
use crate::validator::RequestValidator;

/// A type-erased synchronous validator.
pub type BoxedValidator<Req> = Arc<dyn RequestValidator<Req>>;

/// A type-erased synchronous post-processor.
pub type BoxedPostProcessor<Req, Res> = Arc<dyn PostProcessor<Req, Res>>;

/// Validators and post-processors of a [`Decorator`].
///
/// Wrapped in an `Arc` and mutated through `Arc::make_mut`, so cloning a
/// decorator is cheap and adding a stage to a clone never affects the original.
struct Stages<Req, Res> {
    name: Option<String>,
    validators: Vec<BoxedValidator<Req>>,
    post_processors: Vec<BoxedPostProcessor<Req, Res>>,
}

impl<Req, Res> Clone for Stages<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            validators: self.validators.clone(),
            post_processors: self.post_processors.clone(),
        }
    }
}

/// Wraps an [`EventHandler`] with request validation and post-processing.
///
/// Each call to [`handle`](Self::handle):
///
/// 1. runs every validator, in registration order, and combines their outcomes;
/// 2. if validation failed, skips the handler and uses the combined failures
///    as the outcome, otherwise calls the handler;
/// 3. runs every post-processor exactly once, in registration order;
/// 4. returns the outcome unchanged.
///
/// A `Decorator` is itself an [`EventHandler`], so pipelines nest.
///
/// # Example
///
/// ```
/// use verdict_core::{Failure, Outcome};
/// use verdict_framework::{Decorator, Rule, Validator, handler_fn};
///
/// struct Deposit {
///     amount: i64,
/// }
///
/// let pipeline = Decorator::new(handler_fn(|d: &Deposit| Outcome::ok(d.amount)))
///     .add_request_validator(Validator::new().rule(
///         Rule::with_failure(Failure::with_handle("amount must be positive", "amount"))
///             .invalid_when(|d: &Deposit| d.amount <= 0),
///     ));
///
/// assert_eq!(pipeline.handle(&Deposit { amount: 10 }), Outcome::ok(10));
/// assert!(pipeline.handle(&Deposit { amount: -1 }).is_failed());
/// ```
pub struct Decorator<Req, H: EventHandler<Req>> {
    handler: Arc<H>,
    stages: Arc<Stages<Req, H::Response>>,
}

impl<Req, H: EventHandler<Req>> Clone for Decorator<Req, H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<Req, H: EventHandler<Req>> Decorator<Req, H> {
    /// Creates a pipeline around `handler` with no validators or post-processors.
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            stages: Arc::new(Stages {
                name: None,
                validators: Vec::new(),
                post_processors: Vec::new(),
            }),
        }
    }

    fn stages_mut(&mut self) -> &mut Stages<Req, H::Response> {
        Arc::make_mut(&mut self.stages)
    }

    /// Names the pipeline; the name is attached to its tracing span.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.stages_mut().name = Some(name.into());
        self
    }

    /// Appends a request validator.
    pub fn add_request_validator<V>(mut self, validator: V) -> Self
    where
        V: RequestValidator<Req> + 'static,
    {
        self.stages_mut().validators.push(Arc::new(validator));
        self
    }

    /// Appends a post-processor.
    pub fn add_post_processor<P>(mut self, post_processor: P) -> Self
    where
        P: PostProcessor<Req, H::Response> + 'static,
    {
        self.stages_mut()
            .post_processors
            .push(Arc::new(post_processor));
        self
    }

    /// Returns the pipeline name, if set.
    pub fn name(&self) -> Option<&str> {
        self.stages.name.as_deref()
    }

    /// Returns the wrapped handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the number of validators.
    pub fn validator_count(&self) -> usize {
        self.stages.validators.len()
    }

    /// Returns the number of post-processors.
    pub fn post_processor_count(&self) -> usize {
        self.stages.post_processors.len()
    }

    /// Runs the pipeline for one request.
    pub fn handle(&self, request: &Req) -> Outcome<H::Response> {
        let span = debug_span!("pipeline", name = self.name().unwrap_or("unnamed"));
        let _enter = span.enter();

        trace!(stage = %PipelineStage::Created, "Pipeline stage");
        trace!(
            stage = %PipelineStage::Validating,
            validators = self.stages.validators.len(),
            "Pipeline stage"
        );
        let validation = Outcome::combine(
            self.stages
                .validators
                .iter()
                .map(|validator| validator.validate(request)),
        );
        trace!(stage = %PipelineStage::after_validation(validation.is_failed()), "Pipeline stage");

        let outcome = match validation {
            Outcome::Failed(failures) => Outcome::Failed(failures),
            Outcome::Success(()) => {
                trace!(stage = %PipelineStage::Handling, "Pipeline stage");
                let outcome = self.handler.handle(request);
                trace!(stage = %PipelineStage::after_handling(outcome.is_failed()), "Pipeline stage");
                outcome
            }
        };

        trace!(
            stage = %PipelineStage::PostProcessing,
            post_processors = self.stages.post_processors.len(),
            "Pipeline stage"
        );
        for post_processor in &self.stages.post_processors {
            post_processor.process(request, &outcome);
        }

        debug!(
            success = outcome.is_success(),
            failures = outcome.failures().len(),
            "Pipeline completed"
        );
        trace!(stage = %PipelineStage::Done, "Pipeline stage");
        outcome
    }
}

impl<Req, H: EventHandler<Req>> EventHandler<Req> for Decorator<Req, H> {
    type Response = H::Response;

    fn handle(&self, request: &Req) -> Outcome<H::Response> {
        Decorator::handle(self, request)
    }
}

impl<Req, H: EventHandler<Req>> fmt::Debug for Decorator<Req, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("name", &self.stages.name)
            .field("validators", &self.stages.validators.len())
            .field("post_processors", &self.stages.post_processors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use parking_lot::Mutex;
    use verdict_core::{Failure, Failures};

    use super::*;
    use crate::handler::handler_fn;
    use crate::rule::Rule;
    use crate::validator::{Validator, validator_fn};

    #[derive(Debug, Clone)]
    struct Signup {
        email: String,
        password: String,
    }

    fn signup(email: &str, password: &str) -> Signup {
        Signup {
            email: email.into(),
            password: password.into(),
        }
    }

    fn email_validator() -> Validator<Signup> {
        Validator::new().rule(
            Rule::with_failure(Failure::with_handle("email is required", "email"))
                .invalid_when(|s: &Signup| s.email.is_empty()),
        )
    }

    fn password_validator() -> Validator<Signup> {
        Validator::new().rule(
            Rule::with_failure(Failure::with_handle("password too short", "password"))
                .invalid_when(|s: &Signup| s.password.len() < 8),
        )
    }

    /// Records every hook invocation, tagged with a label.
    #[derive(Clone)]
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl<Res> PostProcessor<Signup, Res> for Recorder {
        fn on_both(&self, _request: &Signup, _outcome: &Outcome<Res>) {
            self.log.lock().push(format!("{}:both", self.label));
        }

        fn on_success(&self, _request: &Signup, _response: &Res) {
            self.log.lock().push(format!("{}:success", self.label));
        }

        fn on_failure(&self, _request: &Signup, failures: &Failures) {
            self.log
                .lock()
                .push(format!("{}:failure:{}", self.label, failures.len()));
        }
    }

    struct Exploding;

    impl<Res> PostProcessor<Signup, Res> for Exploding {
        fn on_both(&self, _request: &Signup, _outcome: &Outcome<Res>) {
            panic!("audit sink unavailable");
        }
    }

    struct SuccessCounter(Arc<AtomicUsize>);

    impl PostProcessor<u32, u32> for SuccessCounter {
        fn on_success(&self, _request: &u32, _response: &u32) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_handler(calls: Arc<AtomicUsize>) -> impl EventHandler<Signup, Response = String> {
        handler_fn(move |s: &Signup| {
            calls.fetch_add(1, Ordering::SeqCst);
            Outcome::ok(format!("welcome {}", s.email))
        })
    }

    fn already_registered(_: &Signup) -> Outcome<String> {
        Outcome::fail(Failure::new("email already registered"))
    }

    fn explode(_: &Signup) -> Outcome<()> {
        panic!("boom")
    }

    fn even_only() -> impl RequestValidator<u32> {
        validator_fn(|n: &u32| {
            if n % 2 == 0 {
                Outcome::success()
            } else {
                Outcome::fail(Failure::with_handle(format!("{n} is odd"), "n"))
            }
        })
    }

    #[test]
    fn test_validation_failure_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Decorator::new(counting_handler(Arc::clone(&calls)))
            .add_request_validator(email_validator())
            .add_post_processor(Recorder {
                label: "p",
                log: Arc::clone(&log),
            });

        let outcome = pipeline.handle(&signup("", "long enough"));

        assert_eq!(
            outcome.failures(),
            &[Failure::with_handle("email is required", "email")]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(*log.lock(), ["p:both", "p:failure:1"]);
    }

    #[test]
    fn test_success_runs_handler_and_post_processors_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Decorator::new(counting_handler(Arc::clone(&calls)))
            .add_request_validator(email_validator())
            .add_post_processor(Recorder {
                label: "first",
                log: Arc::clone(&log),
            })
            .add_post_processor(Recorder {
                label: "second",
                log: Arc::clone(&log),
            });

        let outcome = pipeline.handle(&signup("a@b.c", "long enough"));

        assert_eq!(outcome, Outcome::ok("welcome a@b.c".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *log.lock(),
            [
                "first:both",
                "first:success",
                "second:both",
                "second:success",
            ]
        );
    }

    #[test]
    fn test_handler_failure_reaches_post_processors() {
        let validated = Arc::new(AtomicUsize::new(0));
        let validated_in_fn = Arc::clone(&validated);
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Decorator::new(handler_fn(already_registered))
            .add_request_validator(validator_fn(move |_: &Signup| {
                validated_in_fn.fetch_add(1, Ordering::SeqCst);
                Outcome::success()
            }))
            .add_post_processor(Recorder {
                label: "p",
                log: Arc::clone(&log),
            });

        let outcome = pipeline.handle(&signup("a@b.c", "long enough"));

        assert_eq!(validated.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcome.failures(),
            &[Failure::new("email already registered")]
        );
        assert_eq!(*log.lock(), ["p:both", "p:failure:1"]);
    }

    #[test]
    fn test_all_validators_run_and_failures_aggregate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_validator = Arc::clone(&seen);
        let pipeline = Decorator::new(counting_handler(Arc::clone(&calls)))
            .add_request_validator(email_validator())
            .add_request_validator(validator_fn(move |_: &Signup| {
                seen_in_validator.fetch_add(1, Ordering::SeqCst);
                Outcome::success()
            }))
            .add_request_validator(password_validator());

        let outcome = pipeline.handle(&signup("", "short"));

        assert_eq!(
            outcome.failures(),
            &[
                Failure::with_handle("email is required", "email"),
                Failure::with_handle("password too short", "password"),
            ]
        );
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_stages_behaves_like_handler() {
        let pipeline = Decorator::new(handler_fn(|s: &Signup| Outcome::ok(s.password.len())));
        assert_eq!(pipeline.handle(&signup("", "abc")), Outcome::ok(3));
        assert_eq!(pipeline.validator_count(), 0);
        assert_eq!(pipeline.post_processor_count(), 0);
    }

    #[test]
    fn test_decorators_nest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let inner = Decorator::new(handler_fn(|s: &Signup| Outcome::ok(s.email.clone())))
            .add_request_validator(password_validator())
            .add_post_processor(Recorder {
                label: "inner",
                log: Arc::clone(&log),
            });
        let outer = Decorator::new(inner)
            .add_request_validator(email_validator())
            .add_post_processor(Recorder {
                label: "outer",
                log: Arc::clone(&log),
            });

        let outcome = outer.handle(&signup("a@b.c", "short"));

        assert_eq!(outcome.failures()[0].ui_handle(), Some("password"));
        assert_eq!(
            *log.lock(),
            [
                "inner:both",
                "inner:failure:1",
                "outer:both",
                "outer:failure:1",
            ]
        );

        log.lock().clear();
        let outcome = outer.handle(&signup("", "short"));
        assert_eq!(outcome.failures()[0].ui_handle(), Some("email"));
        assert_eq!(*log.lock(), ["outer:both", "outer:failure:1"]);
    }

    #[test]
    fn test_clone_is_copy_on_write() {
        let base = Decorator::new(handler_fn(|_: &Signup| Outcome::ok(())))
            .named("signup")
            .add_request_validator(email_validator());
        let extended = base.clone().add_request_validator(password_validator());

        assert_eq!(base.validator_count(), 1);
        assert_eq!(extended.validator_count(), 2);
        assert_eq!(extended.name(), Some("signup"));
        assert!(base.handle(&signup("a@b.c", "short")).is_success());
        assert!(extended.handle(&signup("a@b.c", "short")).is_failed());
    }

    #[test]
    fn test_concurrent_invocations_are_independent() {
        let successes = Arc::new(AtomicUsize::new(0));
        let pipeline = Decorator::new(handler_fn(|n: &u32| Outcome::ok(n * 10)))
            .add_request_validator(even_only())
            .add_post_processor(SuccessCounter(Arc::clone(&successes)));

        thread::scope(|scope| {
            for n in 0..64u32 {
                let pipeline = &pipeline;
                scope.spawn(move || {
                    let outcome = pipeline.handle(&n);
                    if n % 2 == 0 {
                        assert_eq!(outcome, Outcome::ok(n * 10));
                    } else {
                        assert_eq!(outcome.failures()[0].message(), format!("{n} is odd"));
                    }
                });
            }
        });

        assert_eq!(successes.load(Ordering::SeqCst), 32);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_handler_panic_propagates() {
        let pipeline = Decorator::new(handler_fn(explode));
        let _ = pipeline.handle(&signup("a@b.c", "long enough"));
    }

    #[test]
    fn test_post_processor_panic_stops_remaining_post_processors() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Decorator::new(handler_fn(|s: &Signup| Outcome::ok(s.email.clone())))
            .add_post_processor(Exploding)
            .add_post_processor(Recorder {
                label: "after",
                log: Arc::clone(&log),
            });
        let request = signup("a@b.c", "long enough");

        let result = panic::catch_unwind(AssertUnwindSafe(|| pipeline.handle(&request)));

        assert!(result.is_err());
        assert!(log.lock().is_empty());
    }
}
