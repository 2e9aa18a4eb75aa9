//! The asynchronous pipeline.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, trace};
use verdict_core::Outcome;

use super::stage::PipelineStage;
use crate::error::{PipelineError, PipelineResult};
use crate::handler::AsyncEventHandler;
use crate::post_processor::{AsyncPostProcessor, PostProcessor, SyncPostProcessor};
use crate::validator::{AsyncRequestValidator, RequestValidator, SyncValidator};

/// A type-erased asynchronous validator.
pub type BoxedAsyncValidator<Req> = Arc<dyn AsyncRequestValidator<Req>>;

/// A type-erased asynchronous post-processor.
pub type BoxedAsyncPostProcessor<Req, Res> = Arc<dyn AsyncPostProcessor<Req, Res>>;

struct Stages<Req: Sync, Res: Sync> {
    name: Option<String>,
    validators: Vec<BoxedAsyncValidator<Req>>,
    post_processors: Vec<BoxedAsyncPostProcessor<Req, Res>>,
}

impl<Req: Sync, Res: Sync> Clone for Stages<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            validators: self.validators.clone(),
            post_processors: self.post_processors.clone(),
        }
    }
}

/// The asynchronous twin of [`Decorator`](crate::Decorator).
///
/// Validators, the handler and post-processors are awaited one after another,
/// in the same order the synchronous pipeline runs them. Synchronous
/// validators and post-processors can be mixed in freely.
///
/// # Example
///
/// ```
/// use verdict_core::{Failure, Outcome};
/// use verdict_framework::{AsyncDecorator, Rule, Validator, async_handler_fn};
///
/// #[derive(Clone)]
/// struct Deposit {
///     amount: i64,
/// }
///
/// # tokio_test::block_on(async {
/// let pipeline = AsyncDecorator::new(async_handler_fn(|d: Deposit| async move {
///     Outcome::ok(d.amount)
/// }))
/// .add_request_validator(Validator::new().rule(
///     Rule::with_failure(Failure::with_handle("amount must be positive", "amount"))
///         .invalid_when(|d: &Deposit| d.amount <= 0),
/// ));
///
/// assert_eq!(pipeline.handle(&Deposit { amount: 10 }).await, Outcome::ok(10));
/// assert!(pipeline.handle(&Deposit { amount: 0 }).await.is_failed());
/// # });
/// ```
pub struct AsyncDecorator<Req, H>
where
    Req: Sync,
    H: AsyncEventHandler<Req>,
    H::Response: Sync,
{
    handler: Arc<H>,
    stages: Arc<Stages<Req, H::Response>>,
}

impl<Req, H> Clone for AsyncDecorator<Req, H>
where
    Req: Sync,
    H: AsyncEventHandler<Req>,
    H::Response: Sync,
{
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<Req, H> AsyncDecorator<Req, H>
where
    Req: Sync,
    H: AsyncEventHandler<Req>,
    H::Response: Sync,
{
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

    /// Appends a synchronous request validator.
    pub fn add_request_validator<V>(self, validator: V) -> Self
    where
        V: RequestValidator<Req> + 'static,
    {
        self.add_async_request_validator(SyncValidator(validator))
    }

    /// Appends an asynchronous request validator.
    pub fn add_async_request_validator<V>(mut self, validator: V) -> Self
    where
        V: AsyncRequestValidator<Req> + 'static,
    {
        self.stages_mut().validators.push(Arc::new(validator));
        self
    }

    /// Appends a synchronous post-processor.
    pub fn add_post_processor<P>(self, post_processor: P) -> Self
    where
        P: PostProcessor<Req, H::Response> + 'static,
    {
        self.add_async_post_processor(SyncPostProcessor(post_processor))
    }

    /// Appends an asynchronous post-processor.
    pub fn add_async_post_processor<P>(mut self, post_processor: P) -> Self
    where
        P: AsyncPostProcessor<Req, H::Response> + 'static,
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
    pub async fn handle(&self, request: &Req) -> Outcome<H::Response> {
        let span = self.span();
        async {
            let outcome = self.validate_and_handle(request).await;
            self.post_process(request, &outcome).await;
            outcome
        }
        .instrument(span)
        .await
    }

    /// Runs the pipeline unless `token` is cancelled first.
    ///
    /// Cancellation is checked before the pipeline starts and raced against
    /// validation and the handler. A cancelled invocation returns
    /// [`PipelineError::Cancelled`] and runs no post-processors. Once the
    /// outcome is known, post-processors run to completion.
    pub async fn handle_cancellable(
        &self,
        request: &Req,
        token: CancellationToken,
    ) -> PipelineResult<Outcome<H::Response>> {
        let span = self.span();
        async {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Pipeline cancelled");
                    return Err(PipelineError::Cancelled);
                }
                outcome = self.validate_and_handle(request) => outcome,
            };
            self.post_process(request, &outcome).await;
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    fn span(&self) -> tracing::Span {
        debug_span!("pipeline", name = self.name().unwrap_or("unnamed"))
    }

    async fn validate_and_handle(&self, request: &Req) -> Outcome<H::Response> {
        trace!(stage = %PipelineStage::Created, "Pipeline stage");
        trace!(
            stage = %PipelineStage::Validating,
            validators = self.stages.validators.len(),
            "Pipeline stage"
        );
        let mut results = Vec::with_capacity(self.stages.validators.len());
        for validator in &self.stages.validators {
            results.push(validator.validate(request).await);
        }
        let validation = Outcome::combine(results);
        trace!(stage = %PipelineStage::after_validation(validation.is_failed()), "Pipeline stage");

        match validation {
            Outcome::Failed(failures) => Outcome::Failed(failures),
            Outcome::Success(()) => {
                trace!(stage = %PipelineStage::Handling, "Pipeline stage");
                let outcome = self.handler.handle(request).await;
                trace!(stage = %PipelineStage::after_handling(outcome.is_failed()), "Pipeline stage");
                outcome
            }
        }
    }

    async fn post_process(&self, request: &Req, outcome: &Outcome<H::Response>) {
        trace!(
            stage = %PipelineStage::PostProcessing,
            post_processors = self.stages.post_processors.len(),
            "Pipeline stage"
        );
        for post_processor in &self.stages.post_processors {
            post_processor.process(request, outcome).await;
        }

        debug!(
            success = outcome.is_success(),
            failures = outcome.failures().len(),
            "Pipeline completed"
        );
        trace!(stage = %PipelineStage::Done, "Pipeline stage");
    }
}

#[async_trait]
impl<Req, H> AsyncEventHandler<Req> for AsyncDecorator<Req, H>
where
    Req: Sync,
    H: AsyncEventHandler<Req>,
    H::Response: Sync,
{
    type Response = H::Response;

    async fn handle(&self, request: &Req) -> Outcome<H::Response> {
        AsyncDecorator::handle(self, request).await
    }
}

impl<Req, H> fmt::Debug for AsyncDecorator<Req, H>
where
    Req: Sync,
    H: AsyncEventHandler<Req>,
    H::Response: Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncDecorator")
            .field("name", &self.stages.name)
            .field("validators", &self.stages.validators.len())
            .field("post_processors", &self.stages.post_processors.len())
            .finish()
    }
}
