//! Error types for the Verdict framework.
//!
//! Validation and domain failures never show up here; they travel inside an
//! [`Outcome`](verdict_core::Outcome). These errors describe faults outside
//! the outcome channel.

use thiserror::Error;

/// Faults that abort a pipeline invocation without producing an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The invocation was cancelled before it completed.
    #[error("pipeline invocation cancelled")]
    Cancelled,
}

/// Result type for pipeline invocations that can be aborted.
pub type PipelineResult<T> = Result<T, PipelineError>;
