//! Pipeline stages, used for tracing.

use std::fmt;

/// The stages a single pipeline invocation moves through.
///
/// ```text
/// Created → Validating ─┬─ ValidationPassed → Handling ─┬─ HandleSucceeded ─┐
///                       │                               └─ HandleFailed ────┤
///                       └─ ValidationFailed ────────────────────────────────┴─ PostProcessing → Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// The invocation has been accepted.
    Created,
    /// Validators are running.
    Validating,
    /// At least one validator reported a failure; the handler is skipped.
    ValidationFailed,
    /// Every validator passed.
    ValidationPassed,
    /// The wrapped handler is running.
    Handling,
    /// The handler reported a domain failure.
    HandleFailed,
    /// The handler succeeded.
    HandleSucceeded,
    /// Post-processors are running.
    PostProcessing,
    /// The outcome has been handed back to the caller.
    Done,
}

impl PipelineStage {
    /// Returns the stage name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Validating => "validating",
            Self::ValidationFailed => "validation_failed",
            Self::ValidationPassed => "validation_passed",
            Self::Handling => "handling",
            Self::HandleFailed => "handle_failed",
            Self::HandleSucceeded => "handle_succeeded",
            Self::PostProcessing => "post_processing",
            Self::Done => "done",
        }
    }

    /// The stage reached after validation, given whether it failed.
    pub(crate) fn after_validation(failed: bool) -> Self {
        if failed {
            Self::ValidationFailed
        } else {
            Self::ValidationPassed
        }
    }

    /// The stage reached after the handler, given whether it failed.
    pub(crate) fn after_handling(failed: bool) -> Self {
        if failed {
            Self::HandleFailed
        } else {
            Self::HandleSucceeded
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions() {
        assert_eq!(
            PipelineStage::after_validation(true),
            PipelineStage::ValidationFailed
        );
        assert_eq!(
            PipelineStage::after_validation(false),
            PipelineStage::ValidationPassed
        );
        assert_eq!(
            PipelineStage::after_handling(true),
            PipelineStage::HandleFailed
        );
        assert_eq!(
            PipelineStage::after_handling(false),
            PipelineStage::HandleSucceeded
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::PostProcessing.to_string(), "post_processing");
    }
}
