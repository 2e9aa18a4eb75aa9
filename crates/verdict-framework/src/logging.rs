//! A post-processor that reports pipeline outcomes through `tracing`.

use std::fmt::Debug;

use tracing::{Level, debug, error, info, trace, warn};
use verdict_core::Failures;

use crate::post_processor::PostProcessor;

/// Emits an event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($args:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            error!($($args)+)
        } else if level == Level::WARN {
            warn!($($args)+)
        } else if level == Level::INFO {
            info!($($args)+)
        } else if level == Level::DEBUG {
            debug!($($args)+)
        } else {
            trace!($($args)+)
        }
    }};
}

/// Logs every pipeline outcome.
///
/// Failures are always logged at `WARN`: one summary event with the failure
/// count, then one event per failure whose message is the failure message and
/// which carries the `ui_handle` field when present.
/// Successes are logged at a configurable level (default `DEBUG`), with the
/// `Debug` rendering of the response when [`include_values`](Self::include_values)
/// is enabled.
#[derive(Debug, Clone)]
pub struct LoggingPostProcessor {
    pipeline: String,
    log_success: bool,
    include_values: bool,
    success_level: Level,
}

impl LoggingPostProcessor {
    /// Creates a logging post-processor; `pipeline` names the pipeline in every event.
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            log_success: true,
            include_values: false,
            success_level: Level::DEBUG,
        }
    }

    /// Enables or disables success events.
    pub fn log_success(mut self, enabled: bool) -> Self {
        self.log_success = enabled;
        self
    }

    /// Includes the response value in success events.
    ///
    /// Responses may contain personal data; this is off by default.
    pub fn include_values(mut self, enabled: bool) -> Self {
        self.include_values = enabled;
        self
    }

    /// Sets the level of success events.
    pub fn success_level(mut self, level: Level) -> Self {
        self.success_level = level;
        self
    }

    /// The pipeline name attached to every event.
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }
}

impl<Req, Res: Debug> PostProcessor<Req, Res> for LoggingPostProcessor {
    fn on_success(&self, _request: &Req, response: &Res) {
        if !self.log_success {
            return;
        }
        if self.include_values {
            event_at!(
                self.success_level,
                pipeline = %self.pipeline,
                response = ?response,
                "Pipeline succeeded"
            );
        } else {
            event_at!(self.success_level, pipeline = %self.pipeline, "Pipeline succeeded");
        }
    }

    fn on_failure(&self, _request: &Req, failures: &Failures) {
        warn!(
            pipeline = %self.pipeline,
            failure_count = failures.len(),
            "Pipeline failed"
        );
        for failure in failures {
            warn!(
                pipeline = %self.pipeline,
                ui_handle = failure.ui_handle(),
                "{}",
                failure.message()
            );
        }
    }
}
