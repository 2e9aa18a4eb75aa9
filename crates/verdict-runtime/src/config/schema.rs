//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use verdict_framework::LoggingPostProcessor;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VerdictConfig {
    /// Subscriber setup.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pipeline behaviour.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every pipeline stage transition.
    Trace,
    /// Pipeline spans and completions.
    Debug,
    /// Application events.
    #[default]
    Info,
    /// Rejected requests and recoverable problems.
    Warn,
    /// Faults only.
    Error,
}

impl LogLevel {
    /// Returns the level name as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Newline-delimited JSON. Requires the `json-log` feature.
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// A file at [`LoggingConfig::file_path`].
    File,
}

/// How often the log file is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Minutely,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for every target.
    pub level: LogLevel,

    /// Line format.
    pub format: LogFormat,

    /// Destination of log lines.
    pub output: LogOutput,

    /// Span lifecycle events to log; none by default.
    pub span_events: SpanEventConfig,

    /// Per-target levels, e.g. `verdict_framework = "trace"`.
    pub filters: BTreeMap<String, LogLevel>,

    /// Include thread ids in each line.
    pub thread_ids: bool,

    /// Include source file and line number in each line.
    pub file_location: bool,

    /// Log file, required when `output` is `file`.
    pub file_path: Option<PathBuf>,

    /// Rotation period of the log file.
    pub rotation: LogRotation,

    /// Rotated files to keep; unlimited when unset.
    pub max_files: Option<usize>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            span_events: SpanEventConfig::default(),
            filters: BTreeMap::new(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            rotation: LogRotation::Never,
            max_files: None,
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Settings for the pipelines an application builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Log successful outcomes, not only failures.
    #[serde(default = "default_log_success")]
    pub log_success: bool,

    /// Include the `Debug` rendering of responses in success events.
    #[serde(default)]
    pub include_values: bool,

    /// Level of success events.
    #[serde(default = "default_success_level")]
    pub success_level: LogLevel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_success: default_log_success(),
            include_values: false,
            success_level: default_success_level(),
        }
    }
}

fn default_log_success() -> bool {
    true
}

fn default_success_level() -> LogLevel {
    LogLevel::Debug
}

impl PipelineConfig {
    /// Builds a [`LoggingPostProcessor`] for the named pipeline.
    pub fn logging_post_processor(&self, pipeline: impl Into<String>) -> LoggingPostProcessor {
        LoggingPostProcessor::new(pipeline)
            .log_success(self.log_success)
            .include_values(self.include_values)
            .success_level(self.success_level.to_tracing_level())
    }
}
