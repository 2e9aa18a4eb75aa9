//! Runtime error types.

use std::path::PathBuf;

use thiserror::Error;
use verdict_core::Failures;

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found at the specified path.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file extension is unknown or its format feature is disabled.
    #[error("Unsupported or disabled configuration file format: .{0}")]
    UnsupportedFormat(String),

    /// A source could not be read or did not match the schema.
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// The configuration was read but contains invalid values.
    #[error("Invalid configuration: {0}")]
    Invalid(Failures),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while installing the global subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),

    /// The log file could not be opened.
    #[error("Failed to open log file: {0}")]
    File(#[from] tracing_appender::rolling::InitError),
}

/// Result type for logging setup.
pub type LoggingResult<T> = Result<T, LoggingError>;
