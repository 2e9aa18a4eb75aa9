//! Configuration module for Verdict applications.
//!
//! This module provides layered configuration loading (files, environment,
//! programmatic overrides) and validation for logging and pipeline settings.

pub mod loader;
pub mod schema;
pub mod validation;

pub use crate::error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, PipelineConfig, SpanEventConfig,
    VerdictConfig,
};
pub use validation::{config_validator, validate_config};
