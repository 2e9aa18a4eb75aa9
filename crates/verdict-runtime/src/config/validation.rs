//! Configuration validation.
//!
//! Configuration is checked with the same [`Validator`] applications use for
//! their requests, so every problem is reported at once, each tagged with the
//! dotted key it concerns.

use verdict_core::Failure;
use verdict_framework::{Rule, Validator};

use super::schema::{LogFormat, LogOutput, VerdictConfig};
use crate::error::{ConfigError, ConfigResult};

/// Returns the validator applied by [`validate_config`].
pub fn config_validator() -> Validator<VerdictConfig> {
    Validator::new()
        .rule(
            Rule::with_failure(Failure::with_handle(
                "file output requires a file path",
                "logging.file_path",
            ))
            .named("file_path_required")
            .invalid_when(|c: &VerdictConfig| {
                c.logging.output == LogOutput::File && c.logging.file_path.is_none()
            }),
        )
        .rule(
            Rule::with_failure(Failure::with_handle(
                "at least one rotated file must be kept",
                "logging.max_files",
            ))
            .named("max_files_positive")
            .invalid_when(|c: &VerdictConfig| c.logging.max_files == Some(0)),
        )
        .rule(
            Rule::new(|c: &VerdictConfig| {
                Failure::with_handle(
                    format!("invalid filter targets: {}", invalid_targets(c).join(", ")),
                    "logging.filters",
                )
            })
            .named("filter_targets")
            .invalid_when(|c: &VerdictConfig| !invalid_targets(c).is_empty()),
        )
        .rule(
            Rule::with_failure(Failure::with_handle(
                "json format requires the `json-log` feature",
                "logging.format",
            ))
            .named("json_feature")
            .invalid_when(|c: &VerdictConfig| c.logging.format == LogFormat::Json)
            .except_when(|_: &VerdictConfig| cfg!(feature = "json-log")),
        )
}

fn invalid_targets(config: &VerdictConfig) -> Vec<&str> {
    config
        .logging
        .filters
        .keys()
        .filter(|target| !is_valid_target(target))
        .map(String::as_str)
        .collect()
}

/// A filter target is a module path such as `verdict_framework::decorator`.
fn is_valid_target(target: &str) -> bool {
    !target.is_empty()
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '-')
}

/// Validates the entire configuration.
pub fn validate_config(config: &VerdictConfig) -> ConfigResult<()> {
    config_validator()
        .validate(config)
        .into_result()
        .map_err(ConfigError::Invalid)
}
