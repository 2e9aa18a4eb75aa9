//! Verdict Runtime - application setup for Verdict pipelines.
//!
//! This crate provides:
//! - Layered configuration ([`ConfigLoader`], [`VerdictConfig`]) with
//!   validation built on the framework's own [`Validator`](verdict_framework::Validator)
//! - Subscriber setup ([`LoggingBuilder`], [`logging::init_from_config`])
//! - [`PipelineConfig::logging_post_processor`] to wire configured outcome
//!   logging into a pipeline
//!
//! ```ignore
//! use verdict_runtime::{config::load_config, logging};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging)?;
//!
//!     let pipeline = Decorator::new(handler)
//!         .add_post_processor(config.pipeline.logging_post_processor("signup"));
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

// Re-exports
pub use config::{
    ConfigLoader, LoggingConfig, PipelineConfig, Profile, VerdictConfig, load_config,
    validate_config,
};
pub use error::{ConfigError, ConfigResult, LoggingError, LoggingResult};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
