//! Signup Demo
//!
//! Runs a signup request through a Verdict pipeline:
//!
//! ```text
//! SignupRequest
//! └── Validator (format rules, aggregated)
//!     └── Registry check (async, email uniqueness)
//!         └── create_account handler
//!             └── LoggingPostProcessor (configured from verdict.toml)
//! ```
//!
//! Every failing rule is reported at once, each tagged with the form field
//! it belongs to.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package signup -- --email ada@example.com --password correct-horse
//! cargo run --package signup -- --email taken@example.com --password short --async
//! VERDICT_LOGGING__LEVEL=trace cargo run --package signup -- --email x --password y
//! ```

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use tracing::{error, info};
use verdict::prelude::*;
use verdict::runtime::logging;

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(about = "Validate and register a user account")]
struct Args {
    /// Email address to register.
    #[arg(long)]
    email: String,

    /// Account password.
    #[arg(long)]
    password: String,

    /// Optional display name.
    #[arg(long)]
    name: Option<String>,

    /// Configuration profile (development, production, test or custom).
    #[arg(long)]
    profile: Option<String>,

    /// Explicit configuration file, bypassing the search paths.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the asynchronous pipeline with a registry lookup.
    #[arg(long = "async")]
    run_async: bool,

    /// Give up on the asynchronous pipeline after this many milliseconds.
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,
}

// ============================================================================
// Domain
// ============================================================================

#[derive(Debug, Clone)]
struct SignupRequest {
    email: String,
    password: String,
    name: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    email: String,
    display_name: String,
}

fn signup_validator() -> Validator<SignupRequest> {
    Validator::new()
        .rule(
            Rule::with_failure(Failure::with_handle("Email is required", "email"))
                .named("email_required")
                .invalid_when(|r: &SignupRequest| r.email.trim().is_empty()),
        )
        .rule(
            Rule::with_failure(Failure::with_handle("Email is not valid", "email"))
                .named("email_format")
                .invalid_when(|r: &SignupRequest| !r.email.contains('@'))
                .except_when(|r: &SignupRequest| r.email.trim().is_empty()),
        )
        .rule(
            Rule::with_failure(Failure::with_handle(
                "Password must be at least 8 characters",
                "password",
            ))
            .named("password_length")
            .invalid_when(|r: &SignupRequest| r.password.chars().count() < 8),
        )
        .rule(
            Rule::new(|r: &SignupRequest| {
                Failure::with_handle(
                    format!("Password must not contain the email '{}'", r.email),
                    "password",
                )
            })
            .named("password_not_email")
            .invalid_when(|r: &SignupRequest| r.password.contains(r.email.as_str()))
            .except_when(|r: &SignupRequest| r.email.is_empty()),
        )
}

fn create_account(request: &SignupRequest) -> Outcome<Account> {
    let local_part = request.email.split('@').next().unwrap_or_default();
    Outcome::ok(Account {
        email: request.email.clone(),
        display_name: request
            .name
            .clone()
            .unwrap_or_else(|| local_part.to_string()),
    })
}

// ============================================================================
// Registry (async validator)
// ============================================================================

/// Stands in for a user store that has to be queried over the network.
struct Registry {
    taken: HashSet<String>,
    latency: Duration,
}

impl Registry {
    fn new() -> Self {
        Self {
            taken: ["taken@example.com", "admin@example.com"]
                .into_iter()
                .map(String::from)
                .collect(),
            latency: Duration::from_millis(50),
        }
    }
}

#[async_trait]
impl AsyncRequestValidator<SignupRequest> for Registry {
    async fn validate(&self, request: &SignupRequest) -> Outcome {
        tokio::time::sleep(self.latency).await;
        if self.taken.contains(&request.email.to_lowercase()) {
            Outcome::fail(Failure::with_handle(
                "An account with this email already exists",
                "email",
            ))
        } else {
            Outcome::success()
        }
    }
}

// ============================================================================
// Output
// ============================================================================

fn report(outcome: Outcome<Account>) {
    match outcome.into_result() {
        Ok(account) => {
            info!(email = %account.email, "Account created");
            println!("Welcome, {}!", account.display_name);
        }
        Err(failures) => {
            error!(count = failures.len(), "Signup rejected");
            for failure in &failures {
                println!(
                    "  [{}] {}",
                    failure.ui_handle().unwrap_or("form"),
                    failure.message()
                );
            }
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let config = loader.load()?;
    logging::init_from_config(&config.logging)?;

    let request = SignupRequest {
        email: args.email,
        password: args.password,
        name: args.name,
    };

    if args.run_async {
        let pipeline = AsyncDecorator::new(Blocking(handler_fn(create_account)))
            .named("signup")
            .add_request_validator(signup_validator())
            .add_async_request_validator(Registry::new())
            .add_post_processor(config.pipeline.logging_post_processor("signup"));

        let token = CancellationToken::new();
        let deadline = token.clone();
        let timeout = Duration::from_millis(args.timeout_ms);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            deadline.cancel();
        });

        match pipeline.handle_cancellable(&request, token).await {
            Ok(outcome) => report(outcome),
            Err(e) => {
                error!("Signup aborted: {}", e);
                return Err(e.into());
            }
        }
    } else {
        let pipeline = Decorator::new(handler_fn(create_account))
            .named("signup")
            .add_request_validator(signup_validator())
            .add_post_processor(config.pipeline.logging_post_processor("signup"));

        report(pipeline.handle(&request));
    }

    Ok(())
}
