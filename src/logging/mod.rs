//! Tracing subscriber setup
//!
//! Production runs emit JSON lines; every other environment gets ANSI output
//! meant for a terminal. `RUST_LOG` overrides the default `info` filter.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber for the environment named by `APP_ENV`.
pub fn init_logging() {
    init_logging_for(&get_environment());
}

/// Install the global subscriber for an explicit environment name.
///
/// Returns `false` when a subscriber was already installed (e.g. a second
/// binary entry point in the same process).
pub fn init_logging_for(environment: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if matches!(environment, "production" | "prod") {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_writer(std::io::stdout),
            )
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init()
            .is_ok()
    }
}
