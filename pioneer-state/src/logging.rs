//! Logging setup for binaries built on the Pioneer crates
//!
//! The library crates only emit `tracing` events. A binary calls one of the
//! initializers here once at startup; output always goes to stderr so it never
//! mixes with data a command prints on stdout.
//!
//! The filter is resolved in this order:
//!
//! 1. an explicit filter passed to [`init_logging_with_filter`]
//! 2. `PIONEER_LOG_LEVEL`
//! 3. `RUST_LOG`
//! 4. the mode's default (`info` for development, `debug` for debug)

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// How much a binary logs and in what shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact lines without targets
    #[default]
    Development,
    /// Targets, source locations and wire traffic
    Debug,
}

impl LoggingMode {
    fn default_filter(self) -> &'static str {
        match self {
            LoggingMode::Silent => "off",
            LoggingMode::Development => "info",
            LoggingMode::Debug => "debug",
        }
    }
}

impl FromStr for LoggingMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LoggingMode::Silent),
            "development" | "dev" => Ok(LoggingMode::Development),
            "debug" => Ok(LoggingMode::Debug),
            other => Err(format!(
                "unknown logging mode '{}', expected silent, development or debug",
                other
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Install a subscriber for `mode` using the environment or the mode default
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    init_logging_with_filter(mode, None)
}

/// Install a subscriber for `mode`, preferring `filter` over the environment
///
/// `filter` takes `EnvFilter` directives such as `debug` or
/// `warn,telnet_client=trace`.
pub fn init_logging_with_filter(mode: LoggingMode, filter: Option<&str>) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    if mode == LoggingMode::Silent {
        return Ok(());
    }

    let directive = filter_directive(
        filter,
        std::env::var("PIONEER_LOG_LEVEL").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        mode,
    );
    let env_filter = build_filter(&directive)?;

    let result = match mode {
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(env_filter)
            .try_init(),
        _ => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .with(env_filter)
            .try_init(),
    };
    result.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Install a subscriber for the mode named by `PIONEER_LOG_MODE`
///
/// An unset or unrecognised value means silent.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var("PIONEER_LOG_MODE")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LoggingMode::Silent);
    init_logging(mode)
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

fn filter_directive(
    explicit: Option<&str>,
    pioneer_log_level: Option<&str>,
    rust_log: Option<&str>,
    mode: LoggingMode,
) -> String {
    [explicit, pioneer_log_level, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or(mode.default_filter())
        .to_string()
}

fn build_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}
