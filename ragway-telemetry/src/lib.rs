//! # ragway-telemetry
//!
//! Logging setup for ragway binaries.
//!
//! Installs a global `tracing` subscriber filtered by `RUST_LOG` (default
//! `info`) that writes either human-readable or JSON lines to stderr.
//!
//! ```rust,ignore
//! ragway_telemetry::init_telemetry("ragway")?;
//! tracing::info!(port = 8080, "listening");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt as fmt_layer};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, one event per line.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Initialize human-readable logging for `service_name`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry(service_name: &str) -> Result<(), TryInitError> {
    init_with_format(service_name, LogFormat::Pretty)
}

/// Initialize logging for `service_name` in the given format.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_with_format(service_name: &str, format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(fmt_layer::layer().with_target(true)).try_init()?,
        LogFormat::Json => registry
            .with(fmt_layer::layer().json().with_current_span(true).with_span_list(false))
            .try_init()?,
    }

    tracing::info!(service.name = service_name, log.format = %format, "telemetry initialized");
    Ok(())
}
