//! Logging initialization and configuration.

use std::io::{self, IsTerminal};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::config::{LogFormat, LoggingConfig};

/// Initialize the tracing subscriber based on configuration.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    match (config.format, config.output.as_str()) {
        (LogFormat::Text, "stdout") => {
            let layer = fmt::layer()
                .with_ansi(io::stdout().is_terminal())
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stdout);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Text, _) => {
            let layer = fmt::layer()
                .with_ansi(io::stderr().is_terminal())
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Json, "stdout") => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stdout);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Json, _) => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }

    Ok(())
}

/// Errors that can occur during logging initialization.
#[derive(Debug)]
pub enum LoggingError {
    /// Invalid log filter string.
    InvalidFilter(String),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter(msg) => write!(f, "Invalid log filter: {}", msg),
        }
    }
}

impl std::error::Error for LoggingError {}
