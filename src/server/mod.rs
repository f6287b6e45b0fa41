//! HTTP API server for the gradebook.
//!
//! This module provides an HTTP API on top of the aggregation core using
//! axum. Handlers own identifier parsing and JSON shaping only; all domain
//! logic stays in [`crate::grading`].

mod config;
mod error;
pub mod logging;
mod routes;
mod state;

pub use config::{Config, ConfigError, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, StateError};
