//! Application state management.

use std::sync::Arc;

use crate::grading::Grader;
use crate::store::{FjallStore, StoreError};

use super::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    grader: Arc<Grader<FjallStore>>,
}

impl AppState {
    /// Create a new AppState from configuration, opening the grade store.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let path = std::path::Path::new(&config.database.path);
        let store = FjallStore::open(path).map_err(|source| StateError::OpenStore {
            path: config.database.path.clone(),
            source,
        })?;

        Ok(Self {
            grader: Arc::new(Grader::new(store)),
        })
    }

    /// The grade aggregation engine.
    pub fn grader(&self) -> &Grader<FjallStore> {
        &self.grader
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open the grade store.
    OpenStore { path: String, source: StoreError },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::OpenStore { path, source } => {
                write!(f, "Failed to open grade store at '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for StateError {}
