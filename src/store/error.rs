//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "store")]
    #[error("fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("corrupt record at key '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("store version mismatch: expected {expected}, got {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

impl StoreError {
    /// Build a corrupt-record error for the given key.
    pub(crate) fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
