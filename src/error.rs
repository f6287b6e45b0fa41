//! Unified error type for the gradebook library.

use thiserror::Error;

use crate::grading::GradeError;
use crate::store::StoreError;

/// Unified error type for all gradebook operations.
///
/// Wraps the module-specific error types so application code can use a
/// single error type throughout.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the aggregation core.
    #[error(transparent)]
    Grade(#[from] GradeError),

    /// Error from the persistence layer.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
