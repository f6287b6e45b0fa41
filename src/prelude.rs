//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use gradebook::prelude::*;
//!
//! let grader = Grader::new(MemoryStore::new());
//! let scored = grader.score_exam_type(2, 5, 1)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Aggregation core
pub use crate::grading::{
    CourseRecalculation, CourseTotal, GradeError, Grader, RecalculatedTotal, ScoreSummary,
    StudentRecalculation, Upsert, UpsertMode, WeightedScore,
};

// Store interface and records
pub use crate::store::{
    CourseExamScore, CourseId, ExamTypeId, FinalScore, GradeStore, MemoryStore, RawScore,
    ScoreAggregate, StoreError, StudentId, WeightConfig,
};

// Persistent store (requires "store" feature)
#[cfg(feature = "store")]
pub use crate::store::FjallStore;
