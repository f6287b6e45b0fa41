//! Weighted course-score aggregation backend.
//!
//! Raw exam-component marks roll up into a final course grade through two
//! stages: per-exam-type sums are weighted by a configured percentage into
//! course exam scores, and those are totaled into one final score per
//! (course, student). Derived rows are kept consistent through keyed
//! upserts, so recomputing with unchanged inputs overwrites in place.
//!
//! # Quick Start
//!
//! ```ignore
//! use gradebook::prelude::*;
//!
//! let grader = Grader::new(MemoryStore::new());
//! grader.store().put_weight(WeightConfig { course: 2, exam_type: 1, percentage: 40.0 })?;
//! grader.store().append_raw_score(RawScore { student: 5, exam_type: 1, score: 70.0 })?;
//! grader.store().append_raw_score(RawScore { student: 5, exam_type: 1, score: 80.0 })?;
//!
//! let scored = grader.score_exam_type(2, 5, 1)?;
//! assert_eq!(scored.score, 60.0);
//!
//! let total = grader.totalize(2, 5, UpsertMode::CreateOrUpdate)?;
//! assert_eq!(total.final_score.total, 60.0);
//! ```
//!
//! # Modules
//!
//! - [`grading`] - The aggregation pipeline and upsert policy (always available)
//! - [`store`] - Persistence interface with in-memory and fjall backends
//! - `server` - HTTP API on top of the grader (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `store` - Enable the fjall-backed persistent store (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `server` - Enable the HTTP API server
//! - `full` - Enable all features

pub mod grading;
mod logging;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod store;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export core types at crate root for convenience
pub use grading::{
    CourseRecalculation, CourseTotal, GradeError, Grader, RecalculatedTotal, ScoreSummary,
    StudentRecalculation, Upsert, UpsertMode, WeightedScore,
};
pub use store::{
    CourseExamScore, CourseId, ExamTypeId, FinalScore, GradeStore, MemoryStore, RawScore,
    ScoreAggregate, StoreError, StudentId, WeightConfig,
};

#[cfg(feature = "store")]
pub use store::FjallStore;
