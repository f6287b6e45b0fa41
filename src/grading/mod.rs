//! Score-aggregation core.
//!
//! This module owns the domain logic: summing raw marks per exam type,
//! weighting them into per-exam-type course scores, totaling those into one
//! final score per (course, student), and the bulk recompute loops that
//! repair derived rows after raw data changes upstream. It consumes any
//! [`crate::store::GradeStore`] implementation and produces plain result
//! values; transport concerns live in the server module.

mod engine;
mod error;
mod types;
mod upsert;

pub use engine::Grader;
pub use error::GradeError;
pub use types::{
    CourseRecalculation, CourseTotal, RecalculatedTotal, ScoreSummary, StudentRecalculation,
    WeightedScore,
};
pub use upsert::{Upsert, UpsertMode};
