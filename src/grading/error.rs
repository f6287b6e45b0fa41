//! Error types for the aggregation core.

use thiserror::Error;

use crate::store::{CourseId, ExamTypeId, StoreError, StudentId};

/// Errors that can occur while computing or persisting grades.
///
/// The not-found variants are authoritative "cannot score" answers, distinct
/// from the store-level failures wrapped by [`GradeError::Store`].
#[derive(Error, Debug)]
pub enum GradeError {
    /// No weighting rule exists for the (course, exam type) pair. A course
    /// without a configured weight cannot produce a score; this is a
    /// configuration error, not a zero-score case.
    #[error("no weight configured for exam type {exam_type} in course {course}")]
    WeightNotConfigured {
        course: CourseId,
        exam_type: ExamTypeId,
    },

    /// The student has no derived exam scores in the course, so there is no
    /// grade data to total.
    #[error("no exam scores recorded for student {student} in course {course}")]
    NoExamScores {
        course: CourseId,
        student: StudentId,
    },

    /// No final score row exists for the (course, student) pair.
    #[error("no final score recorded for student {student} in course {course}")]
    FinalScoreNotFound {
        course: CourseId,
        student: StudentId,
    },

    /// The persistence layer failed; surfaced verbatim, never retried.
    #[error(transparent)]
    Store(#[from] StoreError),
}
