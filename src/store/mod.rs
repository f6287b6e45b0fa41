//! Persistence layer for grade records.
//!
//! This module defines the [`GradeStore`] interface consumed by the
//! aggregation core, plus two implementations: [`FjallStore`], a persistent
//! store backed by fjall (requires the `store` feature), and [`MemoryStore`],
//! an in-memory store usable as a drop-in fake in tests.

#[cfg(feature = "store")]
mod codec;
mod error;
#[cfg(feature = "store")]
mod fjall;
mod memory;
mod types;

pub use error::StoreError;
#[cfg(feature = "store")]
pub use self::fjall::FjallStore;
pub use memory::MemoryStore;
pub use types::{
    CourseExamScore, CourseId, ExamTypeId, FinalScore, RawScore, ScoreAggregate, StudentId,
    WeightConfig,
};

/// Storage interface consumed by the aggregation core.
///
/// Implementations provide point lookups by composite business key,
/// sum/count aggregates, distinct-value listings, and keyed writes. The
/// create-vs-update branch of an upsert is decided by the caller via
/// lookup-before-write; `put_*` methods insert or overwrite at the key.
pub trait GradeStore {
    /// Append one raw mark. Rows are never deduplicated.
    fn append_raw_score(&self, score: RawScore) -> Result<(), StoreError>;

    /// Sum of all raw marks for an (exam type, student) pair. Empty set sums
    /// to zero.
    fn raw_score_sum(&self, exam_type: ExamTypeId, student: StudentId) -> Result<f64, StoreError>;

    /// Distinct exam types with at least one raw mark for the student,
    /// regardless of course.
    fn raw_exam_types(&self, student: StudentId) -> Result<Vec<ExamTypeId>, StoreError>;

    /// Insert or overwrite the weighting rule for a (course, exam type) pair.
    fn put_weight(&self, weight: WeightConfig) -> Result<(), StoreError>;

    /// Look up the weighting rule for a (course, exam type) pair.
    fn weight(
        &self,
        course: CourseId,
        exam_type: ExamTypeId,
    ) -> Result<Option<WeightConfig>, StoreError>;

    /// Look up the derived exam score at a (course, student, exam type) key.
    fn exam_score(
        &self,
        course: CourseId,
        student: StudentId,
        exam_type: ExamTypeId,
    ) -> Result<Option<CourseExamScore>, StoreError>;

    /// Insert or overwrite a derived exam score at its key.
    fn put_exam_score(&self, score: CourseExamScore) -> Result<(), StoreError>;

    /// All derived exam scores for a (course, student) pair. Row order is
    /// not part of the contract.
    fn exam_scores(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<Vec<CourseExamScore>, StoreError>;

    /// Sum and count of the derived exam scores for a (course, student)
    /// pair, computed store-side without materializing rows.
    fn exam_score_totals(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<ScoreAggregate, StoreError>;

    /// Distinct students with at least one derived exam score in the course.
    fn students_with_scores(&self, course: CourseId) -> Result<Vec<StudentId>, StoreError>;

    /// Look up the final score at a (course, student) key.
    fn final_score(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<Option<FinalScore>, StoreError>;

    /// Insert or overwrite a final score at its key.
    fn put_final_score(&self, score: FinalScore) -> Result<(), StoreError>;
}
