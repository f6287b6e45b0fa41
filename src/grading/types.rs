//! Result records returned by the aggregation core.
//!
//! These are plain values; the HTTP layer shapes them into JSON.

use crate::store::{CourseExamScore, CourseId, ExamTypeId, FinalScore, StudentId};

use super::upsert::Upsert;

/// Result of scoring one exam type for a (course, student) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedScore {
    pub course: CourseId,
    pub student: StudentId,
    pub exam_type: ExamTypeId,
    /// Sum of the raw marks before weighting.
    pub raw_sum: f64,
    /// Percentage applied, on a 0-100 scale.
    pub percentage: f64,
    /// Weighted score written to the exam-score table.
    pub score: f64,
    /// Which write branch ran, with the overwritten score if any.
    pub outcome: Upsert<f64>,
}

/// Result of totalizing all exam scores of a (course, student) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseTotal {
    /// The final score row as persisted.
    pub final_score: FinalScore,
    /// The exam-score rows that contributed to the total.
    pub entries: Vec<CourseExamScore>,
    /// total / entry count; informational only, not persisted.
    pub average: f64,
    /// Which write branch ran, with the overwritten total if any.
    pub outcome: Upsert<f64>,
}

/// Read-only aggregate over a (course, student) pair's exam scores.
///
/// Zero rows yields all-zero fields rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreSummary {
    pub total: f64,
    pub count: u64,
    pub average: f64,
}

/// Per-student outcome of a course-wide recalculation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecalculatedTotal {
    pub student: StudentId,
    pub total: f64,
    pub outcome: Upsert<f64>,
}

/// Result of recomputing final totals for every student in a course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecalculation {
    pub course: CourseId,
    /// Outcomes for the students that recomputed cleanly; failed entries are
    /// skipped and excluded.
    pub recalculated: Vec<RecalculatedTotal>,
}

/// Result of rescoring every exam type a student has raw marks for.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecalculation {
    pub course: CourseId,
    pub student: StudentId,
    /// Outcomes for the exam types that scored cleanly.
    pub scored: Vec<WeightedScore>,
    /// Exam types with no weighting rule in this course.
    pub skipped: Vec<ExamTypeId>,
}
