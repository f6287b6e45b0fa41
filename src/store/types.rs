//! Record types persisted by the grade store.

/// Identifier of a course.
pub type CourseId = u64;
/// Identifier of a student.
pub type StudentId = u64;
/// Identifier of an exam type (midterm, quiz, ...).
pub type ExamTypeId = u64;

/// One raw mark for a student on an exam type.
///
/// Many rows may exist per (student, exam type) pair; they are summed by the
/// aggregation core, never deduplicated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawScore {
    pub student: StudentId,
    pub exam_type: ExamTypeId,
    pub score: f64,
}

/// Weighting rule for one exam type within a course.
///
/// Exactly one row is expected per (course, exam type) pair; the percentage
/// is on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightConfig {
    pub course: CourseId,
    pub exam_type: ExamTypeId,
    pub percentage: f64,
}

/// Derived weighted score for one exam type of a (course, student) pair.
///
/// At most one row per (course, student, exam type) key; the invariant is
/// enforced by lookup-before-write, not by a storage constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseExamScore {
    pub course: CourseId,
    pub student: StudentId,
    pub exam_type: ExamTypeId,
    pub score: f64,
}

/// Derived final score for a (course, student) pair.
///
/// At most one row per key. Updates keep the original creation timestamp and
/// only advance `updated_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalScore {
    pub course: CourseId,
    pub student: StudentId,
    pub total: f64,
    /// Unix timestamp of creation.
    pub created_at: u64,
    /// Unix timestamp of the last write.
    pub updated_at: u64,
}

impl FinalScore {
    /// Create a new final score row with both timestamps set to now.
    pub fn new(course: CourseId, student: StudentId, total: f64) -> Self {
        let now = unix_now();
        Self {
            course,
            student,
            total,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the total in place, refreshing only the update timestamp.
    pub fn set_total(&mut self, total: f64) {
        self.total = total;
        self.updated_at = unix_now();
    }
}

/// Database-side aggregate over a set of score rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreAggregate {
    pub sum: f64,
    pub count: u64,
}

/// Current unix timestamp in seconds.
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
