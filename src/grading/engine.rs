//! The score-aggregation pipeline.
//!
//! Raw marks roll up into a final course grade through two stages: summed
//! raw marks are weighted per exam type into the exam-score table, and the
//! exam scores of a (course, student) pair are totaled into the final-score
//! table. Both writes go through the keyed upsert in [`super::upsert`], so
//! re-running a stage with unchanged inputs overwrites the same row instead
//! of duplicating it.

use crate::logging::{debug, info, warn};
use crate::store::{CourseId, ExamTypeId, FinalScore, GradeStore, StudentId};

use super::error::GradeError;
use super::types::{
    CourseRecalculation, CourseTotal, RecalculatedTotal, ScoreSummary, StudentRecalculation,
    WeightedScore,
};
use super::upsert::{upsert, UpsertMode};

/// Grade aggregation engine over an injected store.
pub struct Grader<S> {
    store: S,
}

impl<S: GradeStore> Grader<S> {
    /// Create an engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store, e.g. for seeding raw marks and weights.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sum of all raw marks for an (exam type, student) pair.
    ///
    /// An empty set sums to zero; "no data yet" is not an error here,
    /// unlike the weight lookup in [`Grader::score_exam_type`].
    pub fn component_sum(
        &self,
        exam_type: ExamTypeId,
        student: StudentId,
    ) -> Result<f64, GradeError> {
        Ok(self.store.raw_score_sum(exam_type, student)?)
    }

    /// Score one exam type for a (course, student) pair and upsert the
    /// result into the exam-score table.
    ///
    /// The summed raw marks are multiplied by the configured percentage for
    /// the (course, exam type) pair. A missing weighting rule fails with
    /// [`GradeError::WeightNotConfigured`] before anything is written.
    pub fn score_exam_type(
        &self,
        course: CourseId,
        student: StudentId,
        exam_type: ExamTypeId,
    ) -> Result<WeightedScore, GradeError> {
        let raw_sum = self.component_sum(exam_type, student)?;

        let weight = self
            .store
            .weight(course, exam_type)?
            .ok_or(GradeError::WeightNotConfigured { course, exam_type })?;

        let score = raw_sum * (weight.percentage / 100.0);

        let existing = self.store.exam_score(course, student, exam_type)?;
        let (row, outcome) = upsert(
            existing,
            || crate::store::CourseExamScore {
                course,
                student,
                exam_type,
                score,
            },
            |row| std::mem::replace(&mut row.score, score),
            |row| self.store.put_exam_score(*row),
        )?;

        debug!(
            course,
            student,
            exam_type,
            raw_sum,
            score = row.score,
            operation = outcome.operation(),
            "scored exam type"
        );

        Ok(WeightedScore {
            course,
            student,
            exam_type,
            raw_sum,
            percentage: weight.percentage,
            score: row.score,
            outcome,
        })
    }

    /// Total all exam scores of a (course, student) pair and upsert the
    /// result into the final-score table.
    ///
    /// An empty exam-score set fails with [`GradeError::NoExamScores`]: a
    /// student with no per-exam-type scores has no grade data for the
    /// course, which is not the same as a total of zero. With
    /// [`UpsertMode::UpdateOnly`], a missing final row fails with
    /// [`GradeError::FinalScoreNotFound`] instead of being created.
    ///
    /// Updates keep the row's original creation timestamp and refresh only
    /// the update timestamp.
    pub fn totalize(
        &self,
        course: CourseId,
        student: StudentId,
        mode: UpsertMode,
    ) -> Result<CourseTotal, GradeError> {
        let entries = self.store.exam_scores(course, student)?;
        if entries.is_empty() {
            return Err(GradeError::NoExamScores { course, student });
        }

        let total: f64 = entries.iter().map(|entry| entry.score).sum();
        let average = total / entries.len() as f64;

        let existing = self.store.final_score(course, student)?;
        if existing.is_none() && mode == UpsertMode::UpdateOnly {
            return Err(GradeError::FinalScoreNotFound { course, student });
        }

        let (row, outcome) = upsert(
            existing,
            || FinalScore::new(course, student, total),
            |row| {
                let previous = row.total;
                row.set_total(total);
                previous
            },
            |row| self.store.put_final_score(*row),
        )?;

        debug!(
            course,
            student,
            total,
            operation = outcome.operation(),
            "totalized course score"
        );

        Ok(CourseTotal {
            final_score: row,
            entries,
            average,
            outcome,
        })
    }

    /// Fetch the stored final score for a (course, student) pair.
    pub fn final_report(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<FinalScore, GradeError> {
        self.store
            .final_score(course, student)?
            .ok_or(GradeError::FinalScoreNotFound { course, student })
    }

    /// Store-side sum/count/average over a pair's exam scores.
    ///
    /// The lenient reporting counterpart of [`Grader::totalize`]: zero rows
    /// yields an all-zero summary, and nothing is written.
    pub fn exam_score_summary(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<ScoreSummary, GradeError> {
        let aggregate = self.store.exam_score_totals(course, student)?;
        if aggregate.count == 0 {
            return Ok(ScoreSummary::default());
        }
        Ok(ScoreSummary {
            total: aggregate.sum,
            count: aggregate.count,
            average: aggregate.sum / aggregate.count as f64,
        })
    }

    /// Recompute the final total for every student with exam scores in the
    /// course.
    ///
    /// Entries are processed independently and sequentially; a student whose
    /// recomputation fails is skipped and excluded from the result, and the
    /// batch still succeeds.
    pub fn recalculate_course(&self, course: CourseId) -> Result<CourseRecalculation, GradeError> {
        let students = self.store.students_with_scores(course)?;

        let mut recalculated = Vec::new();
        for student in students {
            match self.totalize(course, student, UpsertMode::CreateOrUpdate) {
                Ok(total) => recalculated.push(RecalculatedTotal {
                    student,
                    total: total.final_score.total,
                    outcome: total.outcome,
                }),
                Err(_error) => {
                    warn!(course, student, error = %_error, "skipping student in course recalculation");
                }
            }
        }

        info!(
            course,
            recalculated = recalculated.len(),
            "course recalculation complete"
        );

        Ok(CourseRecalculation {
            course,
            recalculated,
        })
    }

    /// Rescore every exam type the student has raw marks for, within one
    /// course.
    ///
    /// Exam types come from the student's raw marks across all courses, not
    /// just this one; any exam type without a weighting rule in this course
    /// is skipped rather than failing the batch. Other per-entry failures
    /// are skipped as well.
    pub fn recalculate_student(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<StudentRecalculation, GradeError> {
        let exam_types = self.store.raw_exam_types(student)?;

        let mut scored = Vec::new();
        let mut skipped = Vec::new();
        for exam_type in exam_types {
            match self.score_exam_type(course, student, exam_type) {
                Ok(score) => scored.push(score),
                Err(GradeError::WeightNotConfigured { .. }) => skipped.push(exam_type),
                Err(_error) => {
                    warn!(course, student, exam_type, error = %_error, "skipping exam type in student recalculation");
                }
            }
        }

        info!(
            course,
            student,
            scored = scored.len(),
            skipped = skipped.len(),
            "student recalculation complete"
        );

        Ok(StudentRecalculation {
            course,
            student,
            scored,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Upsert;
    use crate::store::{CourseExamScore, MemoryStore, RawScore, WeightConfig};

    fn grader() -> Grader<MemoryStore> {
        Grader::new(MemoryStore::new())
    }

    fn seed_raw(grader: &Grader<MemoryStore>, student: StudentId, exam_type: ExamTypeId, scores: &[f64]) {
        for &score in scores {
            grader
                .store()
                .append_raw_score(RawScore {
                    student,
                    exam_type,
                    score,
                })
                .unwrap();
        }
    }

    fn seed_weight(grader: &Grader<MemoryStore>, course: CourseId, exam_type: ExamTypeId, percentage: f64) {
        grader
            .store()
            .put_weight(WeightConfig {
                course,
                exam_type,
                percentage,
            })
            .unwrap();
    }

    #[test]
    fn component_sum_of_nothing_is_zero() {
        let grader = grader();
        assert_eq!(grader.component_sum(1, 5).unwrap(), 0.0);
    }

    #[test]
    fn component_sum_adds_every_row() {
        let grader = grader();
        seed_raw(&grader, 5, 1, &[70.0, 80.0, 12.5]);
        seed_raw(&grader, 5, 2, &[1000.0]);
        assert_eq!(grader.component_sum(1, 5).unwrap(), 162.5);
    }

    #[test]
    fn weighted_score_applies_percentage() {
        let grader = grader();
        seed_raw(&grader, 5, 1, &[70.0, 80.0]);
        seed_weight(&grader, 2, 1, 40.0);

        let result = grader.score_exam_type(2, 5, 1).unwrap();
        assert_eq!(result.raw_sum, 150.0);
        assert_eq!(result.percentage, 40.0);
        assert_eq!(result.score, 60.0);
        assert_eq!(result.outcome, Upsert::Created);
    }

    #[test]
    fn weighted_score_rerun_updates_the_same_row() {
        let grader = grader();
        seed_raw(&grader, 5, 1, &[70.0, 80.0]);
        seed_weight(&grader, 2, 1, 40.0);

        grader.score_exam_type(2, 5, 1).unwrap();
        let second = grader.score_exam_type(2, 5, 1).unwrap();

        assert_eq!(second.score, 60.0);
        assert_eq!(second.outcome, Upsert::Updated { previous: 60.0 });
        assert_eq!(second.outcome.delta(second.score), Some(0.0));
        // Still exactly one row at the composite key.
        assert_eq!(grader.store().exam_scores(2, 5).unwrap().len(), 1);
    }

    #[test]
    fn weighted_score_tracks_raw_mark_changes() {
        let grader = grader();
        seed_raw(&grader, 5, 1, &[70.0, 80.0]);
        seed_weight(&grader, 2, 1, 40.0);
        grader.score_exam_type(2, 5, 1).unwrap();

        seed_raw(&grader, 5, 1, &[50.0]);
        let rescored = grader.score_exam_type(2, 5, 1).unwrap();
        assert_eq!(rescored.raw_sum, 200.0);
        assert_eq!(rescored.score, 80.0);
        assert_eq!(rescored.outcome, Upsert::Updated { previous: 60.0 });
        assert_eq!(rescored.outcome.delta(rescored.score), Some(20.0));
    }

    #[test]
    fn missing_weight_fails_without_writing() {
        let grader = grader();
        seed_raw(&grader, 5, 1, &[70.0]);

        let error = grader.score_exam_type(2, 5, 1).unwrap_err();
        assert!(matches!(
            error,
            GradeError::WeightNotConfigured {
                course: 2,
                exam_type: 1
            }
        ));
        assert!(grader.store().exam_scores(2, 5).unwrap().is_empty());
    }

    #[test]
    fn zero_raw_marks_score_to_zero_when_weight_exists() {
        let grader = grader();
        seed_weight(&grader, 2, 1, 40.0);

        let result = grader.score_exam_type(2, 5, 1).unwrap();
        assert_eq!(result.raw_sum, 0.0);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.outcome, Upsert::Created);
    }

    #[test]
    fn totalize_sums_entries_and_reports_average() {
        let grader = grader();
        for (exam_type, score) in [(1, 60.0), (2, 24.0)] {
            grader
                .store()
                .put_exam_score(CourseExamScore {
                    course: 2,
                    student: 5,
                    exam_type,
                    score,
                })
                .unwrap();
        }

        let total = grader.totalize(2, 5, UpsertMode::CreateOrUpdate).unwrap();
        assert_eq!(total.final_score.total, 84.0);
        assert_eq!(total.average, 42.0);
        assert_eq!(total.entries.len(), 2);
        assert_eq!(total.outcome, Upsert::Created);
    }

    #[test]
    fn totalize_rerun_reports_update_with_zero_delta() {
        let grader = grader();
        grader
            .store()
            .put_exam_score(CourseExamScore {
                course: 2,
                student: 5,
                exam_type: 1,
                score: 84.0,
            })
            .unwrap();

        grader.totalize(2, 5, UpsertMode::CreateOrUpdate).unwrap();
        let second = grader.totalize(2, 5, UpsertMode::CreateOrUpdate).unwrap();

        assert_eq!(second.final_score.total, 84.0);
        assert_eq!(second.outcome, Upsert::Updated { previous: 84.0 });
        assert_eq!(second.outcome.delta(second.final_score.total), Some(0.0));
    }

    #[test]
    fn totalize_with_no_entries_is_an_error() {
        let grader = grader();
        let error = grader
            .totalize(2, 5, UpsertMode::CreateOrUpdate)
            .unwrap_err();
        assert!(matches!(
            error,
            GradeError::NoExamScores {
                course: 2,
                student: 5
            }
        ));
        assert!(grader.store().final_score(2, 5).unwrap().is_none());
    }

    #[test]
    fn update_only_totalize_requires_an_existing_row() {
        let grader = grader();
        grader
            .store()
            .put_exam_score(CourseExamScore {
                course: 2,
                student: 5,
                exam_type: 1,
                score: 60.0,
            })
            .unwrap();

        let error = grader.totalize(2, 5, UpsertMode::UpdateOnly).unwrap_err();
        assert!(matches!(error, GradeError::FinalScoreNotFound { .. }));
        assert!(grader.store().final_score(2, 5).unwrap().is_none());

        grader.totalize(2, 5, UpsertMode::CreateOrUpdate).unwrap();
        let updated = grader.totalize(2, 5, UpsertMode::UpdateOnly).unwrap();
        assert_eq!(updated.outcome, Upsert::Updated { previous: 60.0 });
    }

    #[test]
    fn totalize_update_preserves_creation_timestamp() {
        let grader = grader();
        grader
            .store()
            .put_exam_score(CourseExamScore {
                course: 2,
                student: 5,
                exam_type: 1,
                score: 60.0,
            })
            .unwrap();
        grader
            .store()
            .put_final_score(FinalScore {
                course: 2,
                student: 5,
                total: 10.0,
                created_at: 1000,
                updated_at: 1000,
            })
            .unwrap();

        let total = grader.totalize(2, 5, UpsertMode::CreateOrUpdate).unwrap();
        assert_eq!(total.final_score.created_at, 1000);
        assert!(total.final_score.updated_at > 1000);
        assert_eq!(total.outcome, Upsert::Updated { previous: 10.0 });
    }

    #[test]
    fn final_report_requires_a_stored_row() {
        let grader = grader();
        assert!(matches!(
            grader.final_report(2, 5),
            Err(GradeError::FinalScoreNotFound { .. })
        ));

        grader
            .store()
            .put_final_score(FinalScore::new(2, 5, 84.0))
            .unwrap();
        assert_eq!(grader.final_report(2, 5).unwrap().total, 84.0);
    }

    #[test]
    fn summary_of_nothing_is_all_zeros() {
        let grader = grader();
        let summary = grader.exam_score_summary(2, 5).unwrap();
        assert_eq!(summary, ScoreSummary::default());
    }

    #[test]
    fn summary_reports_sum_count_and_average() {
        let grader = grader();
        for (exam_type, score) in [(1, 60.0), (2, 24.0)] {
            grader
                .store()
                .put_exam_score(CourseExamScore {
                    course: 2,
                    student: 5,
                    exam_type,
                    score,
                })
                .unwrap();
        }

        let summary = grader.exam_score_summary(2, 5).unwrap();
        assert_eq!(summary.total, 84.0);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, 42.0);
    }

    #[test]
    fn course_recalculation_covers_every_student() {
        let grader = grader();
        for (student, score) in [(5, 60.0), (6, 30.0), (7, 90.0)] {
            grader
                .store()
                .put_exam_score(CourseExamScore {
                    course: 2,
                    student,
                    exam_type: 1,
                    score,
                })
                .unwrap();
        }
        // Student 5 already has a total; the others do not.
        grader.totalize(2, 5, UpsertMode::CreateOrUpdate).unwrap();

        let report = grader.recalculate_course(2).unwrap();
        assert_eq!(report.course, 2);
        assert_eq!(report.recalculated.len(), 3);

        let by_student: Vec<_> = report
            .recalculated
            .iter()
            .map(|r| (r.student, r.total, r.outcome.is_created()))
            .collect();
        assert_eq!(
            by_student,
            vec![(5, 60.0, false), (6, 30.0, true), (7, 90.0, true)]
        );
    }

    #[test]
    fn student_recalculation_skips_unconfigured_exam_types() {
        let grader = grader();
        seed_raw(&grader, 5, 1, &[70.0, 80.0]);
        seed_raw(&grader, 5, 2, &[40.0]);
        seed_raw(&grader, 5, 3, &[90.0]);
        seed_weight(&grader, 2, 1, 40.0);
        seed_weight(&grader, 2, 3, 10.0);

        let report = grader.recalculate_student(2, 5).unwrap();
        assert_eq!(report.skipped, vec![2]);
        assert_eq!(report.scored.len(), 2);

        let scores: Vec<_> = report
            .scored
            .iter()
            .map(|s| (s.exam_type, s.score))
            .collect();
        assert_eq!(scores, vec![(1, 60.0), (3, 9.0)]);

        // The derived rows landed in the exam-score table.
        assert_eq!(grader.store().exam_scores(2, 5).unwrap().len(), 2);
    }
}
