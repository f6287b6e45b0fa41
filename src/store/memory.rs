//! In-memory store implementation.
//!
//! Backs unit tests and any consumer that wants the aggregation core without
//! a database on disk. Same observable behavior as the fjall store, including
//! sorted distinct listings.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::error::StoreError;
use super::types::{
    CourseExamScore, CourseId, ExamTypeId, FinalScore, RawScore, ScoreAggregate, StudentId,
    WeightConfig,
};
use super::GradeStore;

#[derive(Debug, Default)]
struct Tables {
    raw_scores: Vec<RawScore>,
    weights: BTreeMap<(CourseId, ExamTypeId), f64>,
    exam_scores: BTreeMap<(CourseId, StudentId, ExamTypeId), f64>,
    finals: BTreeMap<(CourseId, StudentId), FinalScore>,
}

/// In-memory grade store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GradeStore for MemoryStore {
    fn append_raw_score(&self, score: RawScore) -> Result<(), StoreError> {
        self.lock().raw_scores.push(score);
        Ok(())
    }

    fn raw_score_sum(&self, exam_type: ExamTypeId, student: StudentId) -> Result<f64, StoreError> {
        Ok(self
            .lock()
            .raw_scores
            .iter()
            .filter(|r| r.exam_type == exam_type && r.student == student)
            .map(|r| r.score)
            .sum())
    }

    fn raw_exam_types(&self, student: StudentId) -> Result<Vec<ExamTypeId>, StoreError> {
        let distinct: BTreeSet<ExamTypeId> = self
            .lock()
            .raw_scores
            .iter()
            .filter(|r| r.student == student)
            .map(|r| r.exam_type)
            .collect();
        Ok(distinct.into_iter().collect())
    }

    fn put_weight(&self, weight: WeightConfig) -> Result<(), StoreError> {
        self.lock()
            .weights
            .insert((weight.course, weight.exam_type), weight.percentage);
        Ok(())
    }

    fn weight(
        &self,
        course: CourseId,
        exam_type: ExamTypeId,
    ) -> Result<Option<WeightConfig>, StoreError> {
        Ok(self
            .lock()
            .weights
            .get(&(course, exam_type))
            .map(|&percentage| WeightConfig {
                course,
                exam_type,
                percentage,
            }))
    }

    fn exam_score(
        &self,
        course: CourseId,
        student: StudentId,
        exam_type: ExamTypeId,
    ) -> Result<Option<CourseExamScore>, StoreError> {
        Ok(self
            .lock()
            .exam_scores
            .get(&(course, student, exam_type))
            .map(|&score| CourseExamScore {
                course,
                student,
                exam_type,
                score,
            }))
    }

    fn put_exam_score(&self, score: CourseExamScore) -> Result<(), StoreError> {
        self.lock()
            .exam_scores
            .insert((score.course, score.student, score.exam_type), score.score);
        Ok(())
    }

    fn exam_scores(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<Vec<CourseExamScore>, StoreError> {
        Ok(self
            .lock()
            .exam_scores
            .range((course, student, ExamTypeId::MIN)..=(course, student, ExamTypeId::MAX))
            .map(|(&(course, student, exam_type), &score)| CourseExamScore {
                course,
                student,
                exam_type,
                score,
            })
            .collect())
    }

    fn exam_score_totals(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<ScoreAggregate, StoreError> {
        let tables = self.lock();
        let mut aggregate = ScoreAggregate::default();
        for (_, &score) in tables
            .exam_scores
            .range((course, student, ExamTypeId::MIN)..=(course, student, ExamTypeId::MAX))
        {
            aggregate.sum += score;
            aggregate.count += 1;
        }
        Ok(aggregate)
    }

    fn students_with_scores(&self, course: CourseId) -> Result<Vec<StudentId>, StoreError> {
        let distinct: BTreeSet<StudentId> = self
            .lock()
            .exam_scores
            .range(
                (course, StudentId::MIN, ExamTypeId::MIN)
                    ..=(course, StudentId::MAX, ExamTypeId::MAX),
            )
            .map(|(&(_, student, _), _)| student)
            .collect();
        Ok(distinct.into_iter().collect())
    }

    fn final_score(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<Option<FinalScore>, StoreError> {
        Ok(self.lock().finals.get(&(course, student)).copied())
    }

    fn put_final_score(&self, score: FinalScore) -> Result<(), StoreError> {
        self.lock()
            .finals
            .insert((score.course, score.student), score);
        Ok(())
    }
}
