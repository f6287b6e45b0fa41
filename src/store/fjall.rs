//! Persistent grade store backed by fjall.
//!
//! Each record kind lives in its own keyspace. Keys are composite business
//! keys rendered as zero-padded decimal ids joined with `/`, so lexicographic
//! order matches numeric order and every composite-key query is a point
//! lookup or a prefix scan:
//!
//! - `raw_scores`:  `student/exam_type/seq` -> score
//! - `weights`:     `course/exam_type`      -> percentage
//! - `exam_scores`: `course/student/exam_type` -> weighted score
//! - `finals`:      `course/student`        -> total + timestamps

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, info};

use super::codec;
use super::error::StoreError;
use super::types::{
    CourseExamScore, CourseId, ExamTypeId, FinalScore, RawScore, ScoreAggregate, StudentId,
    WeightConfig,
};
use super::GradeStore;

/// Keys in the metadata keyspace.
const META_CONFIG_KEY: &str = "config";
const META_RAW_SEQ_KEY: &str = "raw_seq";

/// Current store version.
const STORE_VERSION: u32 = 1;

/// Persistent grade store.
pub struct FjallStore {
    db: fjall::Database,
    meta: Keyspace,
    raw_scores: Keyspace,
    weights: Keyspace,
    exam_scores: Keyspace,
    finals: Keyspace,
    /// Next row id for appended raw scores; mirrored in `_meta` so ids stay
    /// unique across restarts.
    raw_seq: Mutex<u64>,
}

impl FjallStore {
    /// Open the store at the given path, creating it on first use.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "opening grade store");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace("_meta", KeyspaceCreateOptions::default)?;

        // Verify the store version, stamping it on first open.
        if let Some(config) = meta.get(META_CONFIG_KEY)? {
            let found = u32::from_le_bytes(
                config
                    .as_ref()
                    .try_into()
                    .map_err(|_| StoreError::corrupt(META_CONFIG_KEY, "invalid config record"))?,
            );
            if found != STORE_VERSION {
                return Err(StoreError::VersionMismatch {
                    expected: STORE_VERSION,
                    found,
                });
            }
        } else {
            meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
            db.persist(PersistMode::SyncAll)?;
        }

        let raw_seq = match meta.get(META_RAW_SEQ_KEY)? {
            Some(bytes) => u64::from_le_bytes(
                bytes
                    .as_ref()
                    .try_into()
                    .map_err(|_| StoreError::corrupt(META_RAW_SEQ_KEY, "invalid sequence record"))?,
            ),
            None => 0,
        };

        let raw_scores = db.keyspace("raw_scores", KeyspaceCreateOptions::default)?;
        let weights = db.keyspace("weights", KeyspaceCreateOptions::default)?;
        let exam_scores = db.keyspace("exam_scores", KeyspaceCreateOptions::default)?;
        let finals = db.keyspace("finals", KeyspaceCreateOptions::default)?;

        Ok(Self {
            db,
            meta,
            raw_scores,
            weights,
            exam_scores,
            finals,
            raw_seq: Mutex::new(raw_seq),
        })
    }

    fn lock_raw_seq(&self) -> MutexGuard<'_, u64> {
        self.raw_seq.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl GradeStore for FjallStore {
    fn append_raw_score(&self, score: RawScore) -> Result<(), StoreError> {
        let mut seq = self.lock_raw_seq();
        *seq += 1;

        let key = triple_key(score.student, score.exam_type, *seq);
        debug!(key = %key, score = score.score, "appending raw score");

        self.meta.insert(META_RAW_SEQ_KEY, seq.to_le_bytes())?;
        self.raw_scores
            .insert(&key, codec::encode_score(score.score))?;
        self.persist()
    }

    fn raw_score_sum(&self, exam_type: ExamTypeId, student: StudentId) -> Result<f64, StoreError> {
        let prefix = pair_prefix(student, exam_type);
        let mut sum = 0.0;
        for entry in self.raw_scores.prefix(&prefix) {
            let (key, value) = entry.into_inner()?;
            sum += codec::decode_score(&value)
                .map_err(|e| StoreError::corrupt(String::from_utf8_lossy(&key), e))?;
        }
        Ok(sum)
    }

    fn raw_exam_types(&self, student: StudentId) -> Result<Vec<ExamTypeId>, StoreError> {
        let mut distinct = BTreeSet::new();
        for entry in self.raw_scores.prefix(&head_prefix(student)) {
            let key = entry.key()?;
            distinct.insert(key_segment(&key, 1)?);
        }
        Ok(distinct.into_iter().collect())
    }

    fn put_weight(&self, weight: WeightConfig) -> Result<(), StoreError> {
        let key = pair_key(weight.course, weight.exam_type);
        self.weights
            .insert(&key, codec::encode_score(weight.percentage))?;
        self.persist()
    }

    fn weight(
        &self,
        course: CourseId,
        exam_type: ExamTypeId,
    ) -> Result<Option<WeightConfig>, StoreError> {
        let key = pair_key(course, exam_type);
        let Some(value) = self.weights.get(&key)? else {
            return Ok(None);
        };
        let percentage =
            codec::decode_score(&value).map_err(|e| StoreError::corrupt(key.as_str(), e))?;
        Ok(Some(WeightConfig {
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
        let key = triple_key(course, student, exam_type);
        let Some(value) = self.exam_scores.get(&key)? else {
            return Ok(None);
        };
        let score = codec::decode_score(&value).map_err(|e| StoreError::corrupt(key.as_str(), e))?;
        Ok(Some(CourseExamScore {
            course,
            student,
            exam_type,
            score,
        }))
    }

    fn put_exam_score(&self, score: CourseExamScore) -> Result<(), StoreError> {
        let key = triple_key(score.course, score.student, score.exam_type);
        debug!(key = %key, score = score.score, "writing exam score");
        self.exam_scores
            .insert(&key, codec::encode_score(score.score))?;
        self.persist()
    }

    fn exam_scores(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<Vec<CourseExamScore>, StoreError> {
        let mut rows = Vec::new();
        for entry in self.exam_scores.prefix(&pair_prefix(course, student)) {
            let (key, value) = entry.into_inner()?;
            let exam_type = key_segment(&key, 2)?;
            let score = codec::decode_score(&value)
                .map_err(|e| StoreError::corrupt(String::from_utf8_lossy(&key), e))?;
            rows.push(CourseExamScore {
                course,
                student,
                exam_type,
                score,
            });
        }
        Ok(rows)
    }

    fn exam_score_totals(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<ScoreAggregate, StoreError> {
        let mut aggregate = ScoreAggregate::default();
        for entry in self.exam_scores.prefix(&pair_prefix(course, student)) {
            let (key, value) = entry.into_inner()?;
            aggregate.sum += codec::decode_score(&value)
                .map_err(|e| StoreError::corrupt(String::from_utf8_lossy(&key), e))?;
            aggregate.count += 1;
        }
        Ok(aggregate)
    }

    fn students_with_scores(&self, course: CourseId) -> Result<Vec<StudentId>, StoreError> {
        let mut distinct = BTreeSet::new();
        for entry in self.exam_scores.prefix(&head_prefix(course)) {
            let key = entry.key()?;
            distinct.insert(key_segment(&key, 1)?);
        }
        Ok(distinct.into_iter().collect())
    }

    fn final_score(
        &self,
        course: CourseId,
        student: StudentId,
    ) -> Result<Option<FinalScore>, StoreError> {
        let key = pair_key(course, student);
        let Some(value) = self.finals.get(&key)? else {
            return Ok(None);
        };
        let (total, created_at, updated_at) =
            codec::decode_final(&value).map_err(|e| StoreError::corrupt(key.as_str(), e))?;
        Ok(Some(FinalScore {
            course,
            student,
            total,
            created_at,
            updated_at,
        }))
    }

    fn put_final_score(&self, score: FinalScore) -> Result<(), StoreError> {
        let key = pair_key(score.course, score.student);
        debug!(key = %key, total = score.total, "writing final score");
        self.finals.insert(
            &key,
            codec::encode_final(score.total, score.created_at, score.updated_at),
        )?;
        self.persist()
    }
}

// Key helpers. Ids are zero-padded to the full u64 width so that
// lexicographic key order matches numeric id order.

fn pair_key(a: u64, b: u64) -> String {
    format!("{a:020}/{b:020}")
}

fn triple_key(a: u64, b: u64, c: u64) -> String {
    format!("{a:020}/{b:020}/{c:020}")
}

fn head_prefix(a: u64) -> String {
    format!("{a:020}/")
}

fn pair_prefix(a: u64, b: u64) -> String {
    format!("{a:020}/{b:020}/")
}

fn key_segment(key: &[u8], index: usize) -> Result<u64, StoreError> {
    let text = std::str::from_utf8(key)
        .map_err(|e| StoreError::corrupt(String::from_utf8_lossy(key), e))?;
    text.split('/')
        .nth(index)
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| StoreError::corrupt(text, format!("missing key segment {index}")))
}
