//! Score operation handlers.
//!
//! Handlers parse identifiers, delegate to the grader, and shape its result
//! values into JSON. No domain logic lives here.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::grading::{
    CourseRecalculation, CourseTotal, StudentRecalculation, UpsertMode, WeightedScore,
};
use crate::store::{CourseId, ExamTypeId, FinalScore, StudentId};

use super::super::{error::ApiError, state::AppState};

/// Parse a path identifier, rejecting non-numeric input before any store
/// access.
fn parse_id(name: &'static str, raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_identifier(name, raw))
}

/// Request body for scoring one exam type.
#[derive(Debug, Deserialize)]
pub struct ExamScoreRequest {
    pub exam_type: ExamTypeId,
}

/// JSON shape of a weighted exam-score result.
#[derive(Debug, Serialize)]
pub struct WeightedScoreResponse {
    pub course: CourseId,
    pub student: StudentId,
    pub exam_type: ExamTypeId,
    pub raw_sum: f64,
    pub percentage: f64,
    pub score: f64,
    pub operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_delta: Option<f64>,
}

impl From<WeightedScore> for WeightedScoreResponse {
    fn from(s: WeightedScore) -> Self {
        Self {
            course: s.course,
            student: s.student,
            exam_type: s.exam_type,
            raw_sum: s.raw_sum,
            percentage: s.percentage,
            score: s.score,
            operation: s.outcome.operation(),
            previous_score: s.outcome.previous(),
            score_delta: s.outcome.delta(s.score),
        }
    }
}

/// One contributing exam-score row in a total response.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub exam_type: ExamTypeId,
    pub score: f64,
}

/// JSON shape of a totalization result.
#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub course: CourseId,
    pub student: StudentId,
    pub total: f64,
    pub average: f64,
    pub entry_count: usize,
    pub entries: Vec<EntryResponse>,
    pub operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_delta: Option<f64>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<CourseTotal> for TotalResponse {
    fn from(t: CourseTotal) -> Self {
        Self {
            course: t.final_score.course,
            student: t.final_score.student,
            total: t.final_score.total,
            average: t.average,
            entry_count: t.entries.len(),
            entries: t
                .entries
                .iter()
                .map(|e| EntryResponse {
                    exam_type: e.exam_type,
                    score: e.score,
                })
                .collect(),
            operation: t.outcome.operation(),
            previous_total: t.outcome.previous(),
            total_delta: t.outcome.delta(t.final_score.total),
            created_at: t.final_score.created_at,
            updated_at: t.final_score.updated_at,
        }
    }
}

/// JSON shape of a stored final score.
#[derive(Debug, Serialize)]
pub struct FinalScoreResponse {
    pub course: CourseId,
    pub student: StudentId,
    pub total: f64,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<FinalScore> for FinalScoreResponse {
    fn from(f: FinalScore) -> Self {
        Self {
            course: f.course,
            student: f.student,
            total: f.total,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// JSON shape of the lenient exam-score summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub course: CourseId,
    pub student: StudentId,
    pub total: f64,
    pub count: u64,
    pub average: f64,
}

/// Per-student entry of a course recalculation response.
#[derive(Debug, Serialize)]
pub struct RecalculatedTotalResponse {
    pub student: StudentId,
    pub total: f64,
    pub operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_delta: Option<f64>,
}

/// JSON shape of a course-wide recalculation result.
#[derive(Debug, Serialize)]
pub struct CourseRecalculationResponse {
    pub course: CourseId,
    pub recalculated_count: usize,
    pub results: Vec<RecalculatedTotalResponse>,
}

impl From<CourseRecalculation> for CourseRecalculationResponse {
    fn from(r: CourseRecalculation) -> Self {
        Self {
            course: r.course,
            recalculated_count: r.recalculated.len(),
            results: r
                .recalculated
                .into_iter()
                .map(|entry| RecalculatedTotalResponse {
                    student: entry.student,
                    total: entry.total,
                    operation: entry.outcome.operation(),
                    previous_total: entry.outcome.previous(),
                    total_delta: entry.outcome.delta(entry.total),
                })
                .collect(),
        }
    }
}

/// JSON shape of a per-student recalculation result.
#[derive(Debug, Serialize)]
pub struct StudentRecalculationResponse {
    pub course: CourseId,
    pub student: StudentId,
    pub scored_count: usize,
    pub scored: Vec<WeightedScoreResponse>,
    pub skipped: Vec<ExamTypeId>,
}

impl From<StudentRecalculation> for StudentRecalculationResponse {
    fn from(r: StudentRecalculation) -> Self {
        Self {
            course: r.course,
            student: r.student,
            scored_count: r.scored.len(),
            scored: r.scored.into_iter().map(Into::into).collect(),
            skipped: r.skipped,
        }
    }
}

/// Score one exam type for a (course, student) pair.
pub async fn score_exam_type(
    State(state): State<AppState>,
    Path((course, student)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<WeightedScoreResponse>, ApiError> {
    let course = parse_id("course", &course)?;
    let student = parse_id("student", &student)?;
    let request: ExamScoreRequest =
        serde_json::from_slice(&body).map_err(ApiError::invalid_body)?;

    let result = state
        .grader()
        .score_exam_type(course, student, request.exam_type)?;
    Ok(Json(result.into()))
}

/// Total a pair's exam scores, creating or updating the final score row.
pub async fn upsert_total(
    State(state): State<AppState>,
    Path((course, student)): Path<(String, String)>,
) -> Result<Json<TotalResponse>, ApiError> {
    let course = parse_id("course", &course)?;
    let student = parse_id("student", &student)?;

    let result = state
        .grader()
        .totalize(course, student, UpsertMode::CreateOrUpdate)?;
    Ok(Json(result.into()))
}

/// Total a pair's exam scores, requiring an existing final score row.
pub async fn update_total(
    State(state): State<AppState>,
    Path((course, student)): Path<(String, String)>,
) -> Result<Json<TotalResponse>, ApiError> {
    let course = parse_id("course", &course)?;
    let student = parse_id("student", &student)?;

    let result = state
        .grader()
        .totalize(course, student, UpsertMode::UpdateOnly)?;
    Ok(Json(result.into()))
}

/// Fetch the stored final score for a (course, student) pair.
pub async fn get_total(
    State(state): State<AppState>,
    Path((course, student)): Path<(String, String)>,
) -> Result<Json<FinalScoreResponse>, ApiError> {
    let course = parse_id("course", &course)?;
    let student = parse_id("student", &student)?;

    let result = state.grader().final_report(course, student)?;
    Ok(Json(result.into()))
}

/// Store-side sum/count/average over a pair's exam scores.
pub async fn get_summary(
    State(state): State<AppState>,
    Path((course, student)): Path<(String, String)>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let course = parse_id("course", &course)?;
    let student = parse_id("student", &student)?;

    let summary = state.grader().exam_score_summary(course, student)?;
    Ok(Json(SummaryResponse {
        course,
        student,
        total: summary.total,
        count: summary.count,
        average: summary.average,
    }))
}

/// Recompute final totals for every student with scores in the course.
pub async fn recalculate_course(
    State(state): State<AppState>,
    Path(course): Path<String>,
) -> Result<Json<CourseRecalculationResponse>, ApiError> {
    let course = parse_id("course", &course)?;

    let result = state.grader().recalculate_course(course)?;
    Ok(Json(result.into()))
}

/// Rescore every exam type the student has raw marks for.
pub async fn recalculate_student(
    State(state): State<AppState>,
    Path((course, student)): Path<(String, String)>,
) -> Result<Json<StudentRecalculationResponse>, ApiError> {
    let course = parse_id("course", &course)?;
    let student = parse_id("student", &student)?;

    let result = state.grader().recalculate_student(course, student)?;
    Ok(Json(result.into()))
}
