//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::grading::GradeError;
use crate::store::{CourseId, ExamTypeId, StudentId};

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed identifier in the request path.
    pub fn invalid_identifier(name: &'static str, value: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_IDENTIFIER",
            format!("Invalid {}, must be a valid number", name),
        )
        .with_details(serde_json::json!({ "parameter": name, "value": value }))
    }

    /// Malformed JSON request body.
    pub fn invalid_body(detail: impl ToString) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_REQUEST_BODY",
            "Invalid request data",
        )
        .with_details(serde_json::json!({ "detail": detail.to_string() }))
    }

    /// No weighting rule for the (course, exam type) pair.
    pub fn weight_not_configured(course: CourseId, exam_type: ExamTypeId) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "WEIGHT_NOT_CONFIGURED",
            format!(
                "No weight configured for exam type {} in course {}",
                exam_type, course
            ),
        )
        .with_details(serde_json::json!({ "course": course, "exam_type": exam_type }))
    }

    /// No exam scores recorded for the (course, student) pair.
    pub fn no_exam_scores(course: CourseId, student: StudentId) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NO_EXAM_SCORES",
            format!(
                "No exam scores recorded for student {} in course {}",
                student, course
            ),
        )
        .with_details(serde_json::json!({ "course": course, "student": student }))
    }

    /// No final score recorded for the (course, student) pair.
    pub fn final_score_not_found(course: CourseId, student: StudentId) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "FINAL_SCORE_NOT_FOUND",
            format!(
                "No final score recorded for student {} in course {}",
                student, course
            ),
        )
        .with_details(serde_json::json!({ "course": course, "student": student }))
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GradeError> for ApiError {
    fn from(err: GradeError) -> Self {
        match err {
            GradeError::WeightNotConfigured { course, exam_type } => {
                Self::weight_not_configured(course, exam_type)
            }
            GradeError::NoExamScores { course, student } => Self::no_exam_scores(course, student),
            GradeError::FinalScoreNotFound { course, student } => {
                Self::final_score_not_found(course, student)
            }
            GradeError::Store(e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                e.to_string(),
            ),
        }
    }
}
