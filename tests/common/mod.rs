//! Common test utilities and fixtures.
//!
//! Provides a test application wrapper over a temporary grade store, plus
//! seeding helpers shared across the test suite.

#![cfg(feature = "server")]

use axum_test::TestServer;
use gradebook::server::{AppState, Config, router};
use gradebook::store::{GradeStore, RawScore, WeightConfig};
use tempfile::TempDir;

/// Test application wrapper that manages a temporary grade store.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestApp {
    /// Create a new test application with a fresh temporary store.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("db");
        let config = Config::from_str(&format!(
            r#"
[server]
bind = "127.0.0.1"
port = 0

[database]
path = "{}"
"#,
            db_path.to_string_lossy()
        ))?;
        let state = AppState::from_config(&config)?;
        let server = TestServer::new(router(state.clone()))?;
        Ok(Self {
            server,
            state,
            _temp_dir: temp_dir,
        })
    }

    /// Seed a weighting rule for a (course, exam type) pair.
    pub fn seed_weight(&self, course: u64, exam_type: u64, percentage: f64) -> anyhow::Result<()> {
        self.state.grader().store().put_weight(WeightConfig {
            course,
            exam_type,
            percentage,
        })?;
        Ok(())
    }

    /// Seed raw marks for a (student, exam type) pair.
    pub fn seed_raw_scores(
        &self,
        student: u64,
        exam_type: u64,
        scores: &[f64],
    ) -> anyhow::Result<()> {
        for &score in scores {
            self.state.grader().store().append_raw_score(RawScore {
                student,
                exam_type,
                score,
            })?;
        }
        Ok(())
    }

    /// Score one exam type over the API, asserting success.
    pub async fn score_exam_type(
        &self,
        course: u64,
        student: u64,
        exam_type: u64,
    ) -> serde_json::Value {
        let response = self
            .server
            .post(&format!(
                "/api/v1/courses/{}/students/{}/exam-scores",
                course, student
            ))
            .json(&serde_json::json!({ "exam_type": exam_type }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Totalize a (course, student) pair over the API, asserting success.
    pub async fn upsert_total(&self, course: u64, student: u64) -> serde_json::Value {
        let response = self
            .server
            .post(&format!(
                "/api/v1/courses/{}/students/{}/total",
                course, student
            ))
            .await;
        response.assert_status_ok();
        response.json()
    }
}
