//! Axum route handlers for the scoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::result::{ScoreResult, ScoreSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreResumeRequest {
    pub job_id: Uuid,
    pub application_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ScoreResumeResponse {
    pub success: bool,
    pub score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: ScoreSummary,
}

impl From<ScoreResult> for ScoreResumeResponse {
    fn from(result: ScoreResult) -> Self {
        Self {
            success: true,
            score: result.score,
            matched_skills: result.matched_skills,
            missing_skills: result.missing_skills,
            summary: result.summary,
        }
    }
}

/// POST /api/v1/application/score-resume
///
/// On-demand scoring of an existing application against its job. The reply
/// is a successful score payload whether the AI or the rule-based path
/// produced it; only not-found/extraction/persistence problems surface as
/// errors.
pub async fn handle_score_resume(
    State(state): State<AppState>,
    Json(request): Json<ScoreResumeRequest>,
) -> Result<Json<ScoreResumeResponse>, AppError> {
    let result = state
        .scoring
        .score_application(request.job_id, request.application_id)
        .await?;
    Ok(Json(result.into()))
}
