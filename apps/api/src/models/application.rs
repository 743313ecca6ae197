use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application lifecycle states. Stored as plain text; employers move
/// applications to Accepted/Rejected outside the scoring pipeline.
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_REVIEWED: &str = "Reviewed";

/// A job application. The scoring pipeline only ever writes `ats_score`
/// and `status`; everything else is owned by the submission flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cover_letter: String,
    pub resume_url: String,
    pub resume_file_name: String,
    pub ats_score: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
