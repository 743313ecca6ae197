use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting. Read-only to the scoring pipeline; `skills` holds the
/// employer-configured required skills and may be empty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}
