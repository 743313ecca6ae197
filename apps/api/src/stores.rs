//! Store traits for the collaborators the scoring pipeline depends on.
//!
//! Carried in `ScoringService` as `Arc<dyn …>` so tests can substitute
//! in-memory doubles without a database or network.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobRow>, AppError>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError>;

    /// Writes the computed score and the new status onto the application.
    /// Exactly one write per scoring invocation; re-scoring overwrites.
    async fn save_score(&self, id: Uuid, ats_score: i32, status: &str) -> Result<(), AppError>;
}

/// Opaque blob store holding uploaded resumes, addressed by URL.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementations
// ────────────────────────────────────────────────────────────────────────────

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn save_score(&self, id: Uuid, ats_score: i32, status: &str) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE applications SET ats_score = $2, status = $3 WHERE id = $1")
                .bind(id)
                .bind(ats_score)
                .bind(status)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Application {id} not found")));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP blob fetcher
// ────────────────────────────────────────────────────────────────────────────

/// Fetches resume blobs over plain HTTP. Resumes are stored behind public
/// object-store URLs, so a GET is all the retrieval contract requires.
pub struct HttpBlobFetcher {
    client: reqwest::Client,
}

impl HttpBlobFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpBlobFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Extraction(format!("resume download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Extraction(format!(
                "resume download returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Extraction(format!("resume download failed: {e}")))?;
        Ok(bytes.to_vec())
    }
}
