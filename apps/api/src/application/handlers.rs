//! Application submission: multipart upload, S3 storage, row insert, and an
//! immediate scoring pass whose failure never blocks the submission.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, STATUS_PENDING};
use crate::models::job::JobRow;
use crate::state::AppState;

/// Uploaded resumes are capped at 2 MB.
const RESUME_MAX_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Default)]
struct SubmissionForm {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    cover_letter: Option<String>,
    job_id: Option<Uuid>,
    resume: Option<(Bytes, String)>,
}

#[derive(Debug, Serialize)]
pub struct SubmitApplicationResponse {
    pub success: bool,
    pub message: String,
    pub application: ApplicationRow,
}

/// POST /api/v1/application/post
///
/// Accepts the application form plus a `resume` PDF part. The resume goes to
/// object storage, the application row is inserted as Pending, and scoring
/// runs right away; a scoring failure is logged and the submission still
/// succeeds.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitApplicationResponse>, AppError> {
    let form = read_form(multipart).await?;

    let name = require_field(form.name, "name")?;
    let email = require_field(form.email, "email")?;
    let phone = require_field(form.phone, "phone")?;
    let address = require_field(form.address, "address")?;
    let cover_letter = require_field(form.cover_letter, "cover_letter")?;
    let job_id = form
        .job_id
        .ok_or_else(|| AppError::Validation("job_id is required".to_string()))?;
    let (resume_bytes, content_type) = form
        .resume
        .ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;

    if content_type != "application/pdf" {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }
    if resume_bytes.len() > RESUME_MAX_BYTES {
        return Err(AppError::Validation(
            "Resume must be less than 2MB".to_string(),
        ));
    }

    let job = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let already_applied: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM applications WHERE job_id = $1 AND email = $2 LIMIT 1",
    )
    .bind(job_id)
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;
    if already_applied.is_some() {
        return Err(AppError::Validation(
            "You have already applied for this job".to_string(),
        ));
    }

    let application_id = Uuid::new_v4();
    let file_name = format!("{}_{}.pdf", application_id, Utc::now().timestamp_millis());
    let s3_key = format!("resume/{file_name}");

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(resume_bytes.to_vec()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("resume upload failed: {e}")))?;

    let resume_url = state.config.object_url(&s3_key);
    info!("Uploaded resume for application {application_id} to {resume_url}");

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (id, job_id, name, email, phone, address, cover_letter,
             resume_url, resume_file_name, ats_score, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NULL, $10)
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(job.id)
    .bind(&name)
    .bind(&email)
    .bind(&phone)
    .bind(&address)
    .bind(&cover_letter)
    .bind(&resume_url)
    .bind(&file_name)
    .bind(STATUS_PENDING)
    .fetch_one(&state.db)
    .await?;

    // Score immediately; the submission response does not depend on it.
    match state.scoring.score_application(job.id, application_id).await {
        Ok(result) => info!(
            "Scored application {application_id} at submission: {}",
            result.score
        ),
        Err(e) => warn!("Scoring after submission failed for {application_id}: {e}"),
    }

    Ok(Json(SubmitApplicationResponse {
        success: true,
        message: "Application Submitted!".to_string(),
        application,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let Some(field_name) = field.name().map(String::from) else {
            continue;
        };

        match field_name.as_str() {
            "resume" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume: {e}")))?;
                form.resume = Some((data, content_type));
            }
            name => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read {name}: {e}")))?;
                match name {
                    "name" => form.name = Some(value),
                    "email" => form.email = Some(value),
                    "phone" => form.phone = Some(value),
                    "address" => form.address = Some(value),
                    "cover_letter" => form.cover_letter = Some(value),
                    "job_id" => {
                        let id = value.parse::<Uuid>().map_err(|_| {
                            AppError::Validation("job_id must be a valid UUID".to_string())
                        })?;
                        form.job_id = Some(id);
                    }
                    _ => {} // unknown fields are ignored
                }
            }
        }
    }

    Ok(form)
}

fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{name} is required"))),
    }
}
