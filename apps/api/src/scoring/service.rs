//! Scoring pipeline orchestration.
//!
//! One request runs one sequential pipeline:
//! fetch resume → extract text → prompt the model → parse → persist.
//! Any failure before text extraction is fatal; any failure after it
//! degrades to the rule-based scorer and still succeeds.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::application;
use crate::scoring::extractor::DocumentExtractor;
use crate::scoring::fallback::fallback_score;
use crate::scoring::parser::parse_reply;
use crate::scoring::prompts::{build_scoring_prompt, SCORING_SYSTEM};
use crate::scoring::result::ScoreResult;
use crate::stores::{ApplicationStore, BlobFetcher, JobStore};

/// Substituted when a job has no skills configured, so scoring always has
/// criteria to work with.
pub const DEFAULT_REQUIRED_SKILLS: [&str; 3] = ["communication", "teamwork", "problem-solving"];

/// Upper bound on one model call. A timeout counts as an AI failure and
/// degrades to the rule-based scorer.
const AI_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// The generative model behind the scoring prompt. One method, so tests can
/// script replies without a network.
#[async_trait]
pub trait ScoringModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl ScoringModel for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.call_text(prompt, SCORING_SYSTEM).await
    }
}

/// Why the AI path produced nothing usable. Internal to the pipeline; callers
/// only ever see the rule-based result that replaces it.
#[derive(Debug, Error)]
enum AiScoreError {
    #[error("model call timed out")]
    Timeout,

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("model reply failed validation")]
    Unusable,
}

/// Orchestrates one scoring run end to end. All collaborators are injected
/// trait objects; the service itself is stateless and cheaply cloneable.
#[derive(Clone)]
pub struct ScoringService {
    jobs: Arc<dyn JobStore>,
    applications: Arc<dyn ApplicationStore>,
    blobs: Arc<dyn BlobFetcher>,
    extractor: Arc<dyn DocumentExtractor>,
    model: Arc<dyn ScoringModel>,
}

impl ScoringService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        applications: Arc<dyn ApplicationStore>,
        blobs: Arc<dyn BlobFetcher>,
        extractor: Arc<dyn DocumentExtractor>,
        model: Arc<dyn ScoringModel>,
    ) -> Self {
        Self {
            jobs,
            applications,
            blobs,
            extractor,
            model,
        }
    }

    /// Runs the full pipeline for one application and persists the outcome.
    ///
    /// Re-invocation recomputes from scratch and overwrites the previous
    /// score; concurrent runs for the same application race on the final
    /// write and the last one wins.
    pub async fn score_application(
        &self,
        job_id: Uuid,
        application_id: Uuid,
    ) -> Result<ScoreResult, AppError> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
        let app = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

        let required_skills: Vec<String> = if job.skills.is_empty() {
            DEFAULT_REQUIRED_SKILLS.iter().map(|s| s.to_string()).collect()
        } else {
            job.skills.clone()
        };

        // Fatal section: without extracted text there is nothing to fall
        // back on.
        let bytes = self.blobs.fetch(&app.resume_url).await?;
        let resume_text = self.extractor.extract(&bytes)?;

        let result = match self.score_with_model(&required_skills, &resume_text).await {
            Ok(result) => result,
            Err(reason) => {
                warn!("AI scoring unavailable for application {application_id}: {reason}");
                fallback_score(&required_skills, &resume_text)
            }
        };

        self.applications
            .save_score(application_id, result.score, application::STATUS_REVIEWED)
            .await?;
        info!(
            "Scored application {application_id} for job {job_id}: {}",
            result.score
        );

        Ok(result)
    }

    /// The AI leg of the pipeline as an explicit `Result`, so the degrade
    /// decision is a plain `match` rather than error interception.
    async fn score_with_model(
        &self,
        required_skills: &[String],
        resume_text: &str,
    ) -> Result<ScoreResult, AiScoreError> {
        let prompt = build_scoring_prompt(required_skills, resume_text);
        let reply = tokio::time::timeout(AI_CALL_TIMEOUT, self.model.generate(&prompt))
            .await
            .map_err(|_| AiScoreError::Timeout)??;

        parse_reply(&reply)
            .into_score_result()
            .ok_or(AiScoreError::Unusable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    use crate::models::application::{ApplicationRow, STATUS_PENDING};
    use crate::models::job::JobRow;

    const RESUME_TEXT: &str =
        "Rust engineer, 4 years of experience. Bachelor of Engineering, CGPA: 3.6. \
         Comfortable with rust and sql.";

    struct StubJobs(Option<JobRow>);

    #[async_trait]
    impl JobStore for StubJobs {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<JobRow>, AppError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct StubApplications {
        row: Option<ApplicationRow>,
        saved: Mutex<Vec<(Uuid, i32, String)>>,
    }

    #[async_trait]
    impl ApplicationStore for StubApplications {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<ApplicationRow>, AppError> {
            Ok(self.row.clone())
        }

        async fn save_score(
            &self,
            id: Uuid,
            ats_score: i32,
            status: &str,
        ) -> Result<(), AppError> {
            self.saved
                .lock()
                .unwrap()
                .push((id, ats_score, status.to_string()));
            Ok(())
        }
    }

    struct StubBlobs {
        fail: bool,
    }

    #[async_trait]
    impl BlobFetcher for StubBlobs {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
            if self.fail {
                return Err(AppError::Extraction(format!(
                    "resume download returned status 404 for {url}"
                )));
            }
            Ok(b"%PDF-stub".to_vec())
        }
    }

    struct StubExtractor;

    impl DocumentExtractor for StubExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String, AppError> {
            Ok(RESUME_TEXT.to_string())
        }
    }

    struct StubModel {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ScoringModel for StubModel {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(LlmError::EmptyContent),
            }
        }
    }

    fn job_with_skills(skills: &[&str]) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: "Build services".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            posted_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn pending_application() -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Engine St".to_string(),
            cover_letter: "Hello".to_string(),
            resume_url: "http://blobs.local/resume/a.pdf".to_string(),
            resume_file_name: "a.pdf".to_string(),
            ats_score: None,
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        }
    }

    fn service(
        jobs: StubJobs,
        applications: Arc<StubApplications>,
        blobs: StubBlobs,
        model: StubModel,
    ) -> ScoringService {
        ScoringService::new(
            Arc::new(jobs),
            applications,
            Arc::new(blobs),
            Arc::new(StubExtractor),
            Arc::new(model),
        )
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let apps = Arc::new(StubApplications {
            row: Some(pending_application()),
            ..Default::default()
        });
        let svc = service(
            StubJobs(None),
            apps,
            StubBlobs { fail: false },
            StubModel::replying("Score: 80"),
        );

        let err = svc
            .score_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_application_is_not_found() {
        let apps = Arc::new(StubApplications::default());
        let svc = service(
            StubJobs(Some(job_with_skills(&["rust"]))),
            apps,
            StubBlobs { fail: false },
            StubModel::replying("Score: 80"),
        );

        let err = svc
            .score_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal_and_mutates_nothing() {
        let apps = Arc::new(StubApplications {
            row: Some(pending_application()),
            ..Default::default()
        });
        let svc = service(
            StubJobs(Some(job_with_skills(&["rust"]))),
            Arc::clone(&apps),
            StubBlobs { fail: true },
            StubModel::replying("Score: 80"),
        );

        let err = svc
            .score_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
        assert!(apps.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_valid_model_reply_is_persisted_as_reviewed() {
        let application = pending_application();
        let application_id = application.id;
        let apps = Arc::new(StubApplications {
            row: Some(application),
            ..Default::default()
        });
        let reply = "Score: 82\nMatched Skills: rust\nMissing Skills: sql";
        let svc = service(
            StubJobs(Some(job_with_skills(&["rust", "sql"]))),
            Arc::clone(&apps),
            StubBlobs { fail: false },
            StubModel::replying(reply),
        );

        let result = svc
            .score_application(Uuid::new_v4(), application_id)
            .await
            .unwrap();
        assert_eq!(result.score, 82);

        let saved = apps.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], (application_id, 82, "Reviewed".to_string()));
    }

    #[tokio::test]
    async fn test_model_failure_degrades_to_rule_based_result() {
        let apps = Arc::new(StubApplications {
            row: Some(pending_application()),
            ..Default::default()
        });
        let required = vec!["rust".to_string(), "sql".to_string()];
        let svc = service(
            StubJobs(Some(job_with_skills(&["rust", "sql"]))),
            Arc::clone(&apps),
            StubBlobs { fail: false },
            StubModel::failing(),
        );

        let result = svc
            .score_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(result, fallback_score(&required, RESUME_TEXT));
        assert_eq!(apps.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unusable_model_reply_degrades_to_rule_based_result() {
        let apps = Arc::new(StubApplications {
            row: Some(pending_application()),
            ..Default::default()
        });
        let required = vec!["rust".to_string(), "sql".to_string()];
        let svc = service(
            StubJobs(Some(job_with_skills(&["rust", "sql"]))),
            Arc::clone(&apps),
            StubBlobs { fail: false },
            StubModel::replying("The candidate seems nice but I cannot rate them."),
        );

        let result = svc
            .score_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(result, fallback_score(&required, RESUME_TEXT));
    }

    #[tokio::test]
    async fn test_job_without_skills_gets_default_criteria() {
        let apps = Arc::new(StubApplications {
            row: Some(pending_application()),
            ..Default::default()
        });
        let model = Arc::new(StubModel::replying(
            "Score: 70\nMatched Skills: teamwork\nMissing Skills: communication, problem-solving",
        ));
        let svc = ScoringService::new(
            Arc::new(StubJobs(Some(job_with_skills(&[])))),
            Arc::clone(&apps) as Arc<dyn ApplicationStore>,
            Arc::new(StubBlobs { fail: false }),
            Arc::new(StubExtractor),
            Arc::clone(&model) as Arc<dyn ScoringModel>,
        );

        svc.score_application(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        // The prompt the model saw carries the substituted default skills.
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("communication, teamwork, problem-solving"));
    }
}
