use crate::api::{ApiClient, CreateSessionRequest, FinalFeedback, InterviewMode};
use crate::error::{InterviewError, Result};
use crate::question::Question;
use crate::upload::{resume_id_from_key, ObjectUploader, ResourceKind};
use bytes::Bytes;
use tracing::info;

/// A created interview session: its id plus the first question to show
#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub session_id: u64,
    pub first_question: Question,
}

/// Bootstraps an interview: resume upload and session creation.
///
/// Everything that can go wrong here is fatal to the current attempt and
/// sends the user back to the upload step, so errors map to
/// `SessionBootstrap` rather than the per-submission variants.
pub struct SessionClient {
    api: ApiClient,
    uploader: ObjectUploader,
}

const ACCEPTED_RESUME_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

impl SessionClient {
    pub fn new(api: ApiClient) -> Self {
        let uploader = ObjectUploader::new(api.clone());
        Self { api, uploader }
    }

    /// Upload a resume file and return its storage key
    pub async fn upload_resume(&self, file_name: &str, bytes: Bytes) -> Result<String> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !ACCEPTED_RESUME_EXTENSIONS.contains(&extension.as_str()) {
            return Err(InterviewError::SessionBootstrap(format!(
                "unsupported resume file type: {file_name} (pdf or docx required)"
            )));
        }

        let content_type = match extension.as_str() {
            "pdf" => "application/pdf",
            _ => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        };

        let kind = ResourceKind::Resume {
            file_name: file_name.to_string(),
        };
        let target = self.uploader.request_upload_target(&kind).await?;
        self.uploader
            .put_object(&target, bytes, content_type)
            .await?;

        info!("Resume uploaded: {}", target.key);
        Ok(target.key)
    }

    /// Create a session from an uploaded resume key, a job role, and a
    /// difficulty mode. Returns the session id and its first question.
    pub async fn create_session(
        &self,
        resume_key: &str,
        job_role: &str,
        mode: InterviewMode,
    ) -> Result<InterviewSession> {
        if job_role.trim().is_empty() {
            return Err(InterviewError::SessionBootstrap(
                "job role is required".to_string(),
            ));
        }
        if resume_key.trim().is_empty() {
            return Err(InterviewError::SessionBootstrap(
                "resume reference is required".to_string(),
            ));
        }

        let request = CreateSessionRequest {
            mode,
            job_role: job_role.to_string(),
            resume_id: resume_id_from_key(resume_key),
        };

        let created = self.api.create_session(&request).await.map_err(|e| match e {
            InterviewError::Api { status, code } => InterviewError::SessionBootstrap(format!(
                "session creation rejected (status {status}, {code})"
            )),
            other => other,
        })?;

        info!(
            "Session {} created, first question: {}",
            created.session_id, created.first_question_id
        );

        Ok(InterviewSession {
            session_id: created.session_id,
            first_question: Question::first(&created),
        })
    }

    /// Fetch the final per-question feedback for a session
    pub async fn final_feedback(&self, session_id: u64) -> Result<FinalFeedback> {
        self.api.final_feedback(session_id).await
    }
}
