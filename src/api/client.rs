use super::types::*;
use crate::error::{InterviewError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Backend error code for a recording that is already queued or processed
pub const ALREADY_IN_QUEUE_OR_DONE: &str = "ALREADY_IN_QUEUE_OR_DONE";

/// Thin JSON-over-HTTP client for the interview backend.
///
/// Responses may arrive bare or wrapped in a `{"result": ...}` envelope;
/// both are accepted and the payload is unwrapped transparently.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request a presigned upload target for a resume file
    pub async fn presign_resume(&self, file_name: &str) -> Result<UploadTarget> {
        let response = self
            .http
            .post(self.url("/api/presign/resume"))
            .query(&[("fileName", file_name)])
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Create an interview session from an uploaded resume reference
    pub async fn create_session(&self, request: &CreateSessionRequest) -> Result<CreatedSession> {
        let response = self
            .http
            .post(self.url("/api/interview-sessions"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Request a presigned upload target for an answer recording
    pub async fn presign_recording(
        &self,
        question_id: u64,
        content_type: &str,
    ) -> Result<UploadTarget> {
        let request = RecordingPresignRequest {
            question_id,
            content_type: content_type.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/presign/recording"))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Request a presigned upload target for a peer-feedback recording
    pub async fn presign_feedback_recording(
        &self,
        question_id: u64,
        content_type: &str,
    ) -> Result<UploadTarget> {
        let request = RecordingPresignRequest {
            question_id,
            content_type: content_type.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/presign/recording/feedback-question"))
            .json(&request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Register an uploaded recording for asynchronous processing.
    ///
    /// A duplicate registration surfaces as `RegistrationConflict`; callers
    /// recover by resolving the next question through the timeout endpoint.
    pub async fn register_recording(&self, question_id: u64) -> Result<RegisteredRecording> {
        let response = self
            .http
            .post(self.url(&format!("/api/questions/{question_id}/recordings")))
            .send()
            .await?;

        match Self::decode(response).await {
            Err(InterviewError::Api { code, .. }) if code == ALREADY_IN_QUEUE_OR_DONE => {
                warn!("Recording for question {} already in queue or done", question_id);
                Err(InterviewError::RegistrationConflict { question_id })
            }
            other => other,
        }
    }

    /// Fetch the current processing state for a registered recording
    pub async fn recording_result(&self, recording_id: u64) -> Result<RecordingResult> {
        let response = self
            .http
            .get(self.url(&format!("/api/recordings/{recording_id}/results")))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Report a question timeout; the response carries the same
    /// next-question resolution shape as a ready poll result
    pub async fn question_timeout(&self, question_id: u64) -> Result<RecordingResult> {
        let response = self
            .http
            .post(self.url(&format!("/api/questions/{question_id}/timeout")))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetch the final per-question feedback for a completed session
    pub async fn final_feedback(&self, session_id: u64) -> Result<FinalFeedback> {
        let response = self
            .http
            .get(self.url(&format!("/api/interview-sessions/{session_id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Register an uploaded peer-feedback recording
    pub async fn register_peer_recording(&self, question_id: u64) -> Result<RegisteredRecording> {
        let response = self
            .http
            .post(self.url(&format!(
                "/api/random-questions/peer/questions/{question_id}"
            )))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetch the peer-feedback processing state
    pub async fn peer_feedback_result(&self, recording_id: u64) -> Result<PeerFeedbackResult> {
        let response = self
            .http
            .get(self.url(&format!(
                "/api/random-questions/peer/recordings/{recording_id}/feedbacks"
            )))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let error = serde_json::from_value::<ApiErrorBody>(unwrap_result(body.clone())).ok();
            let code = error
                .and_then(|e| e.error_code)
                .unwrap_or_else(|| "UNKNOWN".to_string());
            debug!("API error: status={} code={}", status, code);
            return Err(InterviewError::Api {
                status: status.as_u16(),
                code,
            });
        }

        Ok(serde_json::from_value(unwrap_result(body))?)
    }
}

/// Unwrap the optional `{"result": ...}` response envelope
fn unwrap_result(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}
