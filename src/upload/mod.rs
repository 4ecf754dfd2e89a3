use crate::api::{ApiClient, UploadTarget};
use crate::error::{InterviewError, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{debug, info};

/// Logical resource kinds that can be written to blob storage. Each maps to
/// its own presign endpoint but the target shape is identical.
#[derive(Debug, Clone)]
pub enum ResourceKind {
    Resume {
        file_name: String,
    },
    AnswerRecording {
        question_id: u64,
        content_type: String,
    },
    PeerFeedbackRecording {
        question_id: u64,
        content_type: String,
    },
}

/// Obtains presigned write targets and performs direct uploads to storage.
///
/// Uploads are single-shot: a non-2xx PUT fails the whole submission and the
/// caller retries from the top. No resumable semantics.
#[derive(Clone)]
pub struct ObjectUploader {
    api: ApiClient,
    storage: reqwest::Client,
}

impl ObjectUploader {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            storage: reqwest::Client::new(),
        }
    }

    pub async fn request_upload_target(&self, kind: &ResourceKind) -> Result<UploadTarget> {
        match kind {
            ResourceKind::Resume { file_name } => self.api.presign_resume(file_name).await,
            ResourceKind::AnswerRecording {
                question_id,
                content_type,
            } => self.api.presign_recording(*question_id, content_type).await,
            ResourceKind::PeerFeedbackRecording {
                question_id,
                content_type,
            } => {
                self.api
                    .presign_feedback_recording(*question_id, content_type)
                    .await
            }
        }
    }

    /// PUT the blob to the presigned URL. The blob's mime type goes out as
    /// Content-Type unless the target's required headers override it.
    pub async fn put_object(
        &self,
        target: &UploadTarget,
        body: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        for (name, value) in &target.required_headers {
            let name = name
                .parse::<HeaderName>()
                .map_err(|_| InterviewError::InvalidState("bad required header name"))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| InterviewError::InvalidState("bad required header value"))?;
            headers.insert(name, value);
        }

        debug!("Uploading {} bytes to key {}", body.len(), target.key);

        let response = self
            .storage
            .put(&target.upload_url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InterviewError::UploadFailed {
                status: status.as_u16(),
            });
        }

        info!("Upload complete: {}", target.key);
        Ok(())
    }
}

/// Extract the resume id from a storage key:
/// "resume/123/aaa-bbb.docx" -> "aaa-bbb"
pub fn resume_id_from_key(key: &str) -> String {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    match file_name.rsplit_once('.') {
        Some((stem, _ext)) => stem.to_string(),
        None => file_name.to_string(),
    }
}
