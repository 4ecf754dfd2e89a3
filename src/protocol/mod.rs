use crate::api::{ApiClient, PeerFeedbackResult, ProcessingStatus, RecordingResult};
use crate::capture::RecordedTake;
use crate::config::PollingConfig;
use crate::error::{InterviewError, Result};
use crate::upload::{ObjectUploader, ResourceKind};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Poll cadence and attempt budget for asynchronous processing results
#[derive(Debug, Clone)]
pub struct PollingPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollingPolicy {
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            max_attempts: config.max_attempts,
        }
    }
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 60,
        }
    }
}

/// Submits one recorded answer and waits for the backend to process it:
/// presign, direct PUT, registration, then bounded polling until a terminal
/// state.
///
/// Failure semantics per step:
/// - PUT failure surfaces `UploadFailed`; the take stays with the caller for
///   a full resubmission.
/// - Registration of an already-submitted question surfaces
///   `RegistrationConflict`; the caller recovers through the timeout path.
/// - A FAILED poll result is `ProcessingFailed`; an exhausted attempt budget
///   is `PollingTimeout`, meaning the backend state is unknown rather than
///   known-bad.
#[derive(Clone)]
pub struct SubmissionProtocol {
    api: ApiClient,
    uploader: ObjectUploader,
    policy: PollingPolicy,
}

impl SubmissionProtocol {
    pub fn new(api: ApiClient, uploader: ObjectUploader, policy: PollingPolicy) -> Self {
        Self {
            api,
            uploader,
            policy,
        }
    }

    /// Run the full submission pipeline for one answer. Returns the terminal
    /// poll result, which carries the next-question resolution.
    pub async fn submit_answer(
        &self,
        question_id: u64,
        take: &RecordedTake,
    ) -> Result<RecordingResult> {
        info!(
            "Submitting answer for question {} ({:.1}s of audio)",
            question_id, take.duration_secs
        );

        let kind = ResourceKind::AnswerRecording {
            question_id,
            content_type: take.mime_type.clone(),
        };
        let target = self.uploader.request_upload_target(&kind).await?;
        self.uploader
            .put_object(&target, take.bytes.clone(), &take.mime_type)
            .await?;

        let registered = self.api.register_recording(question_id).await?;
        debug!(
            "Recording registered: id={} status={:?}",
            registered.recording_id, registered.status
        );

        self.poll_recording(registered.recording_id).await
    }

    /// Poll the result endpoint until READY or FAILED, up to the attempt
    /// budget. Polling stops immediately on a terminal state.
    async fn poll_recording(&self, recording_id: u64) -> Result<RecordingResult> {
        for attempt in 1..=self.policy.max_attempts {
            let result = self.api.recording_result(recording_id).await?;

            match result.status {
                ProcessingStatus::Ready => {
                    info!(
                        "Recording {} ready after {} poll(s)",
                        recording_id, attempt
                    );
                    return Ok(result);
                }
                ProcessingStatus::Failed => {
                    warn!("Recording {} failed processing", recording_id);
                    return Err(InterviewError::ProcessingFailed { recording_id });
                }
                ProcessingStatus::Working => {
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        Err(InterviewError::PollingTimeout {
            attempts: self.policy.max_attempts,
        })
    }

    /// The peer-feedback popup reuses the same presign → PUT → register →
    /// poll pipeline against its own endpoints, at a smaller scale.
    pub async fn submit_peer_feedback(
        &self,
        question_id: u64,
        take: &RecordedTake,
    ) -> Result<PeerFeedbackResult> {
        let kind = ResourceKind::PeerFeedbackRecording {
            question_id,
            content_type: take.mime_type.clone(),
        };
        let target = self.uploader.request_upload_target(&kind).await?;
        self.uploader
            .put_object(&target, take.bytes.clone(), &take.mime_type)
            .await?;

        let registered = self.api.register_peer_recording(question_id).await?;

        for attempt in 1..=self.policy.max_attempts {
            let result = self.api.peer_feedback_result(registered.recording_id).await?;

            match result.progress_status {
                ProcessingStatus::Ready => return Ok(result),
                ProcessingStatus::Failed => {
                    return Err(InterviewError::ProcessingFailed {
                        recording_id: registered.recording_id,
                    })
                }
                ProcessingStatus::Working => {
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        Err(InterviewError::PollingTimeout {
            attempts: self.policy.max_attempts,
        })
    }
}
