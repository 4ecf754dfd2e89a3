use super::machine::{FlowOutcome, InterviewFlow};
use crate::api::ApiClient;
use crate::capture::{CaptureDevice, MediaCapture};
use crate::config::Config;
use crate::error::{InterviewError, Result};
use crate::protocol::{PollingPolicy, SubmissionProtocol};
use crate::question::decode_next;
use crate::session::InterviewSession;
use crate::upload::ObjectUploader;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Wires the flow state machine to capture and to the backend protocol.
///
/// UI events map to the public methods; a once-per-second host tick drives
/// `tick`, which advances both the recording stopwatch and the answer budget
/// from the same source. Exclusive `&mut self` access keeps every operation
/// serialized, matching the single-threaded event model the backend expects.
pub struct InterviewDriver {
    flow: InterviewFlow,
    capture: MediaCapture,
    protocol: SubmissionProtocol,
    api: ApiClient,
}

impl InterviewDriver {
    pub fn new(
        api: ApiClient,
        device: Arc<dyn CaptureDevice>,
        session: InterviewSession,
        config: &Config,
    ) -> Self {
        let uploader = ObjectUploader::new(api.clone());
        let protocol = SubmissionProtocol::new(
            api.clone(),
            uploader,
            PollingPolicy::from_config(&config.polling),
        );
        let flow = InterviewFlow::new(session.session_id, session.first_question, &config.timing);

        Self {
            flow,
            capture: MediaCapture::new(device),
            protocol,
            api,
        }
    }

    pub fn flow(&self) -> &InterviewFlow {
        &self.flow
    }

    /// Elapsed recording seconds for the stopwatch display
    pub fn elapsed_recording_secs(&self) -> u64 {
        self.capture.elapsed_secs()
    }

    /// Start capturing an answer. A permission refusal leaves the flow idle
    /// so the user can be prompted to try again.
    pub async fn start_recording(&mut self) -> Result<()> {
        self.flow.note_recording_started()?;

        if let Err(e) = self.capture.start().await {
            self.flow.abort_recording();
            return Err(e);
        }
        Ok(())
    }

    pub fn pause_recording(&mut self) -> Result<()> {
        self.capture.pause()
    }

    pub fn resume_recording(&mut self) -> Result<()> {
        self.capture.resume()
    }

    /// Stop capture; the finished take moves the flow into review
    pub async fn stop_recording(&mut self) -> Result<()> {
        if let Some(take) = self.capture.stop().await? {
            self.flow.note_recording_stopped(take)?;
        }
        Ok(())
    }

    /// Discard the take and record again, if the retry budget allows it.
    /// Returns `false` when the budget is spent (no state changes).
    pub async fn retry_recording(&mut self) -> Result<bool> {
        if !self.flow.retry()? {
            return Ok(false);
        }
        if let Err(e) = self.capture.start().await {
            self.flow.abort_recording();
            return Err(e);
        }
        Ok(true)
    }

    /// Submit the reviewed take and resolve the next question.
    ///
    /// A duplicate-submission conflict is recovered through the timeout
    /// endpoint for the same question. Upload and processing failures leave
    /// the take in place so the user can submit again.
    pub async fn submit_answer(&mut self) -> Result<FlowOutcome> {
        let take = self.flow.begin_submission()?;
        let question_id = self.flow.question().id;
        let current_order = self.flow.question().order;

        match self.protocol.submit_answer(question_id, &take).await {
            Ok(result) => {
                let step = decode_next(result.next.as_ref(), current_order);
                Ok(self.flow.apply_resolution(step))
            }
            Err(InterviewError::RegistrationConflict { .. }) => {
                info!(
                    "Question {} already processed, recovering via timeout path",
                    question_id
                );
                self.resolve_via_timeout().await
            }
            Err(e) => {
                warn!("Submission failed for question {}: {}", question_id, e);
                self.flow.fail_submission();
                Err(e)
            }
        }
    }

    /// One second of wall clock. Advances the stopwatch and the answer
    /// budget together; on expiry, force-stops capture and resolves the next
    /// question through the timeout endpoint.
    pub async fn tick(&mut self) -> Result<Option<FlowOutcome>> {
        self.capture.tick();

        let Some(fired) = self.flow.tick() else {
            return Ok(None);
        };

        info!("Question {} timed out", fired.question_id);

        // Whatever was captured is abandoned; the timeout path resolves the
        // next question without an answer.
        if let Err(e) = self.capture.stop().await {
            warn!("Failed to stop capture after timeout: {}", e);
        }

        self.resolve_via_timeout().await.map(Some)
    }

    /// Resolve the next question through the timeout endpoint. If even that
    /// fails, the session is treated as finished rather than wedged.
    async fn resolve_via_timeout(&mut self) -> Result<FlowOutcome> {
        let question_id = self.flow.question().id;
        let current_order = self.flow.question().order;

        match self.api.question_timeout(question_id).await {
            Ok(result) => {
                let step = decode_next(result.next.as_ref(), current_order);
                Ok(self.flow.apply_resolution(step))
            }
            Err(e) => {
                error!(
                    "Timeout resolution failed for question {}: {}",
                    question_id, e
                );
                Ok(self
                    .flow
                    .apply_resolution(crate::question::NextStep::SessionComplete))
            }
        }
    }

    /// Leave the interview screen: stop capture, release the device, and
    /// make sure no timer keeps running.
    pub async fn teardown(&mut self) {
        if let Err(e) = self.capture.stop().await {
            warn!("Capture stop during teardown failed: {}", e);
        }
        self.flow.shutdown();
    }
}
