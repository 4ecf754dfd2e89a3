use crate::capture::RecordedTake;
use crate::config::TimingConfig;
use crate::error::{InterviewError, Result};
use crate::question::{NextStep, Question};
use crate::timer::{TimeoutCoordinator, TimerTick};
use tracing::{info, warn};

/// Where the flow currently is for the active question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Question shown, nothing recorded yet
    Idle,
    /// Capture in progress (possibly paused)
    Recording,
    /// A take exists and can be played back, retried, or submitted;
    /// playback review suspends the budget for this whole phase
    Reviewing,
    /// A submission (or timeout resolution) is in flight
    Submitting,
    /// The session has no more content
    Complete,
}

/// Raised by `tick` when the answer budget ran out; the caller must stop
/// capture and resolve the next question through the timeout endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutFired {
    pub question_id: u64,
}

/// Result of applying a next-question resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    NextQuestion(Question),
    SessionComplete,
}

/// Drives question progression for one interview session.
///
/// All per-question state lives here: the current question, the recorded
/// take, the retry budget, and the time budget. A single `tick` entry point
/// advances the budget; whether the budget may advance is a pure function of
/// the phase (recording in progress, or no take yet — never while reviewing
/// a take). Timeout is unreachable while a submission is in flight, which is
/// what prevents a double submit.
pub struct InterviewFlow {
    session_id: u64,
    question: Question,
    orders_seen: Vec<u32>,
    phase: Phase,
    take: Option<RecordedTake>,
    retry_budget: u32,
    default_retry_budget: u32,
    timer: TimeoutCoordinator,
}

impl InterviewFlow {
    pub fn new(session_id: u64, first_question: Question, timing: &TimingConfig) -> Self {
        let mut timer = TimeoutCoordinator::new(timing);
        timer.arm();

        let orders_seen = vec![first_question.order];

        Self {
            session_id,
            question: first_question,
            orders_seen,
            phase: Phase::Idle,
            take: None,
            retry_budget: timing.retry_budget,
            default_retry_budget: timing.retry_budget,
            timer,
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    /// Every distinct root order shown so far, in the order first seen.
    /// Display-only; entries are never removed or reordered.
    pub fn orders_seen(&self) -> &[u32] {
        &self.orders_seen
    }

    pub fn take(&self) -> Option<&RecordedTake> {
        self.take.as_ref()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.timer.remaining_secs()
    }

    /// Whether the time budget may advance on the next tick: recording in
    /// progress, or the question is freshly shown with no take yet. Reviewing
    /// a finished take suspends the countdown.
    fn budget_runs(&self) -> bool {
        match self.phase {
            Phase::Recording => true,
            Phase::Idle => self.take.is_none(),
            _ => false,
        }
    }

    /// One second of wall-clock time. Returns the timeout event at most once
    /// per question activation.
    pub fn tick(&mut self) -> Option<TimeoutFired> {
        match self.timer.tick(self.budget_runs()) {
            TimerTick::Expired => {
                warn!(
                    "Answer budget expired for question {} (order {})",
                    self.question.id, self.question.order
                );
                // Block everything but the timeout resolution
                self.phase = Phase::Submitting;
                Some(TimeoutFired {
                    question_id: self.question.id,
                })
            }
            TimerTick::Running | TimerTick::Idle => None,
        }
    }

    /// User pressed record. Blocked once the budget has already expired.
    pub fn note_recording_started(&mut self) -> Result<()> {
        if self.timer.is_expired() {
            return Err(InterviewError::InvalidState("answer time budget exhausted"));
        }
        if self.phase != Phase::Idle {
            return Err(InterviewError::InvalidState("can only record from idle"));
        }

        self.timer.begin_answer_phase();
        self.phase = Phase::Recording;
        Ok(())
    }

    /// Capture failed to start after the phase already advanced; back out.
    pub fn abort_recording(&mut self) {
        if self.phase == Phase::Recording {
            self.phase = Phase::Idle;
        }
    }

    /// Capture stopped and produced a take; the flow moves to review
    pub fn note_recording_stopped(&mut self, take: RecordedTake) -> Result<()> {
        if self.phase != Phase::Recording {
            return Err(InterviewError::InvalidState("not recording"));
        }
        self.take = Some(take);
        self.phase = Phase::Reviewing;
        Ok(())
    }

    /// Attempt a re-recording. Consumes one unit of the retry budget,
    /// discards the previous take, and re-arms the recording budget. With no
    /// budget left this is a no-op returning `false`.
    pub fn retry(&mut self) -> Result<bool> {
        if self.phase != Phase::Reviewing {
            return Err(InterviewError::InvalidState("no take to retry"));
        }
        if self.retry_budget == 0 {
            return Ok(false);
        }

        self.retry_budget -= 1;
        self.take = None;
        self.timer.reset_for_retry();
        self.phase = Phase::Recording;

        info!(
            "Retrying question {} ({} retries left)",
            self.question.id, self.retry_budget
        );
        Ok(true)
    }

    /// Begin submitting the reviewed take. Rejects a second submission while
    /// one is outstanding, and rejects empty takes.
    pub fn begin_submission(&mut self) -> Result<RecordedTake> {
        if self.phase == Phase::Submitting {
            return Err(InterviewError::InvalidState("submission already in flight"));
        }
        if self.phase != Phase::Reviewing {
            return Err(InterviewError::InvalidState("no reviewed take to submit"));
        }

        let take = match &self.take {
            Some(take) if !take.is_empty() => take.clone(),
            _ => return Err(InterviewError::InvalidState("no recorded take to submit")),
        };

        self.phase = Phase::Submitting;
        Ok(take)
    }

    /// A submission failed in a recoverable way; the take stays available
    /// and the user can submit again without re-recording.
    pub fn fail_submission(&mut self) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Reviewing;
        }
    }

    /// Apply a decoded resolution: show the next question with all
    /// per-question state reset, or finish the session.
    pub fn apply_resolution(&mut self, step: NextStep) -> FlowOutcome {
        match step {
            NextStep::SessionComplete => {
                info!("Session {} complete", self.session_id);
                self.take = None;
                self.timer.cancel();
                self.phase = Phase::Complete;
                FlowOutcome::SessionComplete
            }
            NextStep::Question(next) => {
                info!(
                    "Next question {} (order {}, follow-up: {})",
                    next.id,
                    next.order,
                    next.is_follow_up()
                );

                if !self.orders_seen.contains(&next.order) {
                    self.orders_seen.push(next.order);
                }

                self.question = next.clone();
                self.take = None;
                self.retry_budget = self.default_retry_budget;
                self.timer.arm();
                self.phase = Phase::Idle;
                FlowOutcome::NextQuestion(next)
            }
        }
    }

    /// Tear the flow down: no timer may keep running afterwards
    pub fn shutdown(&mut self) {
        self.timer.cancel();
        self.phase = Phase::Complete;
    }
}
