use crate::config::TimingConfig;

/// Which budget is currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Pre-recording grace period: the user has not started recording yet
    Grace,
    /// Recording budget: running from the first start of capture
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    NotStarted,
    CountingDown,
    Expired,
    Cancelled,
}

/// Per-question wall-clock budget.
///
/// Counts down once per tick while the caller says the question is active
/// (the "should tick" predicate lives in the flow, as a pure function of its
/// state). Expiry fires at most once per arming; re-arming happens on a new
/// question or a retry. This budget is deliberately separate from the
/// elapsed-recording stopwatch even though both share the tick source.
#[derive(Debug, Clone)]
pub struct TimeoutCoordinator {
    state: TimerState,
    phase: TimerPhase,
    remaining_secs: u64,
    grace_secs: u64,
    answer_secs: u64,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Running,
    Expired,
    Idle,
}

impl TimeoutCoordinator {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: TimerState::NotStarted,
            phase: TimerPhase::Grace,
            remaining_secs: timing.grace_secs,
            grace_secs: timing.grace_secs,
            answer_secs: timing.answer_secs,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Arm the full grace budget for a newly activated question
    pub fn arm(&mut self) {
        self.state = TimerState::CountingDown;
        self.phase = TimerPhase::Grace;
        self.remaining_secs = self.grace_secs;
    }

    /// Switch from the grace budget to the recording budget. Called when
    /// recording starts for the first time on this question; later starts
    /// (resume after pause) keep the running budget.
    pub fn begin_answer_phase(&mut self) {
        if self.state == TimerState::CountingDown && self.phase == TimerPhase::Grace {
            self.phase = TimerPhase::Answer;
            self.remaining_secs = self.answer_secs;
        }
    }

    /// Re-arm the recording budget for a re-recording attempt
    pub fn reset_for_retry(&mut self) {
        self.state = TimerState::CountingDown;
        self.phase = TimerPhase::Answer;
        self.remaining_secs = self.answer_secs;
    }

    pub fn cancel(&mut self) {
        self.state = TimerState::Cancelled;
    }

    /// Advance one second if the caller's predicate allows it. Returns
    /// `Expired` exactly once per arming.
    pub fn tick(&mut self, should_tick: bool) -> TimerTick {
        if self.state != TimerState::CountingDown || !should_tick {
            return TimerTick::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            return TimerTick::Expired;
        }

        TimerTick::Running
    }
}
