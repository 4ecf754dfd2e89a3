pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod flow;
pub mod notify;
pub mod protocol;
pub mod question;
pub mod session;
pub mod timer;
pub mod upload;

pub use api::{ApiClient, InterviewMode, NextResolution, ProcessingStatus};
pub use capture::{CaptureDevice, CaptureState, FixtureDevice, MediaCapture, RecordedTake};
pub use config::Config;
pub use error::{InterviewError, Result};
pub use flow::{FlowOutcome, InterviewDriver, InterviewFlow, Phase};
pub use notify::NotificationChannel;
pub use protocol::{PollingPolicy, SubmissionProtocol};
pub use question::{decode_next, NextStep, Question};
pub use session::{InterviewSession, SessionClient};
pub use timer::{TimeoutCoordinator, TimerPhase, TimerState};
pub use upload::{ObjectUploader, ResourceKind};
