use thiserror::Error;

/// Errors raised by the interview flow and its protocol components.
///
/// Variants are deliberately coarse: the UI layer decides between a retry
/// affordance (`PermissionDenied`, `UploadFailed`), a blocking message that
/// keeps local state (`ProcessingFailed`, `PollingTimeout`), a recovery path
/// (`RegistrationConflict`), and a return to the upload step
/// (`SessionBootstrap`).
#[derive(Debug, Error)]
pub enum InterviewError {
    /// Microphone access was refused or no device exists. Recoverable; the
    /// user can be prompted to try again.
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    /// Direct blob PUT to storage returned a non-2xx status. The take stays
    /// available locally so the whole submission can be retried.
    #[error("storage upload failed with status {status}")]
    UploadFailed { status: u16 },

    /// The backend reports this question's recording is already queued or
    /// processed. Recovered by resolving the next question through the
    /// timeout endpoint instead of failing the session.
    #[error("recording for question {question_id} already queued or done")]
    RegistrationConflict { question_id: u64 },

    /// The backend explicitly marked processing as failed. Terminal for this
    /// submission; never retried silently.
    #[error("processing failed for recording {recording_id}")]
    ProcessingFailed { recording_id: u64 },

    /// No terminal poll result within the attempt budget. The backend state
    /// is unknown, which is distinct from known-bad (`ProcessingFailed`).
    #[error("no processing result after {attempts} polls")]
    PollingTimeout { attempts: u32 },

    /// Session creation failed: missing inputs, bad resume file, or a
    /// backend error. Fatal to this attempt.
    #[error("session bootstrap failed: {0}")]
    SessionBootstrap(String),

    /// An operation was invoked in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Non-2xx API response that does not map to a more specific variant.
    #[error("backend returned status {status} ({code})")]
    Api { status: u16, code: String },

    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response payload")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InterviewError>;
