use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Presigned write target for a direct client-to-storage upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    /// Time-limited URL accepting a PUT of the raw blob
    pub upload_url: String,
    /// Object key under which the blob will be stored
    pub key: String,
    /// Headers the storage service requires on the PUT
    #[serde(default)]
    pub required_headers: HashMap<String, String>,
}

/// Interview difficulty mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewMode {
    Normal,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub mode: InterviewMode,
    pub job_role: String,
    pub resume_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    pub session_id: u64,
    pub first_question_id: u64,
    pub first_question_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingPresignRequest {
    pub question_id: u64,
    pub content_type: String,
}

/// Enqueue acknowledgement for a registered recording. The status at this
/// point is always "UPLOADED"; terminal states only appear in poll results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredRecording {
    pub recording_id: u64,
    pub status: EnqueueStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnqueueStatus {
    Uploaded,
}

/// Asynchronous processing state reported by the result endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    Working,
    Ready,
    Failed,
}

/// Tag on a next-question resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextKind {
    FollowUp,
    Root,
    None,
}

/// Next-question resolution, shared by the poll and timeout endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextResolution {
    #[serde(rename = "type")]
    pub kind: NextKind,
    pub next_question_id: Option<u64>,
    pub next_question_text: Option<String>,
    pub root_id: Option<u64>,
    pub root_text: Option<String>,
    pub root_index: Option<u32>,
}

/// Poll/timeout response carrying the processing state and, once terminal,
/// the next-question resolution
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResult {
    pub session_id: u64,
    pub status: ProcessingStatus,
    pub next: Option<NextResolution>,
}

// ============================================================================
// Final feedback
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnKind {
    Question,
    Answer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnaTurn {
    pub turn: TurnKind,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub question_number: u32,
    pub root_question: String,
    pub ai_feedback: Option<String>,
    pub self_feedback: Option<String>,
    #[serde(default)]
    pub qna_turns: Vec<QnaTurn>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub interview_title: String,
    pub timeout_question_number: u32,
    #[serde(default)]
    pub question_summaries: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Improvement,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub feedback_type: FeedbackKind,
    pub question_id: u64,
    pub question: String,
    pub answer: String,
    pub feedback: String,
    pub timeout: bool,
}

/// Per-session summary with per-question feedback, available once the
/// backend finishes synthesizing it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalFeedback {
    pub feedback_progress_status: ProcessingStatus,
    pub interview_summary: Option<InterviewSummary>,
    #[serde(default)]
    pub feedbacks: Vec<FeedbackItem>,
    pub total_questions: u32,
    pub timeout_count: u32,
}

// ============================================================================
// Peer-feedback popup flow
// ============================================================================

/// Out-of-band "peer answered" push notification
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerNotification {
    pub job_name: String,
    pub interview_name: String,
    pub question_number: u32,
    pub peer_feedback_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerFeedback {
    pub question_id: u64,
    pub question_text: String,
    pub ai_feedback: String,
    pub self_feedback: String,
    pub presigned_recording_get_url: String,
    pub stt_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerFeedbackResult {
    pub progress_status: ProcessingStatus,
    pub result: Option<PeerFeedback>,
}

/// Error body shape used by the backend for non-2xx responses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error_code: Option<String>,
    pub message: Option<String>,
}
