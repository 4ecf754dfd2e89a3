// In-process mock of the interview backend, used by the protocol and
// session integration tests. Behavior knobs (poll counts before READY,
// forced PUT failures, registration conflicts, response envelopes) are
// plain atomics so tests can script scenarios.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

pub struct BackendState {
    base_url: Mutex<String>,

    /// Polls required before the result turns READY
    pub ready_after_polls: AtomicU32,
    /// Result stays WORKING forever
    pub never_ready: AtomicBool,
    /// Result turns FAILED instead of READY
    pub fail_processing: AtomicBool,
    /// Status returned by the storage PUT route
    pub put_status: AtomicU16,
    /// Registration returns the already-queued conflict
    pub conflict_on_register: AtomicBool,
    /// Wrap every response in a {"result": ...} envelope
    pub wrap_envelope: AtomicBool,

    /// `next` payload for a READY poll result
    pub poll_next: Mutex<Value>,
    /// `next` payload for the timeout endpoint
    pub timeout_next: Mutex<Value>,

    pub put_count: AtomicU32,
    pub register_count: AtomicU32,
    pub poll_count: AtomicU32,
    pub timeout_count: AtomicU32,

    /// Uploaded objects: key -> byte length
    pub uploads: Mutex<HashMap<String, usize>>,
}

impl BackendState {
    fn new() -> Self {
        Self {
            base_url: Mutex::new(String::new()),
            ready_after_polls: AtomicU32::new(1),
            never_ready: AtomicBool::new(false),
            fail_processing: AtomicBool::new(false),
            put_status: AtomicU16::new(200),
            conflict_on_register: AtomicBool::new(false),
            wrap_envelope: AtomicBool::new(false),
            poll_next: Mutex::new(Value::Null),
            timeout_next: Mutex::new(Value::Null),
            put_count: AtomicU32::new(0),
            register_count: AtomicU32::new(0),
            poll_count: AtomicU32::new(0),
            timeout_count: AtomicU32::new(0),
            uploads: Mutex::new(HashMap::new()),
        }
    }

    fn respond(&self, payload: Value) -> Json<Value> {
        if self.wrap_envelope.load(Ordering::SeqCst) {
            Json(json!({ "result": payload }))
        } else {
            Json(payload)
        }
    }

    fn storage_url(&self, key: &str) -> String {
        format!("{}/storage/{}", self.base_url.lock().unwrap(), key)
    }
}

/// A root-question resolution payload
pub fn root_next(id: u64, text: &str, order: u32) -> Value {
    json!({
        "type": "ROOT",
        "nextQuestionId": id,
        "nextQuestionText": text,
        "rootId": id,
        "rootText": text,
        "rootIndex": order,
    })
}

/// A follow-up resolution payload on the given root
pub fn follow_up_next(id: u64, text: &str, root_id: u64, root_text: &str) -> Value {
    json!({
        "type": "FOLLOW_UP",
        "nextQuestionId": id,
        "nextQuestionText": text,
        "rootId": root_id,
        "rootText": root_text,
        "rootIndex": null,
    })
}

/// A session-ending resolution payload
pub fn none_next() -> Value {
    json!({
        "type": "NONE",
        "nextQuestionId": null,
        "nextQuestionText": null,
        "rootId": null,
        "rootText": null,
        "rootIndex": null,
    })
}

pub struct MockBackend {
    pub state: Arc<BackendState>,
    addr: SocketAddr,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::new());

        let app = Router::new()
            .route("/api/presign/resume", post(presign_resume))
            .route("/api/presign/recording", post(presign_recording))
            .route(
                "/api/presign/recording/feedback-question",
                post(presign_recording),
            )
            .route("/api/interview-sessions", post(create_session))
            .route("/api/interview-sessions/:id", get(final_feedback))
            .route("/api/questions/:id/recordings", post(register_recording))
            .route("/api/questions/:id/timeout", post(question_timeout))
            .route("/api/recordings/:id/results", get(recording_result))
            .route(
                "/api/random-questions/peer/questions/:id",
                post(register_peer_recording),
            )
            .route(
                "/api/random-questions/peer/recordings/:id/feedbacks",
                get(peer_feedback_result),
            )
            .route("/api/subscribe", get(subscribe))
            .route("/storage/*key", put(put_object))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        *state.base_url.lock().unwrap() = format!("http://{addr}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend serve");
        });

        Self { state, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

async fn presign_resume(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let file_name = params
        .get("fileName")
        .cloned()
        .unwrap_or_else(|| "resume.pdf".to_string());
    let key = format!("resume/1/{file_name}");
    state.respond(json!({
        "uploadUrl": state.storage_url(&key),
        "key": key,
        "requiredHeaders": { "x-amz-meta-kind": "resume" },
    }))
}

async fn presign_recording(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let question_id = body["questionId"].as_u64().unwrap_or(0);
    let key = format!("recording/{question_id}/take.wav");
    state.respond(json!({
        "uploadUrl": state.storage_url(&key),
        "key": key,
        "requiredHeaders": {},
    }))
}

async fn put_object(
    State(state): State<Arc<BackendState>>,
    Path(key): Path<String>,
    body: Bytes,
) -> StatusCode {
    state.put_count.fetch_add(1, Ordering::SeqCst);
    let status = state.put_status.load(Ordering::SeqCst);
    if status >= 200 && status < 300 {
        state.uploads.lock().unwrap().insert(key, body.len());
    }
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn create_session(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if body["resumeId"].as_str().unwrap_or("").is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errorCode": "MISSING_RESUME", "message": "resumeId required" })),
        )
            .into_response();
    }

    state
        .respond(json!({
            "sessionId": 1,
            "firstQuestionId": 11,
            "firstQuestionText": "Tell me about yourself.",
        }))
        .into_response()
}

async fn register_recording(
    State(state): State<Arc<BackendState>>,
    Path(_question_id): Path<u64>,
) -> impl IntoResponse {
    state.register_count.fetch_add(1, Ordering::SeqCst);

    if state.conflict_on_register.load(Ordering::SeqCst) {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "errorCode": "ALREADY_IN_QUEUE_OR_DONE",
                "message": "recording already queued or done",
            })),
        )
            .into_response();
    }

    state
        .respond(json!({ "recordingId": 501, "status": "UPLOADED" }))
        .into_response()
}

async fn recording_result(
    State(state): State<Arc<BackendState>>,
    Path(_recording_id): Path<u64>,
) -> Json<Value> {
    let polls = state.poll_count.fetch_add(1, Ordering::SeqCst) + 1;

    if state.fail_processing.load(Ordering::SeqCst) {
        return state.respond(json!({ "sessionId": 1, "status": "FAILED", "next": null }));
    }

    let ready = !state.never_ready.load(Ordering::SeqCst)
        && polls >= state.ready_after_polls.load(Ordering::SeqCst);

    if ready {
        let next = state.poll_next.lock().unwrap().clone();
        state.respond(json!({ "sessionId": 1, "status": "READY", "next": next }))
    } else {
        state.respond(json!({ "sessionId": 1, "status": "WORKING", "next": null }))
    }
}

async fn question_timeout(
    State(state): State<Arc<BackendState>>,
    Path(_question_id): Path<u64>,
) -> Json<Value> {
    state.timeout_count.fetch_add(1, Ordering::SeqCst);
    let next = state.timeout_next.lock().unwrap().clone();
    state.respond(json!({ "sessionId": 1, "status": "READY", "next": next }))
}

async fn register_peer_recording(
    State(state): State<Arc<BackendState>>,
    Path(_question_id): Path<u64>,
) -> Json<Value> {
    state.respond(json!({ "recordingId": 701, "status": "UPLOADED" }))
}

async fn peer_feedback_result(
    State(state): State<Arc<BackendState>>,
    Path(_recording_id): Path<u64>,
) -> Json<Value> {
    state.respond(json!({
        "progressStatus": "READY",
        "result": {
            "questionId": 42,
            "questionText": "What is your greatest strength?",
            "aiFeedback": "Good pacing.",
            "selfFeedback": "Could be more concrete.",
            "presignedRecordingGetUrl": "http://example.invalid/peer/42.wav",
            "sttText": "I adapt quickly.",
        }
    }))
}

async fn subscribe() -> impl IntoResponse {
    let event = json!({
        "jobName": "Backend Engineer",
        "interviewName": "Mock interview #3",
        "questionNumber": 2,
        "peerFeedbackId": 901,
    });
    (
        [(axum::http::header::CONTENT_TYPE, "text/event-stream")],
        format!(": keep-alive\ndata: {event}\n\n"),
    )
}

async fn final_feedback(
    State(state): State<Arc<BackendState>>,
    Path(_session_id): Path<u64>,
) -> Json<Value> {
    state.respond(json!({
        "feedbackProgressStatus": "READY",
        "interviewSummary": {
            "interviewTitle": "Backend Engineer (NORMAL)",
            "timeoutQuestionNumber": 0,
            "questionSummaries": [
                {
                    "questionNumber": 1,
                    "rootQuestion": "Tell me about yourself.",
                    "aiFeedback": "Clear structure.",
                    "selfFeedback": null,
                    "qnaTurns": [
                        { "turn": "QUESTION", "content": "Tell me about yourself." },
                        { "turn": "ANSWER", "content": "I build backends." }
                    ]
                }
            ]
        },
        "feedbacks": [],
        "totalQuestions": 1,
        "timeoutCount": 0,
    }))
}
