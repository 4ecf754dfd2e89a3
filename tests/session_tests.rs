// Session bootstrap tests: resume validation and upload, session
// creation, response envelopes, and the final feedback fetch.

mod common;

use bytes::Bytes;
use common::MockBackend;
use prepfrog::api::{ApiClient, InterviewMode, ProcessingStatus};
use prepfrog::error::InterviewError;
use prepfrog::session::SessionClient;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn client_for(backend: &MockBackend) -> SessionClient {
    let api = ApiClient::new(&backend.base_url(), Duration::from_secs(5)).expect("api client");
    SessionClient::new(api)
}

#[tokio::test]
async fn resume_upload_returns_the_storage_key() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    let key = client
        .upload_resume("jane-doe.pdf", Bytes::from_static(b"%PDF-1.7 content"))
        .await
        .expect("resume upload");

    assert_eq!(key, "resume/1/jane-doe.pdf");

    // The blob actually landed in storage, honoring the presigned target
    let uploads = backend.state.uploads.lock().unwrap();
    assert_eq!(uploads.get("resume/1/jane-doe.pdf"), Some(&16usize));
}

#[tokio::test]
async fn unsupported_resume_file_types_are_rejected_before_upload() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    for name in ["resume.txt", "resume.png", "resume"] {
        let err = client
            .upload_resume(name, Bytes::from_static(b"nope"))
            .await
            .expect_err("must reject");
        assert!(
            matches!(err, InterviewError::SessionBootstrap(_)),
            "unexpected error for {name}: {err}"
        );
    }

    // Nothing reached the backend
    assert_eq!(backend.state.put_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn docx_resumes_are_accepted() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    let key = client
        .upload_resume("resume.DOCX", Bytes::from_static(b"PK word doc"))
        .await
        .expect("docx upload");
    assert_eq!(key, "resume/1/resume.DOCX");
}

#[tokio::test]
async fn session_creation_yields_the_first_question() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    let key = client
        .upload_resume("resume.pdf", Bytes::from_static(b"%PDF"))
        .await
        .expect("resume upload");
    let session = client
        .create_session(&key, "Backend Engineer", InterviewMode::Hard)
        .await
        .expect("session creation");

    assert_eq!(session.session_id, 1);
    assert_eq!(session.first_question.id, 11);
    assert_eq!(session.first_question.main_text, "Tell me about yourself.");
    assert_eq!(session.first_question.order, 1);
    assert!(!session.first_question.is_follow_up());
}

#[tokio::test]
async fn blank_inputs_fail_bootstrap_without_a_request() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    let err = client
        .create_session("resume/1/resume.pdf", "  ", InterviewMode::Normal)
        .await
        .expect_err("blank job role");
    assert!(matches!(err, InterviewError::SessionBootstrap(_)));

    let err = client
        .create_session("", "Backend Engineer", InterviewMode::Normal)
        .await
        .expect_err("missing resume key");
    assert!(matches!(err, InterviewError::SessionBootstrap(_)));
}

#[tokio::test]
async fn backend_rejection_maps_to_bootstrap_error() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    // The mock rejects an empty resumeId; "." has no file stem, so the
    // derived resume id comes out empty
    let err = client
        .create_session(".", "Backend Engineer", InterviewMode::Normal)
        .await
        .expect_err("backend must reject");
    assert!(
        matches!(err, InterviewError::SessionBootstrap(_)),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn enveloped_responses_are_unwrapped_transparently() {
    let backend = MockBackend::spawn().await;
    backend.state.wrap_envelope.store(true, Ordering::SeqCst);

    let client = client_for(&backend);

    let key = client
        .upload_resume("resume.pdf", Bytes::from_static(b"%PDF"))
        .await
        .expect("resume upload with envelope");
    let session = client
        .create_session(&key, "Backend Engineer", InterviewMode::Normal)
        .await
        .expect("session creation with envelope");

    assert_eq!(session.session_id, 1);
    assert_eq!(session.first_question.main_text, "Tell me about yourself.");
}

#[tokio::test]
async fn final_feedback_decodes_the_session_summary() {
    let backend = MockBackend::spawn().await;
    let client = client_for(&backend);

    let feedback = client.final_feedback(1).await.expect("final feedback");

    assert_eq!(feedback.feedback_progress_status, ProcessingStatus::Ready);
    assert_eq!(feedback.total_questions, 1);
    assert_eq!(feedback.timeout_count, 0);

    let summary = feedback.interview_summary.expect("summary present");
    assert_eq!(summary.interview_title, "Backend Engineer (NORMAL)");
    assert_eq!(summary.question_summaries.len(), 1);

    let question = &summary.question_summaries[0];
    assert_eq!(question.question_number, 1);
    assert_eq!(question.qna_turns.len(), 2);
}
