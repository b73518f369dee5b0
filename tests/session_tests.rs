// Integration tests for the turn-taking controller
//
// These tests drive an InterviewSession against a scripted backend and
// verify the transcript, phase and completion flag after each turn.

mod common;

use common::{answer_recording, ScriptedBackend};
use mock_interview::backend::BackendError;
use mock_interview::{
    InterviewConfig, InterviewError, InterviewSession, InterviewType, Persona, Phase, Speaker,
};
use std::sync::Arc;
use std::time::Duration;

fn session_with(backend: Arc<ScriptedBackend>) -> InterviewSession {
    let config = InterviewConfig::new(Persona::Jeff, InterviewType::Technical);
    InterviewSession::new(config, backend, Duration::from_secs(5))
}

#[tokio::test]
async fn test_start_records_introduction() {
    let backend = Arc::new(ScriptedBackend::new().with_start("abc123", "Hello, I'm Jeff..."));
    let session = session_with(backend.clone());

    let introduction = session.start().await.unwrap();

    assert_eq!(introduction, "Hello, I'm Jeff...");
    assert_eq!(session.session_id().await.as_deref(), Some("abc123"));
    assert_eq!(session.phase().await, Phase::Asking);

    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.utterances()[0].speaker, Speaker::Interviewer);
    assert_eq!(transcript.utterances()[0].text, "Hello, I'm Jeff...");

    let requests = backend.start_requests();
    assert_eq!(requests[0].interviewer, "jeff");
    assert_eq!(requests[0].interview_type, "technical");
}

#[tokio::test]
async fn test_start_rejects_incomplete_response() {
    let backend = Arc::new(ScriptedBackend::new().with_start("", "Hello"));
    let session = session_with(backend);

    let err = session.start().await.unwrap_err();

    assert!(matches!(err, InterviewError::SessionStart(_)));
    assert_eq!(session.phase().await, Phase::NotStarted);
    assert!(session.transcript().await.is_empty());
    assert_eq!(session.session_id().await, None);
}

#[tokio::test]
async fn test_start_failure_propagates_http_error() {
    let backend = Arc::new(ScriptedBackend::new().with_start_error(BackendError::Status {
        status: 400,
        body: "Must provide a PDF file".to_string(),
    }));
    let session = session_with(backend);

    match session.start().await {
        Err(InterviewError::SessionStart(msg)) => assert!(msg.contains("Must provide a PDF file")),
        other => panic!("expected SessionStart error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_start_twice_is_invalid() {
    let backend = Arc::new(ScriptedBackend::new().with_start("abc123", "Hello"));
    let session = session_with(backend);
    session.start().await.unwrap();

    let err = session.start().await.unwrap_err();
    assert_eq!(
        err,
        InterviewError::InvalidPhase {
            expected: Phase::NotStarted,
            actual: Phase::Asking,
        }
    );
}

#[tokio::test]
async fn test_submit_before_start_has_no_session() {
    let session = session_with(Arc::new(ScriptedBackend::new()));

    let err = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();
    assert_eq!(err, InterviewError::NoActiveSession);
}

#[tokio::test]
async fn test_follow_up_stays_on_question() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Good point.", true),
    );
    let session = session_with(backend.clone());
    session.start().await.unwrap();

    let outcome = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap();

    assert!(!outcome.is_finished);
    assert!(outcome.is_follow_up);
    assert_eq!(outcome.reply_text, "Good point.");
    assert_eq!(outcome.next_prompt, None);
    assert_eq!(backend.call_count("next_question"), 0);

    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.count(Speaker::Interviewer), 2);
    let last = transcript.last().unwrap();
    assert_eq!(last.speaker, Speaker::Interviewer);
    assert_eq!(last.text, "Good point.");
    assert!(!session.is_complete());
    assert_eq!(session.phase().await, Phase::Asking);
}

#[tokio::test]
async fn test_new_question_after_reply() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Thanks.", false)
            .with_question("How would you design a rate limiter?"),
    );
    let session = session_with(backend.clone());
    session.start().await.unwrap();

    let outcome = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap();

    assert!(!outcome.is_finished);
    assert_eq!(
        outcome.next_prompt.as_deref(),
        Some("How would you design a rate limiter?")
    );
    assert_eq!(
        outcome.spoken_text(),
        "Thanks. How would you design a rate limiter?"
    );
    assert_eq!(session.status().await.questions_asked, 1);
    assert_eq!(
        backend.calls(),
        vec!["start_interview", "next_response", "next_question"]
    );
}

#[tokio::test]
async fn test_closer_finishes_interview() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Interesting.", false)
            .with_closer("Thanks, that's all."),
    );
    let session = session_with(backend);
    session.start().await.unwrap();
    assert!(!session.is_complete());

    let before = session.transcript().await.len();
    let outcome = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap();

    assert!(outcome.is_finished);
    assert!(session.is_complete());
    assert_eq!(session.phase().await, Phase::Finished);

    let transcript = session.transcript().await;
    let added: Vec<_> = transcript.utterances()[before..]
        .iter()
        .filter(|u| u.speaker == Speaker::Interviewer)
        .map(|u| u.text.as_str())
        .collect();
    assert_eq!(added, vec!["Interesting.", "Thanks, that's all."]);

    // Completion never reverts, and no further turns are accepted
    let err = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, InterviewError::InvalidPhase { .. }));
    assert!(session.is_complete());
}

#[tokio::test]
async fn test_candidate_text_prefers_server_transcription() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Go on.", true),
    );
    let session = session_with(backend.clone());
    session.start().await.unwrap();

    session
        .submit_candidate_turn(answer_recording(), Some("browser guess".to_string()))
        .await
        .unwrap();

    let transcript = session.transcript().await;
    assert_eq!(transcript.utterances()[1].speaker, Speaker::Candidate);
    assert_eq!(transcript.utterances()[1].text, "answer to: Go on.");

    let request = &backend.turn_requests()[0];
    assert!(request.data.starts_with("data:audio/webm;base64,"));
    assert_eq!(request.transcription.as_deref(), Some("browser guess"));
}

#[tokio::test]
async fn test_successful_turns_alternate_speakers() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Tell me more.", true)
            .with_reply("Great.", false)
            .with_question("Next question?")
            .with_reply("Okay.", false)
            .with_closer("Bye."),
    );
    let session = session_with(backend);
    session.start().await.unwrap();

    let mut previous_len = session.transcript().await.len();
    loop {
        let outcome = session
            .submit_candidate_turn(answer_recording(), None)
            .await
            .unwrap();

        let len = session.transcript().await.len();
        assert!(len > previous_len);
        previous_len = len;

        if outcome.is_finished {
            break;
        }
    }

    let transcript = session.transcript().await;
    let utterances = transcript.utterances();
    assert_eq!(utterances[0].speaker, Speaker::Interviewer);
    for (i, utterance) in utterances.iter().enumerate() {
        if utterance.speaker == Speaker::Candidate {
            assert_eq!(utterances[i + 1].speaker, Speaker::Interviewer);
        }
    }
    for pair in utterances.windows(2) {
        assert!(pair[0].occurred_at <= pair[1].occurred_at);
    }
    assert_eq!(transcript.count(Speaker::Candidate), 3);
}

#[tokio::test]
async fn test_reply_failure_is_turn_error_and_retryable() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply_error(BackendError::Transport("connection reset".to_string()))
            .with_reply("Good point.", true),
    );
    let session = session_with(backend.clone());
    session.start().await.unwrap();

    let err = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, InterviewError::TurnProcessing(_)));
    assert_eq!(session.phase().await, Phase::Asking);
    assert_eq!(backend.call_count("next_question"), 0);

    // Failed turn still recorded the candidate's attempt; no reply was invented
    let transcript = session.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript.last().unwrap().speaker, Speaker::Candidate);

    let outcome = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap();
    assert_eq!(outcome.reply_text, "Good point.");
}

#[tokio::test]
async fn test_next_question_failure_propagates() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Thanks.", false)
            .with_question_error(BackendError::Status {
                status: 500,
                body: "LLM unavailable".to_string(),
            }),
    );
    let session = session_with(backend);
    session.start().await.unwrap();

    let err = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, InterviewError::TurnProcessing(_)));
    assert!(!session.is_complete());
    assert_eq!(session.phase().await, Phase::AwaitingNextQuestion);
    assert_eq!(session.transcript().await.last().unwrap().text, "Thanks.");
}

#[tokio::test]
async fn test_retry_after_next_question_failure_skips_answer() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Thanks.", false)
            .with_question_error(BackendError::Transport("connection reset".to_string()))
            .with_question("What is your biggest weakness?"),
    );
    let session = session_with(backend.clone());
    session.start().await.unwrap();

    session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();

    let outcome = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap();

    assert_eq!(outcome.reply_text, "Thanks.");
    assert_eq!(
        outcome.next_prompt.as_deref(),
        Some("What is your biggest weakness?")
    );
    assert_eq!(session.phase().await, Phase::Asking);
    assert_eq!(backend.call_count("next_response"), 1);
    assert_eq!(backend.call_count("next_question"), 2);

    let texts: Vec<(Speaker, String)> = session
        .transcript()
        .await
        .iter()
        .map(|u| (u.speaker, u.text.clone()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (Speaker::Interviewer, "Hello".to_string()),
            (Speaker::Candidate, "answer to: Thanks.".to_string()),
            (Speaker::Interviewer, "Thanks.".to_string()),
            (Speaker::Interviewer, "What is your biggest weakness?".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_recording_rejected() {
    let backend = Arc::new(ScriptedBackend::new().with_start("abc123", "Hello"));
    let session = session_with(backend.clone());
    session.start().await.unwrap();

    let empty = mock_interview::RecordingPayload::new(Vec::new(), "audio/webm");
    let err = session.submit_candidate_turn(empty, None).await.unwrap_err();

    assert!(matches!(err, InterviewError::MediaAccess(_)));
    assert_eq!(backend.call_count("next_response"), 0);
    assert_eq!(session.phase().await, Phase::Asking);
}

#[tokio::test]
async fn test_concurrent_submit_is_rejected_as_busy() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Good point.", true)
            .with_reply_delay(Duration::from_millis(200)),
    );
    let session = Arc::new(session_with(backend.clone()));
    session.start().await.unwrap();

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit_candidate_turn(answer_recording(), None).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(session.phase().await, Phase::RespondingToCandidate);

    let second = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();
    assert_eq!(second, InterviewError::SessionBusy);

    let outcome = first.await.unwrap().unwrap();
    assert_eq!(outcome.reply_text, "Good point.");
    assert_eq!(backend.call_count("next_response"), 1);
}

#[tokio::test]
async fn test_hung_backend_times_out() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Too late.", true)
            .with_reply_delay(Duration::from_secs(10)),
    );
    let config = InterviewConfig::new(Persona::Karen, InterviewType::Behavioral);
    let session = InterviewSession::new(config, backend, Duration::from_millis(100));
    session.start().await.unwrap();

    let err = session
        .submit_candidate_turn(answer_recording(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, InterviewError::TurnProcessing(_)));
    assert_eq!(session.phase().await, Phase::Asking);
}

#[tokio::test]
async fn test_cancel_aborts_outstanding_call() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .with_start("abc123", "Hello")
            .with_reply("Slow reply.", true)
            .with_reply_delay(Duration::from_secs(10))
            .with_reply("Fresh reply.", true),
    );
    let session = Arc::new(session_with(backend));
    session.start().await.unwrap();

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit_candidate_turn(answer_recording(), None).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    session.cancel().await;

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, InterviewError::TurnProcessing(ref msg) if msg.contains("cancelled")));
    assert_eq!(session.phase().await, Phase::Asking);
}
