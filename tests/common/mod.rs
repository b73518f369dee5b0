// Shared test fixtures: a scripted interview backend and sample payloads
#![allow(dead_code)]

use async_trait::async_trait;
use mock_interview::backend::{
    BackendError, CoachPayload, FeedbackPayload, InterviewBackend, NextQuestionResponse,
    NextResponseReply, NextResponseRequest, StartInterviewRequest, StartInterviewResponse,
};
use mock_interview::media::RecordingPayload;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Backend that replays queued responses and records every call
#[derive(Default)]
pub struct ScriptedBackend {
    starts: Mutex<VecDeque<Result<StartInterviewResponse, BackendError>>>,
    replies: Mutex<VecDeque<Result<NextResponseReply, BackendError>>>,
    questions: Mutex<VecDeque<Result<NextQuestionResponse, BackendError>>>,
    feedback: Mutex<Option<Result<FeedbackPayload, BackendError>>>,
    coaching: Mutex<Option<Result<CoachPayload, BackendError>>>,
    reply_delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
    start_requests: Mutex<Vec<StartInterviewRequest>>,
    turn_requests: Mutex<Vec<NextResponseRequest>>,
}

fn exhausted<T>() -> Result<T, BackendError> {
    Err(BackendError::Status {
        status: 500,
        body: "script exhausted".to_string(),
    })
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(self, session_id: &str, introduction: &str) -> Self {
        self.starts.lock().unwrap().push_back(Ok(StartInterviewResponse {
            session_id: session_id.to_string(),
            introduction: introduction.to_string(),
        }));
        self
    }

    pub fn with_start_error(self, error: BackendError) -> Self {
        self.starts.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_reply(self, reply: &str, is_follow_up: bool) -> Self {
        self.replies.lock().unwrap().push_back(Ok(NextResponseReply {
            transcription: Some(format!("answer to: {}", reply)),
            interviewer_reply: reply.to_string(),
            is_follow_up,
        }));
        self
    }

    pub fn with_reply_error(self, error: BackendError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_question(self, question: &str) -> Self {
        self.questions.lock().unwrap().push_back(Ok(NextQuestionResponse {
            finished: false,
            question: Some(question.to_string()),
            question_number: Some(1),
            total_questions: Some(3),
            closer: None,
        }));
        self
    }

    pub fn with_closer(self, closer: &str) -> Self {
        self.questions.lock().unwrap().push_back(Ok(NextQuestionResponse {
            finished: true,
            closer: Some(closer.to_string()),
            ..NextQuestionResponse::default()
        }));
        self
    }

    pub fn with_question_error(self, error: BackendError) -> Self {
        self.questions.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_feedback(self, feedback: FeedbackPayload) -> Self {
        *self.feedback.lock().unwrap() = Some(Ok(feedback));
        self
    }

    pub fn with_coaching(self, coaching: CoachPayload) -> Self {
        *self.coaching.lock().unwrap() = Some(Ok(coaching));
        self
    }

    /// Delay every `next_response` call
    pub fn with_reply_delay(self, delay: Duration) -> Self {
        *self.reply_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn start_requests(&self) -> Vec<StartInterviewRequest> {
        self.start_requests.lock().unwrap().clone()
    }

    pub fn turn_requests(&self) -> Vec<NextResponseRequest> {
        self.turn_requests.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl InterviewBackend for ScriptedBackend {
    async fn start_interview(
        &self,
        request: &StartInterviewRequest,
    ) -> Result<StartInterviewResponse, BackendError> {
        self.record("start_interview");
        self.start_requests.lock().unwrap().push(request.clone());
        let next = self.starts.lock().unwrap().pop_front();
        next.unwrap_or_else(exhausted)
    }

    async fn next_response(
        &self,
        _session_id: &str,
        request: &NextResponseRequest,
    ) -> Result<NextResponseReply, BackendError> {
        self.record("next_response");
        self.turn_requests.lock().unwrap().push(request.clone());

        let delay = *self.reply_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(exhausted)
    }

    async fn next_question(&self, _session_id: &str) -> Result<NextQuestionResponse, BackendError> {
        self.record("next_question");
        let next = self.questions.lock().unwrap().pop_front();
        next.unwrap_or_else(exhausted)
    }

    async fn feedback(&self, _session_id: &str) -> Result<FeedbackPayload, BackendError> {
        self.record("feedback");
        let feedback = self.feedback.lock().unwrap().clone();
        feedback.unwrap_or_else(exhausted)
    }

    async fn coach(&self, _recording: &RecordingPayload) -> Result<CoachPayload, BackendError> {
        self.record("coach");
        let coaching = self.coaching.lock().unwrap().clone();
        coaching.unwrap_or_else(exhausted)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn answer_recording() -> RecordingPayload {
    RecordingPayload::new(vec![0x1a, 0x45, 0xdf, 0xa3], "audio/webm")
}

pub const SAMPLE_SUMMARY: &str = "The candidate was well prepared.\n\n\
    **Strengths:**\n\
    1. **Clear communication**\n\
    2. **Problem decomposition**\n\n\
    **Areas for Improvement:**\n\
    1. **Concrete examples**\n\
    2. Time management\n\n\
    **Patterns Observed:**\n\
    1. Strong starts, weaker endings";

pub fn sample_feedback() -> FeedbackPayload {
    let json = serde_json::json!({
        "analysis": {
            "overall_feedback": SAMPLE_SUMMARY,
            "performance_metrics": { "average_score": 0.85, "overall_rating": "Good" }
        },
        "answers": [
            {
                "answer": "I would shard by tenant.",
                "evaluation": {
                    "areas_for_improvement": ["Discuss failure modes", "Quantify load"],
                    "grade": "B",
                    "strengths": ["Clear structure"],
                    "suggestions": []
                },
                "question": "How would you scale the service?",
                "question_id": 0
            },
            {
                "answer": "I led the migration.",
                "evaluation": {
                    "areas_for_improvement": [],
                    "grade": "A",
                    "strengths": ["Ownership", "Impact"],
                    "suggestions": []
                },
                "question": "",
                "question_id": 1
            }
        ],
        "full_transcript": [],
        "metadata": {
            "company": "Acme",
            "job_title": "Backend Engineer",
            "job_url": "https://acme.example/jobs/1",
            "job_description": "Build services."
        },
        "questions": ["How would you scale the service?", "Tell me about a project you led."],
        "sentiment_analysis": {
            "dominant_emotion": "confidence",
            "emotion_analysis": {
                "confidence": { "evidence": "Steady voice", "score": 78 },
                "nervousness": { "evidence": "Some filler words", "score": 120 }
            },
            "feedback": "Mostly calm."
        }
    });

    serde_json::from_value(json).unwrap()
}

pub fn sample_coaching() -> CoachPayload {
    CoachPayload {
        duration: 600.0,
        eye_contact: 72.4,
        gestures: vec![
            "Hand movements: 4 times".to_string(),
            "Head nods: 6 times".to_string(),
            "Facial expressions: 9 times".to_string(),
        ],
        posture: 88.0,
        recommendations: vec!["Sit up a little straighter".to_string()],
    }
}
