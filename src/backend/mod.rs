//! Session Client for the remote interview/analysis service
//!
//! - POST /api/start_interview - Create a session, returns the introduction
//! - POST /api/interview/:id/next_response - Submit a recorded answer
//! - GET /api/interview/:id/next_question - Next question or closing statement
//! - GET /api/interview/:id/feedback - Answer evaluations and sentiment
//! - POST /api/coach - Body-language analysis of the interview video

pub mod client;
pub mod messages;

pub use client::{BackendError, HttpInterviewBackend, InterviewBackend};
pub use messages::{
    AnswerEvaluation, AnswerFeedback, CoachPayload, EmotionScore, FeedbackAnalysis,
    FeedbackPayload, JobMetadata, NextQuestionResponse, NextResponseReply, NextResponseRequest,
    NextStep, PerformanceMetrics, SentimentAnalysis, StartInterviewRequest,
    StartInterviewResponse,
};
