use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::{InterviewConfig, Resume};

// ============================================================================
// Interview flow
// ============================================================================

/// Sent as multipart form fields to `/api/start_interview`
#[derive(Debug, Clone, Serialize)]
pub struct StartInterviewRequest {
    pub interviewer: String,
    pub interview_type: String,
    pub focus_areas: Vec<String>,
    pub job_link: String,
    pub resume: Option<Resume>,
}

impl From<&InterviewConfig> for StartInterviewRequest {
    fn from(config: &InterviewConfig) -> Self {
        Self {
            interviewer: config.persona.as_str().to_string(),
            interview_type: config.interview_type.as_str().to_string(),
            focus_areas: config.focus_areas.clone(),
            job_link: config.job_link.clone(),
            resume: config.resume.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub introduction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextResponseRequest {
    /// Data-URL encoded recording of the candidate's answer
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextResponseReply {
    /// Server-side transcription of the submitted answer
    #[serde(default)]
    pub transcription: Option<String>,
    pub interviewer_reply: String,
    #[serde(default)]
    pub is_follow_up: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuestionResponse {
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub question_number: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub closer: Option<String>,
}

/// What the interviewer says after a non-follow-up reply
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    Question {
        text: String,
        number: Option<u32>,
        total: Option<u32>,
    },
    Closer(String),
}

impl NextQuestionResponse {
    /// `None` when the payload carries neither a question nor a closer
    pub fn into_step(self) -> Option<NextStep> {
        if self.finished {
            self.closer.map(NextStep::Closer)
        } else {
            self.question.map(|text| NextStep::Question {
                text,
                number: self.question_number,
                total: self.total_questions,
            })
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackPayload {
    #[serde(default)]
    pub analysis: FeedbackAnalysis,
    #[serde(default)]
    pub answers: Vec<AnswerFeedback>,
    #[serde(default)]
    pub full_transcript: Vec<BackendTranscriptEntry>,
    #[serde(default)]
    pub metadata: JobMetadata,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub sentiment_analysis: SentimentAnalysis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub performance_metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Fraction in [0, 1]
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub overall_rating: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerFeedback {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub evaluation: AnswerEvaluation,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub question_id: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendTranscriptEntry {
    pub content: String,
    #[serde(default)]
    pub question_id: usize,
    pub role: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_url: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(default)]
    pub dominant_emotion: String,
    /// Keyed by emotion name; iterated in key order
    #[serde(default)]
    pub emotion_analysis: BTreeMap<String, EmotionScore>,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionScore {
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub score: f64,
}

/// Body-language analysis of the uploaded interview video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachPayload {
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub eye_contact: f64,
    #[serde(default)]
    pub gestures: Vec<String>,
    #[serde(default)]
    pub posture: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
