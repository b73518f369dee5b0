use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::InterviewConfig;
use super::transcript::Transcript;

/// Turn-taking phase of an interview session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    /// Session creation in flight; the introduction is next
    Greeting,
    /// Interviewer has spoken; waiting for the candidate's answer
    Asking,
    /// Candidate answer submitted; waiting on reply / next question
    RespondingToCandidate,
    /// Answer accepted, but fetching the next question failed
    AwaitingNextQuestion,
    /// Closing statement delivered
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not_started",
            Phase::Greeting => "greeting",
            Phase::Asking => "asking",
            Phase::RespondingToCandidate => "responding_to_candidate",
            Phase::AwaitingNextQuestion => "awaiting_next_question",
            Phase::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a live session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: Option<String>,
    pub phase: Phase,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub utterance_count: usize,
    pub questions_asked: usize,
}

/// Raw configuration + transcript of a completed session, staged for
/// one-time consumption by analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedInterview {
    pub session_id: String,
    pub config: InterviewConfig,
    pub transcript: Transcript,
    pub completed_at: DateTime<Utc>,
}
