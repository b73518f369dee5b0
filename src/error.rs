//! Error taxonomy for interview sessions
//!
//! Every failure is scoped to a single interview session; none of these
//! are fatal to the process.

use thiserror::Error;

use crate::session::Phase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterviewError {
    /// Remote session creation failed or returned an incomplete payload
    #[error("Failed to start interview session: {0}")]
    SessionStart(String),

    /// A mid-interview remote call failed, timed out or was cancelled
    #[error("Failed to process candidate turn: {0}")]
    TurnProcessing(String),

    /// Another remote call is still outstanding for this session
    #[error("Interview session is busy with another request")]
    SessionBusy,

    /// Camera/microphone recording unavailable or unreadable
    #[error("Media access error: {0}")]
    MediaAccess(String),

    /// The session has not been started
    #[error("No active interview session")]
    NoActiveSession,

    /// No interview record stored under this session id
    #[error("Interview record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid session phase: expected {expected}, found {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    /// Reading or writing the persisted key/value store failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl InterviewError {
    /// Whether the caller may retry the same operation on the same session
    pub fn is_retryable(&self) -> bool {
        match self {
            InterviewError::SessionStart(_) => true,
            InterviewError::TurnProcessing(_) => true,
            InterviewError::SessionBusy => true,
            InterviewError::MediaAccess(_) => false,
            InterviewError::NoActiveSession => false,
            InterviewError::RecordNotFound(_) => false,
            InterviewError::InvalidPhase { .. } => false,
            InterviewError::Storage(_) => false,
        }
    }

    /// Message suitable for showing to the candidate
    pub fn user_message(&self) -> String {
        match self {
            InterviewError::SessionStart(_) => {
                "Could not start the interview. Please try again.".to_string()
            }
            InterviewError::TurnProcessing(_) => {
                "The interviewer could not process your answer. Please record it again.".to_string()
            }
            InterviewError::SessionBusy => {
                "Still waiting on the interviewer. Please wait a moment.".to_string()
            }
            InterviewError::MediaAccess(_) => {
                "Camera or microphone unavailable. Please grant recording permissions.".to_string()
            }
            InterviewError::NoActiveSession => "No interview is in progress.".to_string(),
            InterviewError::RecordNotFound(_) => "That interview could not be found.".to_string(),
            InterviewError::InvalidPhase { .. } => {
                "That action is not available at this point in the interview.".to_string()
            }
            InterviewError::Storage(_) => "Could not save interview results.".to_string(),
        }
    }
}

impl From<std::io::Error> for InterviewError {
    fn from(e: std::io::Error) -> Self {
        InterviewError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for InterviewError {
    fn from(e: serde_json::Error) -> Self {
        InterviewError::Storage(e.to_string())
    }
}

pub type InterviewResult<T> = Result<T, InterviewError>;
