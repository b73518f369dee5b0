//! Interview session management
//!
//! This module provides the `InterviewSession` abstraction that manages:
//! - Session creation against the remote interview service
//! - Turn-taking between interviewer and candidate
//! - The append-only transcript of the conversation
//! - Session status and the snapshot handed to analysis

mod config;
mod session;
mod stats;
mod transcript;

pub use config::{InterviewConfig, InterviewType, Persona, Resume, VoiceProfile};
pub use session::{InterviewSession, TurnOutcome};
pub use stats::{Phase, SessionStatus, StagedInterview};
pub use transcript::{Speaker, Transcript, Utterance};
