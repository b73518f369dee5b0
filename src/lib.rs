pub mod analysis;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod media;
pub mod session;
pub mod store;

pub use analysis::{aggregate, InterviewAnalyzer, InterviewListItem, InterviewRecord};
pub use backend::{BackendError, HttpInterviewBackend, InterviewBackend};
pub use config::Config;
pub use error::{InterviewError, InterviewResult};
pub use http::{create_router, AppState};
pub use media::RecordingPayload;
pub use session::{
    InterviewConfig, InterviewSession, InterviewType, Persona, Phase, Speaker, StagedInterview,
    Transcript, TurnOutcome, Utterance,
};
pub use store::{KvStore, RecordStore, ResumeKind};
