//! HTTP API consumed by the interview UI
//!
//! This module exposes the interview orchestrator over JSON:
//! - POST /interviews - Start an interview, returns the introduction
//! - POST /interviews/:id/turns - Submit a recorded answer
//! - POST /interviews/:id/cancel - Abort the outstanding remote call
//! - POST /interviews/:id/analyze - Build and store the interview record
//! - GET /interviews - Interview history
//! - GET /interviews/:id - Stored interview record
//! - DELETE /interviews/:id - Abandon a live session, delete its record
//! - GET /interviews/:id/status - Live session status
//! - GET /interviews/:id/transcript - Live transcript
//! - PUT/GET /resumes/:kind - Stored résumés
//! - GET /personas/:persona/voice - Interviewer voice settings
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, StartInterviewReply};
pub use routes::create_router;
pub use state::AppState;
