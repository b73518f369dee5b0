use super::state::AppState;
use crate::analysis::{InterviewListItem, InterviewRecord};
use crate::error::InterviewError;
use crate::media::RecordingPayload;
use crate::session::{
    InterviewConfig, InterviewSession, Persona, Resume, SessionStatus, Transcript, TurnOutcome,
    VoiceProfile,
};
use crate::store::ResumeKind;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartInterviewBody {
    #[serde(flatten)]
    pub config: InterviewConfig,

    /// Use a stored résumé when none is attached
    #[serde(default)]
    pub resume_kind: Option<ResumeKind>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartInterviewReply {
    pub session_id: String,
    pub introduction: String,
    pub voice: VoiceProfile,
}

#[derive(Debug, Deserialize)]
pub struct CandidateTurnBody {
    /// Base64 or data-URL encoded answer recording
    pub audio: String,

    #[serde(default)]
    pub mime_type: Option<String>,

    /// Client-side transcription, if the browser produced one
    #[serde(default)]
    pub transcription: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
    /// Base64 or data-URL encoded interview video for coaching
    #[serde(default)]
    pub video: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeUpload {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Text to show the candidate
    pub message: String,

    pub retryable: bool,
}

impl IntoResponse for InterviewError {
    fn into_response(self) -> Response {
        let status = match &self {
            InterviewError::SessionStart(_) | InterviewError::TurnProcessing(_) => {
                StatusCode::BAD_GATEWAY
            }
            InterviewError::SessionBusy | InterviewError::InvalidPhase { .. } => {
                StatusCode::CONFLICT
            }
            InterviewError::MediaAccess(_) => StatusCode::BAD_REQUEST,
            InterviewError::NoActiveSession | InterviewError::RecordNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            InterviewError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                message: self.user_message(),
                retryable: self.is_retryable(),
            }),
        )
            .into_response()
    }
}

async fn live_session(state: &AppState, session_id: &str) -> Result<Arc<InterviewSession>, InterviewError> {
    state
        .session(session_id)
        .await
        .ok_or(InterviewError::NoActiveSession)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /interviews
/// Create a session with the remote service and return the introduction
pub async fn start_interview(
    State(state): State<AppState>,
    Json(body): Json<StartInterviewBody>,
) -> Result<Json<StartInterviewReply>, InterviewError> {
    let mut config = body.config;

    if config.resume.is_none() {
        if let Some(kind) = body.resume_kind {
            config.resume = state.store.resume(kind).await?;
        }
    }

    let voice = config.persona.voice_profile();
    let session = Arc::new(InterviewSession::new(
        config,
        Arc::clone(&state.backend),
        state.call_timeout,
    ));

    let introduction = session.start().await?;
    let session_id = session
        .session_id()
        .await
        .ok_or(InterviewError::NoActiveSession)?;

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), session);
    }

    info!("Interview {} started", session_id);

    Ok(Json(StartInterviewReply {
        session_id,
        introduction,
        voice,
    }))
}

/// POST /interviews/:session_id/turns
/// Submit the candidate's recorded answer
pub async fn submit_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<CandidateTurnBody>,
) -> Result<Json<TurnOutcome>, InterviewError> {
    let session = live_session(&state, &session_id).await?;

    let mime = body.mime_type.as_deref().unwrap_or("audio/webm");
    let recording = RecordingPayload::from_base64(&body.audio, mime)?;

    let outcome = session
        .submit_candidate_turn(recording, body.transcription)
        .await?;

    // The live session still serves `analyze` if staging failed
    if outcome.is_finished {
        if let Err(e) = state.analyzer.complete(&session).await {
            warn!("Could not stage finished interview {}: {}", session_id, e);
        }
    }

    Ok(Json(outcome))
}

/// POST /interviews/:session_id/cancel
/// Abort the outstanding remote call of a session
pub async fn cancel_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, InterviewError> {
    let session = live_session(&state, &session_id).await?;
    session.cancel().await;
    Ok(StatusCode::ACCEPTED)
}

/// GET /interviews/:session_id/status
pub async fn get_interview_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatus>, InterviewError> {
    let session = live_session(&state, &session_id).await?;
    Ok(Json(session.status().await))
}

/// GET /interviews/:session_id/transcript
/// Transcript accumulated so far
pub async fn get_interview_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Transcript>, InterviewError> {
    let session = live_session(&state, &session_id).await?;
    Ok(Json(session.transcript().await))
}

/// POST /interviews/:session_id/analyze
/// Build and persist the interview record of a finished session
pub async fn analyze_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Option<Json<AnalyzeBody>>,
) -> Result<Json<InterviewRecord>, InterviewError> {
    let video = match body.and_then(|Json(body)| body.video) {
        Some(encoded) => {
            let video = RecordingPayload::from_base64(&encoded, "video/webm")?;
            if !video.is_webm() {
                return Err(InterviewError::MediaAccess(format!(
                    "interview video must be webm, got {}",
                    video.mime_type
                )));
            }
            Some(video)
        }
        None => None,
    };

    let live = state.session(&session_id).await;
    if let Some(session) = &live {
        if !session.is_complete() {
            return Err(InterviewError::InvalidPhase {
                expected: crate::session::Phase::Finished,
                actual: session.phase().await,
            });
        }
    }

    let record = match state
        .analyzer
        .analyze_staged(&session_id, video.clone())
        .await?
    {
        Some(record) => record,
        None => match &live {
            // Finished, but its staged entry was displaced by a later session
            Some(session) => state.analyzer.analyze(session.snapshot().await?, video).await?,
            None => return Err(InterviewError::NoActiveSession),
        },
    };

    {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id);
    }

    Ok(Json(record))
}

/// DELETE /interviews/:session_id
/// Abandon a live session and delete its stored record
pub async fn discard_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, InterviewError> {
    let live = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    if let Some(session) = &live {
        session.cancel().await;
        info!("Interview {} discarded at phase {}", session_id, session.phase().await);
    }

    let stored = state.store.remove_record(&session_id).await?;

    if live.is_none() && !stored {
        return Err(InterviewError::RecordNotFound(session_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /interviews
/// Interview history, newest first
pub async fn list_interviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<InterviewListItem>>, InterviewError> {
    Ok(Json(state.store.list_records().await?))
}

/// GET /interviews/:session_id
pub async fn get_interview(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<InterviewRecord>, InterviewError> {
    state
        .store
        .get_record(&session_id)
        .await?
        .map(Json)
        .ok_or(InterviewError::RecordNotFound(session_id))
}

/// PUT /resumes/:kind
pub async fn put_resume(
    State(state): State<AppState>,
    Path(kind): Path<ResumeKind>,
    Json(upload): Json<ResumeUpload>,
) -> Result<Json<Resume>, InterviewError> {
    RecordingPayload::from_base64(&upload.content, "application/pdf")
        .map_err(|_| InterviewError::MediaAccess("résumé content is not base64".to_string()))?;

    let resume = Resume {
        name: upload.name,
        content: upload.content,
        upload_date: Utc::now(),
    };

    state.store.save_resume(kind, &resume).await?;
    Ok(Json(resume))
}

/// GET /resumes/:kind
pub async fn get_resume(
    State(state): State<AppState>,
    Path(kind): Path<ResumeKind>,
) -> Result<Json<Resume>, InterviewError> {
    state
        .store
        .resume(kind)
        .await?
        .map(Json)
        .ok_or_else(|| InterviewError::RecordNotFound(kind.key().to_string()))
}

/// GET /personas/:persona/voice
/// Text-to-speech settings for an interviewer
pub async fn get_voice_profile(Path(persona): Path<String>) -> impl IntoResponse {
    match persona.parse::<Persona>() {
        Ok(persona) => (StatusCode::OK, Json(persona.voice_profile())).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e,
                message: "Unknown interviewer.".to_string(),
                retryable: false,
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
