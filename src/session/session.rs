use super::config::InterviewConfig;
use super::stats::{Phase, SessionStatus, StagedInterview};
use super::transcript::{Speaker, Transcript};
use crate::backend::{
    BackendError, InterviewBackend, NextResponseRequest, NextStep, StartInterviewRequest,
};
use crate::error::{InterviewError, InterviewResult};
use crate::media::RecordingPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Result of one candidate turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Interviewer's direct reply to the answer
    pub reply_text: String,

    /// Next question, or the closing statement when finished
    pub next_prompt: Option<String>,

    pub is_follow_up: bool,
    pub is_finished: bool,
}

impl TurnOutcome {
    /// Everything the interviewer says this turn, in order
    pub fn spoken_text(&self) -> String {
        match &self.next_prompt {
            Some(prompt) if !self.reply_text.is_empty() => format!("{} {}", self.reply_text, prompt),
            Some(prompt) => prompt.clone(),
            None => self.reply_text.clone(),
        }
    }
}

struct SessionState {
    session_id: Option<String>,
    phase: Phase,
    transcript: Transcript,
    /// Interviewer reply of an accepted answer whose next question is still owed
    pending_reply: Option<String>,
}

/// One interview, driven turn by turn against the remote service.
///
/// At most one remote call is outstanding per session; overlapping
/// `start`/`submit_candidate_turn` calls fail with `SessionBusy`.
pub struct InterviewSession {
    /// Immutable after construction
    config: InterviewConfig,

    backend: Arc<dyn InterviewBackend>,

    /// Upper bound for each remote call
    call_timeout: Duration,

    created_at: DateTime<Utc>,

    state: Mutex<SessionState>,

    /// Set while a remote call is outstanding
    busy: AtomicBool,

    /// Monotonic false -> true once the closer is received
    finished: AtomicBool,

    questions_asked: AtomicUsize,

    /// Replaced after every `cancel()`
    cancel_token: Mutex<CancellationToken>,
}

/// Clears the busy flag when the operation completes or is dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl InterviewSession {
    pub fn new(
        config: InterviewConfig,
        backend: Arc<dyn InterviewBackend>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            config,
            backend,
            call_timeout,
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                session_id: None,
                phase: Phase::NotStarted,
                transcript: Transcript::new(),
                pending_reply: None,
            }),
            busy: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            questions_asked: AtomicUsize::new(0),
            cancel_token: Mutex::new(CancellationToken::new()),
        }
    }

    /// Create the remote session and record the interviewer's introduction
    pub async fn start(&self) -> InterviewResult<String> {
        let _busy = self.acquire()?;

        {
            let mut state = self.state.lock().await;
            if state.phase != Phase::NotStarted {
                return Err(InterviewError::InvalidPhase {
                    expected: Phase::NotStarted,
                    actual: state.phase,
                });
            }
            state.phase = Phase::Greeting;
        }

        info!(
            "Starting interview with {} ({})",
            self.config.persona,
            self.config.interview_type.as_str()
        );

        let request = StartInterviewRequest::from(&self.config);
        let token = self.current_token().await;
        let result = self
            .call(token, self.backend.start_interview(&request))
            .await
            .and_then(|response| {
                if response.session_id.trim().is_empty() {
                    Err("response is missing session_id".to_string())
                } else if response.introduction.trim().is_empty() {
                    Err("response is missing introduction".to_string())
                } else {
                    Ok(response)
                }
            });

        let mut state = self.state.lock().await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Interview start failed via {}: {}", self.backend.name(), e);
                state.phase = Phase::NotStarted;
                return Err(InterviewError::SessionStart(e));
            }
        };

        state
            .transcript
            .append(Speaker::Interviewer, response.introduction.clone(), now_ms());
        state.session_id = Some(response.session_id.clone());
        state.phase = Phase::Asking;

        info!("Interview session {} started", response.session_id);

        Ok(response.introduction)
    }

    /// Submit the candidate's recorded answer and advance the interview.
    ///
    /// A follow-up reply keeps the current question open. Otherwise the next
    /// question is fetched, or the closing statement once questions run out.
    /// If that fetch failed on an earlier turn, the answer was already
    /// accepted: only the fetch is retried and `recording` is ignored.
    pub async fn submit_candidate_turn(
        &self,
        recording: RecordingPayload,
        transcription: Option<String>,
    ) -> InterviewResult<TurnOutcome> {
        let _busy = self.acquire()?;

        let (session_id, submitted_at, pending_reply) = {
            let mut state = self.state.lock().await;
            let session_id = state
                .session_id
                .clone()
                .ok_or(InterviewError::NoActiveSession)?;

            let pending_reply = match state.phase {
                Phase::Asking => None,
                Phase::AwaitingNextQuestion => {
                    Some(state.pending_reply.clone().unwrap_or_default())
                }
                actual => {
                    return Err(InterviewError::InvalidPhase {
                        expected: Phase::Asking,
                        actual,
                    })
                }
            };
            if pending_reply.is_none() && recording.is_empty() {
                return Err(InterviewError::MediaAccess("recording is empty".to_string()));
            }

            state.phase = Phase::RespondingToCandidate;
            (session_id, now_ms(), pending_reply)
        };

        let token = self.current_token().await;

        let reply_text = match pending_reply {
            Some(reply_text) => {
                info!("Session {}: retrying next question", session_id);
                reply_text
            }
            None => {
                let request = NextResponseRequest {
                    data: recording.to_data_url(),
                    transcription: transcription.clone(),
                };

                let reply = match self
                    .call(token.clone(), self.backend.next_response(&session_id, &request))
                    .await
                {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!("Candidate turn failed for {}: {}", session_id, e);
                        let mut state = self.state.lock().await;
                        state.transcript.append(
                            Speaker::Candidate,
                            transcription.unwrap_or_default(),
                            submitted_at,
                        );
                        state.phase = Phase::Asking;
                        return Err(InterviewError::TurnProcessing(e));
                    }
                };

                let mut state = self.state.lock().await;
                let candidate_text = reply
                    .transcription
                    .clone()
                    .filter(|text| !text.trim().is_empty())
                    .or(transcription)
                    .unwrap_or_default();

                state
                    .transcript
                    .append(Speaker::Candidate, candidate_text, submitted_at);
                state
                    .transcript
                    .append(Speaker::Interviewer, reply.interviewer_reply.clone(), now_ms());

                if reply.is_follow_up {
                    state.phase = Phase::Asking;
                    return Ok(TurnOutcome {
                        reply_text: reply.interviewer_reply,
                        next_prompt: None,
                        is_follow_up: true,
                        is_finished: false,
                    });
                }

                reply.interviewer_reply
            }
        };

        let step = self
            .call(token, self.backend.next_question(&session_id))
            .await
            .and_then(|response| {
                response
                    .into_step()
                    .ok_or_else(|| "response carried neither a question nor a closer".to_string())
            });

        let mut state = self.state.lock().await;

        match step {
            Ok(NextStep::Question { text, number, total }) => {
                state
                    .transcript
                    .append(Speaker::Interviewer, text.clone(), now_ms());
                state.phase = Phase::Asking;
                state.pending_reply = None;
                self.questions_asked.fetch_add(1, Ordering::SeqCst);

                info!(
                    "Session {}: question {}/{}",
                    session_id,
                    number.map_or_else(|| "?".to_string(), |n| n.to_string()),
                    total.map_or_else(|| "?".to_string(), |n| n.to_string())
                );

                Ok(TurnOutcome {
                    reply_text,
                    next_prompt: Some(text),
                    is_follow_up: false,
                    is_finished: false,
                })
            }
            Ok(NextStep::Closer(closer)) => {
                state
                    .transcript
                    .append(Speaker::Interviewer, closer.clone(), now_ms());
                state.phase = Phase::Finished;
                state.pending_reply = None;
                self.finished.store(true, Ordering::SeqCst);

                info!("Session {} finished", session_id);

                Ok(TurnOutcome {
                    reply_text,
                    next_prompt: Some(closer),
                    is_follow_up: false,
                    is_finished: true,
                })
            }
            Err(e) => {
                warn!("Next question failed for {}: {}", session_id, e);
                state.phase = Phase::AwaitingNextQuestion;
                state.pending_reply = Some(reply_text);
                Err(InterviewError::TurnProcessing(e))
            }
        }
    }

    /// True once the closing statement has been received
    pub fn is_complete(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Abort the outstanding remote call, if any. The session stays usable.
    pub async fn cancel(&self) {
        let mut token = self.cancel_token.lock().await;
        token.cancel();
        *token = CancellationToken::new();
    }

    pub fn config(&self) -> &InterviewConfig {
        &self.config
    }

    pub async fn session_id(&self) -> Option<String> {
        self.state.lock().await.session_id.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    pub async fn transcript(&self) -> Transcript {
        self.state.lock().await.transcript.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        let state = self.state.lock().await;
        let duration = Utc::now().signed_duration_since(self.created_at);

        SessionStatus {
            session_id: state.session_id.clone(),
            phase: state.phase,
            is_complete: self.is_complete(),
            created_at: self.created_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            utterance_count: state.transcript.len(),
            questions_asked: self.questions_asked.load(Ordering::SeqCst),
        }
    }

    /// Configuration + transcript for the analysis stage
    pub async fn snapshot(&self) -> InterviewResult<StagedInterview> {
        let state = self.state.lock().await;
        let session_id = state
            .session_id
            .clone()
            .ok_or(InterviewError::NoActiveSession)?;

        Ok(StagedInterview {
            session_id,
            config: self.config.clone(),
            transcript: state.transcript.clone(),
            completed_at: Utc::now(),
        })
    }

    fn acquire(&self) -> InterviewResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| InterviewError::SessionBusy)?;
        Ok(BusyGuard(&self.busy))
    }

    async fn current_token(&self) -> CancellationToken {
        self.cancel_token.lock().await.clone()
    }

    /// Run one remote call, bounded by the timeout and the cancel token
    async fn call<T>(
        &self,
        token: CancellationToken,
        request: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, String> {
        tokio::select! {
            _ = token.cancelled() => Err("request cancelled".to_string()),
            result = tokio::time::timeout(self.call_timeout, request) => match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!(
                    "no response within {:.1}s",
                    self.call_timeout.as_secs_f64()
                )),
            },
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
