use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::aggregate::aggregate;
use super::record::InterviewRecord;
use crate::backend::{CoachPayload, FeedbackPayload, InterviewBackend};
use crate::error::{InterviewError, InterviewResult};
use crate::media::RecordingPayload;
use crate::session::{InterviewSession, Phase, StagedInterview};
use crate::store::RecordStore;

/// Turns finished sessions into persisted interview records
#[derive(Clone)]
pub struct InterviewAnalyzer {
    backend: Arc<dyn InterviewBackend>,
    store: RecordStore,
    call_timeout: Duration,
}

impl InterviewAnalyzer {
    pub fn new(backend: Arc<dyn InterviewBackend>, store: RecordStore, call_timeout: Duration) -> Self {
        Self {
            backend,
            store,
            call_timeout,
        }
    }

    /// Stage the configuration + transcript of a finished session
    pub async fn complete(&self, session: &InterviewSession) -> InterviewResult<StagedInterview> {
        if !session.is_complete() {
            return Err(InterviewError::InvalidPhase {
                expected: Phase::Finished,
                actual: session.phase().await,
            });
        }

        let staged = session.snapshot().await?;
        self.store.stage_interview(&staged).await?;
        Ok(staged)
    }

    /// Consume the staged interview for `session_id` and analyze it.
    /// `Ok(None)` when nothing is staged for that session.
    pub async fn analyze_staged(
        &self,
        session_id: &str,
        video: Option<RecordingPayload>,
    ) -> InterviewResult<Option<InterviewRecord>> {
        match self.store.take_staged_interview(session_id).await? {
            Some(staged) => self.analyze(staged, video).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetch remote feedback and coaching, aggregate, and persist the record.
    ///
    /// Remote failures are absorbed: the record is built from fallback
    /// content instead and flagged in its provenance.
    pub async fn analyze(
        &self,
        staged: StagedInterview,
        video: Option<RecordingPayload>,
    ) -> InterviewResult<InterviewRecord> {
        let (feedback, coaching) = futures::join!(
            self.fetch_feedback(&staged.session_id),
            self.fetch_coaching(video.as_ref())
        );

        let record = aggregate(&staged, feedback, coaching);

        if record.provenance.is_fallback() {
            warn!(
                "Interview {} recorded with fallback content ({:?})",
                record.session_id, record.provenance
            );
        }

        self.store.save_record(&record).await?;

        info!(
            "Interview {} analyzed: score {} ({})",
            record.session_id, record.evaluation.overall_score, record.evaluation.overall_rating
        );

        Ok(record)
    }

    async fn fetch_feedback(&self, session_id: &str) -> Option<FeedbackPayload> {
        match tokio::time::timeout(self.call_timeout, self.backend.feedback(session_id)).await {
            Ok(Ok(feedback)) => Some(feedback),
            Ok(Err(e)) => {
                warn!("Feedback fetch for {} failed, using fallback: {}", session_id, e);
                None
            }
            Err(_) => {
                warn!("Feedback fetch for {} timed out, using fallback", session_id);
                None
            }
        }
    }

    async fn fetch_coaching(&self, video: Option<&RecordingPayload>) -> Option<CoachPayload> {
        let video = match video {
            Some(video) if !video.is_empty() => video,
            _ => {
                info!("No interview video supplied, using fallback coaching");
                return None;
            }
        };
        if !video.is_webm() {
            warn!(
                "Coaching needs a webm recording, got {}; using fallback",
                video.mime_type
            );
            return None;
        }

        match tokio::time::timeout(self.call_timeout, self.backend.coach(video)).await {
            Ok(Ok(coaching)) => Some(coaching),
            Ok(Err(e)) => {
                warn!("Coaching analysis failed, using fallback: {}", e);
                None
            }
            Err(_) => {
                warn!("Coaching analysis timed out, using fallback");
                None
            }
        }
    }
}
