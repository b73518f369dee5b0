use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::kv::KvStore;
use crate::analysis::{InterviewListItem, InterviewRecord};
use crate::error::InterviewResult;
use crate::session::{Resume, StagedInterview};

/// Interview records keyed by session id
pub const INTERVIEWS_KEY: &str = "interviews";
/// Most recently completed session awaiting analysis
pub const STAGED_INTERVIEW_KEY: &str = "interviewData";
pub const GENERAL_RESUME_KEY: &str = "generalResume";
pub const SPECIAL_RESUME_KEY: &str = "specialResume";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeKind {
    /// Default résumé used for any interview
    General,
    /// Résumé tailored to a specific posting
    Special,
}

impl ResumeKind {
    pub fn key(&self) -> &'static str {
        match self {
            ResumeKind::General => GENERAL_RESUME_KEY,
            ResumeKind::Special => SPECIAL_RESUME_KEY,
        }
    }
}

/// Typed view over the persisted key/value layout
#[derive(Clone)]
pub struct RecordStore {
    kv: KvStore,
}

type RecordMap = BTreeMap<String, InterviewRecord>;

impl RecordStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    pub fn in_memory() -> Self {
        Self::new(KvStore::in_memory())
    }

    /// Write `record` under its session id, replacing any previous record whole
    pub async fn save_record(&self, record: &InterviewRecord) -> InterviewResult<()> {
        let session_id = record.session_id.clone();
        let record = record.clone();

        let replaced = self
            .kv
            .update(INTERVIEWS_KEY, move |records: &mut RecordMap| {
                records.insert(record.session_id.clone(), record).is_some()
            })
            .await?;

        if replaced {
            info!("Replaced interview record {}", session_id);
        } else {
            info!("Saved interview record {}", session_id);
        }

        Ok(())
    }

    pub async fn get_record(&self, session_id: &str) -> InterviewResult<Option<InterviewRecord>> {
        let records: Option<RecordMap> = self.kv.get(INTERVIEWS_KEY).await?;
        Ok(records.and_then(|mut records| records.remove(session_id)))
    }

    /// History list, newest first
    pub async fn list_records(&self) -> InterviewResult<Vec<InterviewListItem>> {
        let records: RecordMap = self.kv.get(INTERVIEWS_KEY).await?.unwrap_or_default();

        let mut items: Vec<InterviewListItem> =
            records.values().map(InterviewListItem::from).collect();
        items.sort_by(|a, b| b.date_time.cmp(&a.date_time));

        Ok(items)
    }

    pub async fn remove_record(&self, session_id: &str) -> InterviewResult<bool> {
        self.kv
            .update(INTERVIEWS_KEY, |records: &mut RecordMap| {
                records.remove(session_id).is_some()
            })
            .await
    }

    /// Stage a completed session, replacing whatever was staged before
    pub async fn stage_interview(&self, staged: &StagedInterview) -> InterviewResult<()> {
        info!("Staging interview {} for analysis", staged.session_id);
        self.kv.set(STAGED_INTERVIEW_KEY, &Some(staged)).await
    }

    pub async fn staged_interview(&self) -> InterviewResult<Option<StagedInterview>> {
        let staged: Option<Option<StagedInterview>> = self.kv.get(STAGED_INTERVIEW_KEY).await?;
        Ok(staged.flatten())
    }

    /// Consume the staged interview if it belongs to `session_id`
    pub async fn take_staged_interview(
        &self,
        session_id: &str,
    ) -> InterviewResult<Option<StagedInterview>> {
        self.kv
            .update(STAGED_INTERVIEW_KEY, |staged: &mut Option<StagedInterview>| {
                if staged.as_ref().is_some_and(|s| s.session_id == session_id) {
                    staged.take()
                } else {
                    None
                }
            })
            .await
    }

    pub async fn save_resume(&self, kind: ResumeKind, resume: &Resume) -> InterviewResult<()> {
        info!("Saving {:?} résumé {}", kind, resume.name);
        self.kv.set(kind.key(), resume).await
    }

    pub async fn resume(&self, kind: ResumeKind) -> InterviewResult<Option<Resume>> {
        self.kv.get(kind.key()).await
    }
}
