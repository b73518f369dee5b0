use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::JobMetadata;
use crate::session::{InterviewType, Persona, Speaker};

/// Durable, denormalized result of one interview, rendered by the dashboard.
///
/// Replaced wholesale on re-analysis, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub session_id: String,
    pub configuration: RecordConfiguration,
    pub metadata: JobMetadata,
    pub transcript: Vec<RecordedUtterance>,
    pub evaluation: Evaluation,
    pub qna_feedback: Vec<QnaFeedback>,
    pub tone_voice: Vec<AnalysisItem>,
    pub body_language: Vec<AnalysisItem>,
    pub provenance: Provenance,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordConfiguration {
    pub persona: Persona,
    pub interview_type: InterviewType,
    pub focus_areas: Vec<String>,
    pub job_link: String,
    /// First to last utterance
    pub duration_secs: u64,
}

/// Transcript line with time relative to the first utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedUtterance {
    pub speaker: Speaker,
    pub text: String,
    pub offset_ms: i64,
    /// `mm:ss`
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// 0-100
    pub overall_score: u8,
    pub overall_rating: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QnaFeedback {
    pub question: String,
    pub went_well: String,
    pub improvements: String,
}

/// One scored attribute of tone/voice or body language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisItem {
    pub attribute: String,
    /// 0-100
    pub score: u8,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Fallback,
}

/// Where the feedback and coaching content of a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub feedback: Source,
    pub coaching: Source,
}

impl Provenance {
    pub fn is_fallback(&self) -> bool {
        self.feedback == Source::Fallback || self.coaching == Source::Fallback
    }
}

/// Row of the interview history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewListItem {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub date_time: DateTime<Utc>,
    pub score: u8,
}

impl From<&InterviewRecord> for InterviewListItem {
    fn from(record: &InterviewRecord) -> Self {
        Self {
            id: record.session_id.clone(),
            job_title: non_empty_or(&record.metadata.job_title, "Unknown Job Title"),
            company: non_empty_or(&record.metadata.company, "Unknown Company"),
            date_time: record.created_at,
            score: record.evaluation.overall_score,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Clamp a remote score into 0-100
pub fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Seconds as `mm:ss`
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
