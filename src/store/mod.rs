//! Persisted key/value state
//!
//! Layout (string keys, JSON values):
//! - `interviews` - session id -> interview record
//! - `interviewData` - last completed session, staged for analysis
//! - `generalResume`, `specialResume` - uploaded résumés

mod kv;
mod records;

pub use kv::KvStore;
pub use records::{
    RecordStore, ResumeKind, GENERAL_RESUME_KEY, INTERVIEWS_KEY, SPECIAL_RESUME_KEY,
    STAGED_INTERVIEW_KEY,
};
