//! Result aggregation
//!
//! Combines a finished session's transcript with the remote feedback and
//! coaching payloads into an `InterviewRecord`, substituting fixed fallback
//! content for whichever payload is unavailable.

mod aggregate;
pub mod extract;
pub mod fallback;
mod pipeline;
mod record;

pub use aggregate::aggregate;
pub use extract::FeedbackSections;
pub use pipeline::InterviewAnalyzer;
pub use record::{
    clamp_score, format_elapsed, AnalysisItem, Evaluation, InterviewListItem, InterviewRecord,
    Provenance, QnaFeedback, RecordConfiguration, RecordedUtterance, Source,
};
