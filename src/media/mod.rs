//! Completed recordings consumed at turn boundaries

pub mod payload;

pub use payload::RecordingPayload;
