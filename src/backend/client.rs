use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::messages::{
    CoachPayload, FeedbackPayload, NextQuestionResponse, NextResponseReply, NextResponseRequest,
    StartInterviewRequest, StartInterviewResponse,
};
use crate::media::RecordingPayload;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    Request(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

/// Remote interview and analysis service.
///
/// Pure request/response: implementations never retry or cache.
#[async_trait]
pub trait InterviewBackend: Send + Sync {
    async fn start_interview(
        &self,
        request: &StartInterviewRequest,
    ) -> Result<StartInterviewResponse, BackendError>;

    async fn next_response(
        &self,
        session_id: &str,
        request: &NextResponseRequest,
    ) -> Result<NextResponseReply, BackendError>;

    async fn next_question(&self, session_id: &str) -> Result<NextQuestionResponse, BackendError>;

    async fn feedback(&self, session_id: &str) -> Result<FeedbackPayload, BackendError>;

    /// Body-language analysis of a full interview recording
    async fn coach(&self, recording: &RecordingPayload) -> Result<CoachPayload, BackendError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// `reqwest` implementation talking JSON/multipart over HTTP
pub struct HttpInterviewBackend {
    client: Client,
    base_url: String,
}

impl HttpInterviewBackend {
    /// # Arguments
    /// * `base_url` - e.g. "http://localhost:5000"
    /// * `timeout` - per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl InterviewBackend for HttpInterviewBackend {
    async fn start_interview(
        &self,
        request: &StartInterviewRequest,
    ) -> Result<StartInterviewResponse, BackendError> {
        let focus_areas = serde_json::to_string(&request.focus_areas)
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let mut form = Form::new()
            .text("interviewer", request.interviewer.clone())
            .text("interview_type", request.interview_type.clone())
            .text("focus_areas", focus_areas)
            .text("job_link", request.job_link.clone());

        if let Some(resume) = &request.resume {
            let bytes = BASE64
                .decode(resume.content.trim())
                .map_err(|e| BackendError::Request(format!("résumé is not base64: {}", e)))?;
            let part = Part::bytes(bytes)
                .file_name(resume.name.clone())
                .mime_str("application/pdf")?;
            form = form.part("file", part);
        }

        info!(
            "Starting remote interview (interviewer={}, type={}, focus_areas={})",
            request.interviewer,
            request.interview_type,
            request.focus_areas.len()
        );

        let response = self
            .client
            .post(self.url("/api/start_interview"))
            .multipart(form)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn next_response(
        &self,
        session_id: &str,
        request: &NextResponseRequest,
    ) -> Result<NextResponseReply, BackendError> {
        debug!(
            "Submitting candidate turn for {} ({} encoded bytes)",
            session_id,
            request.data.len()
        );

        let response = self
            .client
            .post(self.url(&format!("/api/interview/{}/next_response", session_id)))
            .json(request)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn next_question(&self, session_id: &str) -> Result<NextQuestionResponse, BackendError> {
        let response = self
            .client
            .get(self.url(&format!("/api/interview/{}/next_question", session_id)))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn feedback(&self, session_id: &str) -> Result<FeedbackPayload, BackendError> {
        info!("Fetching feedback for {}", session_id);

        let response = self
            .client
            .get(self.url(&format!("/api/interview/{}/feedback", session_id)))
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn coach(&self, recording: &RecordingPayload) -> Result<CoachPayload, BackendError> {
        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), recording.extension());

        info!(
            "Uploading {} ({} bytes) for coaching analysis",
            file_name,
            recording.bytes.len()
        );

        let part = Part::bytes(recording.bytes.clone())
            .file_name(file_name)
            .mime_str(&recording.mime_type)?;

        let response = self
            .client
            .post(self.url("/api/coach"))
            .multipart(Form::new().part("file", part))
            .send()
            .await?;

        Self::decode(response).await
    }

    fn name(&self) -> &str {
        "http"
    }
}
