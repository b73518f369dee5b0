use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hound::WavReader;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

use crate::error::{InterviewError, InterviewResult};

/// A finished recording handed over at a turn boundary.
///
/// Capture itself happens elsewhere (browser MediaRecorder, cpal, ...);
/// this type only carries the completed bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Known only for WAV input
    pub duration_seconds: Option<f64>,
}

impl RecordingPayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let duration_seconds = if mime_type == "audio/wav" {
            wav_duration(&bytes)
        } else {
            None
        };

        Self {
            bytes,
            mime_type,
            duration_seconds,
        }
    }

    /// Decode a base64 payload, with or without a `data:<mime>;base64,` prefix.
    /// A mime type embedded in the prefix wins over `default_mime`.
    pub fn from_base64(encoded: &str, default_mime: &str) -> InterviewResult<Self> {
        let (mime, data) = match encoded.split_once(',') {
            Some((header, data)) => {
                let mime = header
                    .strip_prefix("data:")
                    .and_then(|h| h.split(';').next())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(default_mime);
                (mime, data)
            }
            None => (default_mime, encoded),
        };

        let bytes = BASE64
            .decode(data.trim())
            .map_err(|e| InterviewError::MediaAccess(format!("Invalid base64 recording: {}", e)))?;

        Ok(Self::new(bytes, mime))
    }

    /// Load a finished recording from disk
    pub async fn open(path: impl AsRef<Path>) -> InterviewResult<Self> {
        let path = path.as_ref();
        info!("Opening recording: {}", path.display());

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            InterviewError::MediaAccess(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("wav") => "audio/wav",
            Some("mp4") => "video/mp4",
            Some("ogg") => "audio/ogg",
            _ => "audio/webm",
        };

        let payload = Self::new(bytes, mime);

        if mime == "audio/wav" && payload.duration_seconds.is_none() {
            return Err(InterviewError::MediaAccess(format!(
                "{} is not a readable WAV file",
                path.display()
            )));
        }

        info!(
            "Recording loaded: {} bytes, {}, duration {:?}",
            payload.bytes.len(),
            payload.mime_type,
            payload.duration_seconds
        );

        Ok(payload)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<bytes>` as produced by a browser FileReader
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// `audio/webm`, `video/webm`; the coaching service accepts nothing else
    pub fn is_webm(&self) -> bool {
        self.mime_type.ends_with("/webm")
    }

    /// File extension used when uploading as multipart
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "audio/wav" => "wav",
            "video/mp4" => "mp4",
            "audio/ogg" => "ogg",
            _ => "webm",
        }
    }
}

fn wav_duration(bytes: &[u8]) -> Option<f64> {
    let reader = WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    let frames = reader.duration() as f64;
    Some(frames / spec.sample_rate as f64)
}
