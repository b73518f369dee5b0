use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interviewer personality, fixed at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Friendly
    Todd,
    /// Professional
    Jeff,
    /// Challenging
    Karen,
    Creep,
}

impl Persona {
    pub const ALL: [Persona; 4] = [Persona::Todd, Persona::Jeff, Persona::Karen, Persona::Creep];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Todd => "todd",
            Persona::Jeff => "jeff",
            Persona::Karen => "karen",
            Persona::Creep => "creep",
        }
    }

    /// Speech synthesis settings for this interviewer
    pub fn voice_profile(&self) -> VoiceProfile {
        let (voice, rate, pitch, voice_id) = match self {
            Persona::Todd => ("en-US-BryanNeural", 0.9, 1.0, "5Q0t7uMcjvnagumLfvZi"),
            Persona::Jeff => ("en-US-DavisNeural", 1.0, -1.0, "ZQe5CZNOzWyzPSCn5a3c"),
            Persona::Karen => ("en-US-JennyNeural", 1.1, 2.0, "5PWbsfogbLtky5sxqtBz"),
            Persona::Creep => ("en-US-JennyNeural", 0.8, 1.0, "g5CIjZEefAph4nQFvHAz"),
        };

        VoiceProfile {
            voice: voice.to_string(),
            rate,
            pitch,
            elevenlabs_voice_id: Some(voice_id.to_string()),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown interviewer: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Technical,
    Behavioral,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
        }
    }
}

/// Text-to-speech parameters handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    /// Web Speech / Azure neural voice name
    pub voice: String,
    pub rate: f32,
    pub pitch: f32,
    pub elevenlabs_voice_id: Option<String>,
}

/// Uploaded résumé (PDF)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    /// Base64-encoded file content
    pub content: String,
    pub upload_date: DateTime<Utc>,
}

/// Configuration submitted from the "new interview" form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewConfig {
    #[serde(alias = "interviewer")]
    pub persona: Persona,

    pub interview_type: InterviewType,

    #[serde(default)]
    pub focus_areas: Vec<String>,

    /// Job posting URL
    #[serde(default)]
    pub job_link: String,

    #[serde(default)]
    pub resume: Option<Resume>,
}

impl InterviewConfig {
    pub fn new(persona: Persona, interview_type: InterviewType) -> Self {
        Self {
            persona,
            interview_type,
            focus_areas: Vec::new(),
            job_link: String::new(),
            resume: None,
        }
    }
}
