use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

/// One line of dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,

    /// Empty when transcription failed
    pub text: String,

    /// Milliseconds since the Unix epoch
    pub occurred_at: i64,
}

/// Append-only, time-ordered dialogue of one interview session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    utterances: Vec<Utterance>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance. A timestamp earlier than the last entry is
    /// clamped to it so `occurred_at` never decreases.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>, occurred_at: i64) -> &Utterance {
        let occurred_at = match self.utterances.last() {
            Some(last) => occurred_at.max(last.occurred_at),
            None => occurred_at,
        };

        self.utterances.push(Utterance {
            speaker,
            text: text.into(),
            occurred_at,
        });

        &self.utterances[self.utterances.len() - 1]
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn iter(&self) -> impl Iterator<Item = &Utterance> {
        self.utterances.iter()
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn last(&self) -> Option<&Utterance> {
        self.utterances.last()
    }

    /// Milliseconds between first and last utterance
    pub fn span_ms(&self) -> i64 {
        match (self.utterances.first(), self.utterances.last()) {
            (Some(first), Some(last)) => last.occurred_at - first.occurred_at,
            _ => 0,
        }
    }

    pub fn count(&self, speaker: Speaker) -> usize {
        self.utterances.iter().filter(|u| u.speaker == speaker).count()
    }
}
