//! Editable argument draft.
//!
//! Transcribed speech is never recorded as a turn directly. It lands here,
//! the human may revise it, and only then is it submitted.

/// Outcome of feeding an audio clip into the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    /// The draft now holds the transcribed text.
    Transcribed(String),
    /// The transcriber heard nothing; the draft is unchanged.
    NoSpeech,
    /// Same clip as the last one processed; it was not transcribed again.
    Duplicate,
}

#[derive(Debug, Default, Clone)]
pub struct DraftBuffer {
    text: String,
    last_audio: Option<Vec<u8>>,
}

impl DraftBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Remember `audio` as the latest clip. Returns false if it is the same
    /// clip as last time.
    pub(crate) fn remember_audio(&mut self, audio: &[u8]) -> bool {
        if self.last_audio.as_deref() == Some(audio) {
            return false;
        }
        self.last_audio = Some(audio.to_vec());
        true
    }

    pub(crate) fn apply_transcription(&mut self, transcribed: &str) -> DraftUpdate {
        let transcribed = transcribed.trim();
        if transcribed.is_empty() {
            return DraftUpdate::NoSpeech;
        }
        self.text = transcribed.to_string();
        DraftUpdate::Transcribed(self.text.clone())
    }
}
