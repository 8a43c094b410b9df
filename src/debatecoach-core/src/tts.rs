//! TTS module for text-to-speech synthesis using kokoro-tiny.

use async_trait::async_trait;
use kokoro_tiny::TtsEngine;
use tokio::sync::Mutex;
use tracing::debug;

use crate::audio::{adjust_audio_speed, encode_wav, split_into_chunks};
use crate::collaborator::Narrator;
use crate::config::VoicesConfig;
use crate::error::CollaboratorError;

/// Kokoro output sample rate.
pub const KOKORO_SAMPLE_RATE: u32 = 24_000;

/// Kokoro has a strict limit on input length per call.
const MAX_CHUNK_CHARS: usize = 200;

/// Narrates AI turns with a local kokoro model.
pub struct KokoroNarrator {
    engine: Mutex<TtsEngine>,
    voice: String,
    speech_rate: f32,
}

impl KokoroNarrator {
    /// Initialize the TTS engine (downloads model on first run) and check
    /// that the configured voice exists.
    pub async fn new(voices: &VoicesConfig) -> Result<Self, CollaboratorError> {
        let engine = TtsEngine::new()
            .await
            .map_err(|e| CollaboratorError::TtsError(format!("Failed to initialize TTS: {}", e)))?;

        let available = engine.voices();
        if !available.iter().any(|v| v == &voices.ai_voice) {
            return Err(CollaboratorError::TtsError(format!(
                "Unknown voice '{}'. Available voices:\n{}",
                voices.ai_voice,
                format_english_voices(&available)
            )));
        }

        Ok(Self {
            engine: Mutex::new(engine),
            voice: voices.ai_voice.clone(),
            speech_rate: voices.speech_rate,
        })
    }
}

#[async_trait]
impl Narrator for KokoroNarrator {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, CollaboratorError> {
        let mut engine = self.engine.lock().await;
        let mut samples = Vec::new();

        for chunk in split_into_chunks(text, MAX_CHUNK_CHARS) {
            let chunk_samples = engine
                .synthesize(&chunk, Some(&self.voice))
                .map_err(|e| CollaboratorError::TtsError(format!("Synthesis failed: {}", e)))?;
            samples.extend(chunk_samples);

            // 0.3 s pause between chunks keeps sentence ends from being clipped
            samples.extend(std::iter::repeat_n(0.0, KOKORO_SAMPLE_RATE as usize * 3 / 10));
        }
        drop(engine);

        // 0.5 s trailing pad
        samples.extend(std::iter::repeat_n(0.0, KOKORO_SAMPLE_RATE as usize / 2));
        debug!(samples = samples.len(), voice = %self.voice, "Narration synthesized");

        let samples = adjust_audio_speed(samples, self.speech_rate);
        Ok(encode_wav(&samples, KOKORO_SAMPLE_RATE)?)
    }
}

fn format_english_voices(available: &[String]) -> String {
    let mut english: Vec<&String> = available
        .iter()
        .filter(|v| ["af_", "am_", "bf_", "bm_"].iter().any(|p| v.starts_with(p)))
        .collect();
    english.sort();

    english
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_english_voices_filters_and_sorts() {
        let voices = vec![
            "bm_george".to_string(),
            "jf_alpha".to_string(),
            "af_sky".to_string(),
        ];
        assert_eq!(format_english_voices(&voices), "  - af_sky\n  - bm_george");
    }
}
