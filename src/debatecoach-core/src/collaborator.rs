//! Ports to the external services the controller depends on.
//!
//! Adapters live in [`crate::openai`], [`crate::transcription`] and
//! [`crate::tts`]; tests plug in mocks.

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::participant::Side;
use crate::session::Turn;

/// Produces the AI debater's text.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Counter-argument to `latest_argument`, or an opening statement when
    /// `latest_argument` is [`crate::debate_format::OPENING_STATEMENT`].
    ///
    /// `history` is the whole transcript so far, oldest first.
    async fn reply(
        &self,
        topic: &str,
        user_side: Side,
        ai_side: Side,
        history: &[Turn],
        latest_argument: &str,
    ) -> Result<String, CollaboratorError>;

    /// Checked before a debate may start, e.g. for a missing API key.
    fn check_ready(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Produces the post-debate coaching report.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// `human_turns` holds only the human's arguments, in transcript order.
    async fn evaluate(
        &self,
        topic: &str,
        user_side: Side,
        human_turns: &[Turn],
    ) -> Result<String, CollaboratorError>;

    fn check_ready(&self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Speech-to-text. Returns an empty string when no speech was detected.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, CollaboratorError>;
}

/// Text-to-speech. Returns a playable WAV buffer for one utterance.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, CollaboratorError>;
}
