//! Error types for the debate system.

use thiserror::Error;

use crate::session::Phase;

#[derive(Error, Debug)]
pub enum DebateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cannot {action} while the debate is {phase}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Failure reported by one of the external collaborators
/// (responder, evaluator, transcriber, narrator).
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("OpenAI API error: {0}")]
    OpenAIError(#[from] async_openai::error::OpenAIError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Audio error: {0}")]
    Audio(#[from] hound::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("TTS error: {0}")]
    TtsError(String),

    #[error("{0}")]
    Other(String),
}
