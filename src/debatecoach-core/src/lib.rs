//! DebateCoach Core Library
//!
//! Debate practice against an AI opponent: the session controller that owns
//! rounds, turn order and the transcript, the collaborator ports it talks
//! to, and adapters for hosted chat, transcription and local speech.

pub mod audio;
pub mod collaborator;
pub mod config;
pub mod controller;
pub mod debate_format;
pub mod draft;
pub mod error;
pub mod narration;
pub mod openai;
pub mod participant;
pub mod sanitize;
pub mod session;
pub mod transcription;
#[cfg(feature = "kokoro")]
pub mod tts;

pub use collaborator::{Evaluator, Narrator, Responder, Transcriber};
pub use config::Config;
pub use controller::{DebateCallback, DebateController, DebateEvent};
pub use debate_format::PracticeFormat;
pub use draft::DraftUpdate;
pub use error::{CollaboratorError, DebateError};
pub use narration::{NarratedTurn, NarrationQueue};
pub use openai::{ApiConfig, OpenAiDebater};
pub use participant::{FirstSpeaker, Side, Speaker};
pub use session::{DebateSetup, EvaluationReport, Phase, Session, Turn};
pub use transcription::WhisperTranscriber;
#[cfg(feature = "kokoro")]
pub use tts::KokoroNarrator;
