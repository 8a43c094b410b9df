//! Debate session controller.
//!
//! Owns the session lifecycle (configuring → active → finished → reviewed,
//! plus reset), the transcript and the turn-taking rules. The hosting
//! interface calls one handler per user action and awaits it before the
//! next: [`DebateController::start`], [`DebateController::submit_argument`],
//! [`DebateController::request_evaluation`] and [`DebateController::reset`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collaborator::{Evaluator, Responder, Transcriber};
use crate::debate_format::{OPENING_STATEMENT, PracticeFormat};
use crate::draft::{DraftBuffer, DraftUpdate};
use crate::error::{CollaboratorError, DebateError};
use crate::narration::NarrationQueue;
use crate::participant::{Side, Speaker};
use crate::sanitize::{sanitize_response, strip_tags};
use crate::session::{DebateSetup, EvaluationReport, Phase, Session, Turn};

const SUBMIT: &str = "submit an argument";

fn no_session(action: &'static str) -> DebateError {
    DebateError::InvalidPhase {
        action,
        phase: Phase::Configuring,
    }
}

/// Callback for debate events.
pub type DebateCallback = Box<dyn Fn(DebateEvent) + Send + Sync>;

/// Events emitted as the debate progresses.
#[derive(Debug, Clone)]
pub enum DebateEvent {
    /// A session was created.
    DebateStarted {
        topic: String,
        user_side: Side,
        ai_side: Side,
        total_rounds: u32,
    },
    /// A round is open for the human's argument.
    RoundStart { round: u32, total_rounds: u32 },
    /// A turn was appended to the transcript.
    TurnRecorded(Turn),
    /// The last round completed; evaluation can be requested.
    DebateFinished,
    /// The coaching report is available.
    ReviewReady(EvaluationReport),
    /// The session was discarded.
    SessionReset,
}

pub struct DebateController {
    format: PracticeFormat,
    responder: Arc<dyn Responder>,
    evaluator: Arc<dyn Evaluator>,
    transcriber: Option<Arc<dyn Transcriber>>,
    narration: Option<NarrationQueue>,
    session: Option<Session>,
    draft: DraftBuffer,
    callback: Option<DebateCallback>,
}

impl DebateController {
    pub fn new(
        format: PracticeFormat,
        responder: Arc<dyn Responder>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Self {
        Self {
            format,
            responder,
            evaluator,
            transcriber: None,
            narration: None,
            session: None,
            draft: DraftBuffer::default(),
            callback: None,
        }
    }

    /// Enable voice input.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Narrate every AI turn through `queue`.
    pub fn with_narration(mut self, queue: NarrationQueue) -> Self {
        self.narration = Some(queue);
        self
    }

    /// Set a callback for debate events.
    pub fn with_callback(mut self, callback: DebateCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map_or(Phase::Configuring, Session::phase)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn format(&self) -> PracticeFormat {
        self.format
    }

    /// Start a debate. Only accepted while configuring.
    ///
    /// When the AI opens, its opening statement is requested before this
    /// returns. If that request fails the session stays active with an empty
    /// transcript and the opening is retried by [`Self::ensure_opening`] or
    /// the next submission.
    pub async fn start(&mut self, setup: DebateSetup) -> Result<(), DebateError> {
        let phase = self.phase();
        if phase != Phase::Configuring {
            return Err(DebateError::InvalidPhase {
                action: "start a debate",
                phase,
            });
        }

        if setup.topic.trim().is_empty() {
            return Err(DebateError::ConfigError(
                "Topic cannot be empty".to_string(),
            ));
        }

        self.responder
            .check_ready()
            .map_err(|e| DebateError::ConfigError(format!("Responder not ready: {}", e)))?;
        self.evaluator
            .check_ready()
            .map_err(|e| DebateError::ConfigError(format!("Evaluator not ready: {}", e)))?;

        let session = Session::new(setup, self.format);
        info!(
            topic = session.topic(),
            user_side = %session.user_side(),
            first_speaker = ?session.first_speaker(),
            total_rounds = session.total_rounds(),
            "Debate started"
        );
        self.emit_event(DebateEvent::DebateStarted {
            topic: session.topic().to_string(),
            user_side: session.user_side(),
            ai_side: session.ai_side(),
            total_rounds: session.total_rounds(),
        });
        self.session = Some(session);

        self.ensure_opening().await?;
        self.emit_round_start();
        Ok(())
    }

    /// Obtain the AI opening statement if it is still owed. A no-op otherwise.
    pub async fn ensure_opening(&mut self) -> Result<(), DebateError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        if !session.awaiting_opening() {
            return Ok(());
        }

        debug!("Requesting AI opening statement");
        let reply = self
            .responder
            .reply(
                session.topic(),
                session.user_side(),
                session.ai_side(),
                &[],
                OPENING_STATEMENT,
            )
            .await;
        let text = Self::accept_reply(reply)?;

        self.record_ai_turn(text)?;
        Ok(())
    }

    /// Submit the human's argument for the current round and record the AI
    /// reply.
    ///
    /// If the responder fails, the human turn stays in the transcript, no
    /// AI turn is recorded and the round does not advance. Submitting again
    /// records another human turn for the same round.
    pub async fn submit_argument(&mut self, text: &str) -> Result<Turn, DebateError> {
        let phase = self.phase();
        if phase != Phase::Active {
            return Err(DebateError::InvalidPhase {
                action: SUBMIT,
                phase,
            });
        }

        let argument = strip_tags(text);
        if argument.is_empty() {
            return Err(DebateError::ValidationError(
                "Argument cannot be empty".to_string(),
            ));
        }

        self.ensure_opening().await?;

        let session = self.session.as_mut().ok_or_else(|| no_session(SUBMIT))?;
        let human_turn = session.append_turn(Speaker::Human, argument).clone();
        info!(round = human_turn.round, "Human argument recorded");
        self.emit_event(DebateEvent::TurnRecorded(human_turn.clone()));

        let session = self.session.as_ref().ok_or_else(|| no_session(SUBMIT))?;
        debug!(
            round = human_turn.round,
            history_len = session.transcript().len(),
            "Requesting AI counter-argument"
        );
        let reply = self
            .responder
            .reply(
                session.topic(),
                session.user_side(),
                session.ai_side(),
                session.transcript(),
                &human_turn.text,
            )
            .await;
        let text = Self::accept_reply(reply)?;

        let ai_turn = self.record_ai_turn(text)?;
        self.finish_round();
        Ok(ai_turn)
    }

    /// Ask the evaluator for a coaching report. Only accepted once all
    /// rounds are played.
    ///
    /// On failure an error placeholder is stored, the session stays
    /// finished and the request may be repeated.
    pub async fn request_evaluation(&mut self) -> Result<EvaluationReport, DebateError> {
        let phase = self.phase();
        let Some(session) = self.session.as_mut().filter(|_| phase == Phase::Finished) else {
            return Err(DebateError::InvalidPhase {
                action: "request an evaluation",
                phase,
            });
        };

        let human_turns = session.human_turns();
        debug!(arguments = human_turns.len(), "Requesting evaluation");
        let result = self
            .evaluator
            .evaluate(session.topic(), session.user_side(), &human_turns)
            .await
            .map(|text| strip_tags(&text))
            .and_then(|text| {
                if text.is_empty() {
                    Err(CollaboratorError::EmptyResponse("Evaluator"))
                } else {
                    Ok(text)
                }
            });

        match result {
            Ok(text) => {
                let report = EvaluationReport::Ready { text };
                session.record_report(report.clone());
                info!(score = ?report.overall_score(), "Evaluation ready");
                self.emit_event(DebateEvent::ReviewReady(report.clone()));
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Evaluation failed");
                session.record_report(EvaluationReport::Failed {
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Discard the session and return to configuring. Accepted in any phase;
    /// `SessionReset` is only emitted when a session was discarded.
    pub fn reset(&mut self) {
        self.draft = DraftBuffer::default();
        if self.session.take().is_some() {
            info!("Session reset");
            self.emit_event(DebateEvent::SessionReset);
        }
    }

    /// Current argument draft.
    pub fn draft(&self) -> &str {
        self.draft.text()
    }

    /// Replace the draft with the human's edited text.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft.set(text);
    }

    /// Transcribe a recorded clip into the draft. Nothing is submitted.
    pub async fn transcribe_into_draft(&mut self, audio: &[u8]) -> Result<DraftUpdate, DebateError> {
        let Some(transcriber) = self.transcriber.clone() else {
            return Err(DebateError::ConfigError(
                "Voice input is not configured".to_string(),
            ));
        };
        let phase = self.phase();
        if phase != Phase::Active {
            return Err(DebateError::InvalidPhase {
                action: "record an argument",
                phase,
            });
        }

        if !self.draft.remember_audio(audio) {
            debug!("Same clip as last time, skipping transcription");
            return Ok(DraftUpdate::Duplicate);
        }

        let transcribed = transcriber.transcribe(audio).await?;
        let update = self.draft.apply_transcription(&transcribed);
        if update == DraftUpdate::NoSpeech {
            info!("No speech detected in clip");
        }
        Ok(update)
    }

    /// Submit the draft as the current argument. The draft is cleared only
    /// when the submission succeeds.
    pub async fn submit_draft(&mut self) -> Result<Turn, DebateError> {
        let text = self.draft.text().to_string();
        let turn = self.submit_argument(&text).await?;
        self.draft.clear();
        Ok(turn)
    }

    fn accept_reply(reply: Result<String, CollaboratorError>) -> Result<String, DebateError> {
        let reply = reply.inspect_err(|e| warn!(error = %e, "Responder failed"))?;
        let text = sanitize_response(&reply);
        if text.is_empty() {
            warn!("Responder returned no usable text");
            return Err(CollaboratorError::EmptyResponse("Responder").into());
        }
        Ok(text)
    }

    fn record_ai_turn(&mut self, text: String) -> Result<Turn, DebateError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| no_session("record an AI turn"))?;
        let turn = session.append_turn(Speaker::Ai, text).clone();
        info!(round = turn.round, "AI turn recorded");

        if let Some(queue) = &self.narration {
            queue.enqueue(turn.round, &turn.text);
        }
        self.emit_event(DebateEvent::TurnRecorded(turn.clone()));
        Ok(turn)
    }

    fn finish_round(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.advance_round() {
            info!("All rounds complete");
            self.emit_event(DebateEvent::DebateFinished);
        } else {
            self.emit_round_start();
        }
    }

    fn emit_round_start(&self) {
        if let Some(session) = self.session.as_ref().filter(|s| s.phase() == Phase::Active) {
            self.emit_event(DebateEvent::RoundStart {
                round: session.current_round(),
                total_rounds: session.total_rounds(),
            });
        }
    }

    /// Emit an event if a callback is registered.
    fn emit_event(&self, event: DebateEvent) {
        if let Some(ref callback) = self.callback {
            callback(event);
        }
    }
}
