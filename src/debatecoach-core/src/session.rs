//! The debate session aggregate.
//!
//! A [`Session`] exists from the moment a debate starts until it is reset.
//! Its transcript is append-only: turns are never reordered or edited.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::debate_format::PracticeFormat;
use crate::participant::{FirstSpeaker, Side, Speaker};

/// Coarse lifecycle stage of a debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    /// No session yet; topic and sides are being chosen.
    Configuring,
    /// Rounds are in progress.
    Active,
    /// All rounds played; waiting for the evaluation request.
    Finished,
    /// Evaluation report available. Only a reset is accepted.
    Reviewed,
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Configuring => "configuring",
            Phase::Active => "active",
            Phase::Finished => "finished",
            Phase::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One recorded utterance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    /// Round the turn belongs to.
    pub round: u32,
    pub speaker: Speaker,
    /// The speaker's side at the time of the utterance.
    pub side: Side,
    /// Plain text content.
    pub text: String,
}

impl Turn {
    /// "Round N - Speaker: text", the line format used for model history.
    pub fn history_line(&self) -> String {
        format!("Round {} - {}: {}", self.round, self.speaker, self.text)
    }
}

/// Render a transcript as history lines, one per turn, in transcript order.
pub fn format_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(Turn::history_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the human's arguments for the evaluator, one block per turn.
pub fn format_arguments(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("Round {}:\n{}", t.round, t.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

static SCORE_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(?:overall\s+)?score\W*?(\d{1,3})\b").ok());

/// Coaching report produced once per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EvaluationReport {
    /// Plain-text report from the evaluator.
    Ready { text: String },
    /// The evaluator failed; the evaluation may be requested again.
    Failed { error: String },
}

impl EvaluationReport {
    pub fn is_ready(&self) -> bool {
        matches!(self, EvaluationReport::Ready { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            EvaluationReport::Ready { text } => Some(text),
            EvaluationReport::Failed { .. } => None,
        }
    }

    /// Overall score (0-100) from the first "Overall Score: N" or "Score: N"
    /// line of a ready report.
    pub fn overall_score(&self) -> Option<u8> {
        let text = self.text()?;
        let re = SCORE_LINE.as_ref()?;
        let score: u32 = re.captures(text)?.get(1)?.as_str().parse().ok()?;
        u8::try_from(score).ok().filter(|s| *s <= 100)
    }
}

/// Settings fixed when a debate starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateSetup {
    pub topic: String,
    pub user_side: Side,
    pub first_speaker: FirstSpeaker,
}

impl DebateSetup {
    pub fn new(topic: impl Into<String>, user_side: Side, first_speaker: FirstSpeaker) -> Self {
        Self {
            topic: topic.into(),
            user_side,
            first_speaker,
        }
    }
}

/// State of one debate, owned by a single controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    topic: String,
    user_side: Side,
    first_speaker: FirstSpeaker,
    format: PracticeFormat,
    current_round: u32,
    phase: Phase,
    transcript: Vec<Turn>,
    report: Option<EvaluationReport>,
}

impl Session {
    pub(crate) fn new(setup: DebateSetup, format: PracticeFormat) -> Self {
        Self {
            topic: setup.topic.trim().to_string(),
            user_side: setup.user_side,
            first_speaker: setup.first_speaker,
            format,
            current_round: 1,
            phase: Phase::Active,
            transcript: Vec::new(),
            report: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn user_side(&self) -> Side {
        self.user_side
    }

    /// Always the complement of [`Session::user_side`].
    pub fn ai_side(&self) -> Side {
        self.user_side.opponent()
    }

    pub fn first_speaker(&self) -> FirstSpeaker {
        self.first_speaker
    }

    pub fn format(&self) -> PracticeFormat {
        self.format
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.format.total_rounds()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn report(&self) -> Option<&EvaluationReport> {
        self.report.as_ref()
    }

    /// Human-authored turns in transcript order.
    pub fn human_turns(&self) -> Vec<Turn> {
        self.transcript
            .iter()
            .filter(|t| t.speaker == Speaker::Human)
            .cloned()
            .collect()
    }

    /// True while the AI speaks first in the current round and has not
    /// spoken yet.
    pub fn awaiting_opening(&self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let [opener, _] = self
            .format
            .speaker_order(self.current_round, self.first_speaker);
        opener == Speaker::Ai && self.transcript.iter().all(|t| t.round != self.current_round)
    }

    pub(crate) fn side_of(&self, speaker: Speaker) -> Side {
        match speaker {
            Speaker::Human => self.user_side,
            Speaker::Ai => self.ai_side(),
        }
    }

    pub(crate) fn append_turn(&mut self, speaker: Speaker, text: String) -> &Turn {
        let turn = Turn {
            round: self.current_round,
            speaker,
            side: self.side_of(speaker),
            text,
        };
        self.transcript.push(turn);
        &self.transcript[self.transcript.len() - 1]
    }

    /// Advance to the next round; returns true when that completes the debate.
    pub(crate) fn advance_round(&mut self) -> bool {
        self.current_round += 1;
        if self.format.is_complete(self.current_round) {
            self.phase = Phase::Finished;
            true
        } else {
            false
        }
    }

    pub(crate) fn record_report(&mut self, report: EvaluationReport) {
        if report.is_ready() {
            self.phase = Phase::Reviewed;
        }
        self.report = Some(report);
    }
}
