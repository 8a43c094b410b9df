//! Round format for practice debates.
//!
//! A practice debate is a fixed number of rounds. In each round the human
//! argues once and the AI replies once. The only exception is round 1 when
//! the AI was chosen to open: the AI's opening statement comes first.

use serde::{Deserialize, Serialize};

use crate::participant::{FirstSpeaker, Speaker};

/// Number of rounds when nothing else is configured.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 3;

/// Prompt marker handed to the responder in place of a human argument when
/// it is asked for the AI's opening statement.
pub const OPENING_STATEMENT: &str = "Opening Statement";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PracticeFormat {
    total_rounds: u32,
}

impl PracticeFormat {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            total_rounds: total_rounds.max(1),
        }
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Order in which the two parties speak within `round`.
    pub fn speaker_order(&self, round: u32, first_speaker: FirstSpeaker) -> [Speaker; 2] {
        let opener = if round == 1 {
            first_speaker.speaker()
        } else {
            Speaker::Human
        };
        match opener {
            Speaker::Ai => [Speaker::Ai, Speaker::Human],
            Speaker::Human => [Speaker::Human, Speaker::Ai],
        }
    }

    /// True once `current_round` has moved past the last round.
    pub fn is_complete(&self, current_round: u32) -> bool {
        current_round > self.total_rounds
    }

    /// Human-readable progress label, e.g. "Round 2 / 3".
    pub fn round_label(&self, current_round: u32) -> String {
        if self.is_complete(current_round) {
            "Debate Complete".to_string()
        } else {
            format!("Round {} / {}", current_round, self.total_rounds)
        }
    }
}

impl Default for PracticeFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_ROUNDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_three_rounds() {
        assert_eq!(PracticeFormat::default().total_rounds(), 3);
    }

    #[test]
    fn test_minimum_one_round() {
        assert_eq!(PracticeFormat::new(0).total_rounds(), 1);
    }

    #[test]
    fn test_ai_opens_only_round_one() {
        let format = PracticeFormat::default();
        assert_eq!(
            format.speaker_order(1, FirstSpeaker::Ai),
            [Speaker::Ai, Speaker::Human]
        );
        assert_eq!(
            format.speaker_order(2, FirstSpeaker::Ai),
            [Speaker::Human, Speaker::Ai]
        );
        assert_eq!(
            format.speaker_order(3, FirstSpeaker::Ai),
            [Speaker::Human, Speaker::Ai]
        );
    }

    #[test]
    fn test_user_first_every_round() {
        let format = PracticeFormat::default();
        for round in 1..=3 {
            assert_eq!(
                format.speaker_order(round, FirstSpeaker::User),
                [Speaker::Human, Speaker::Ai]
            );
        }
    }

    #[test]
    fn test_completion_and_labels() {
        let format = PracticeFormat::new(3);
        assert!(!format.is_complete(3));
        assert!(format.is_complete(4));
        assert_eq!(format.round_label(2), "Round 2 / 3");
        assert_eq!(format.round_label(4), "Debate Complete");
    }
}
