//! Debate sides and speakers.
//!
//! A practice debate always has exactly two parties: the human and the AI
//! opponent. Each argues one side of the motion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DebateError;

/// Side of the motion a party argues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    /// Arguing in favor of the topic.
    Pro,
    /// Arguing against the topic.
    Con,
}

impl Side {
    pub fn display_name(&self) -> &'static str {
        match self {
            Side::Pro => "Pro",
            Side::Con => "Con",
        }
    }

    /// The opposite side. The AI always argues `user_side.opponent()`.
    pub fn opponent(&self) -> Side {
        match self {
            Side::Pro => Side::Con,
            Side::Con => Side::Pro,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Side {
    type Err = DebateError;

    /// Accepts "pro"/"for" and "con"/"against", case-insensitively, as well
    /// as labels such as "Pro (For)".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let word = lowered.split_whitespace().next().unwrap_or_default();
        match word {
            "pro" | "for" => Ok(Side::Pro),
            "con" | "against" => Ok(Side::Con),
            _ => Err(DebateError::ConfigError(format!(
                "Unknown side '{}'. Expected 'pro' or 'con'.",
                s
            ))),
        }
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Speaker {
    Human,
    Ai,
}

impl Speaker {
    /// Label used in transcripts and in the history handed to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Human => "You",
            Speaker::Ai => "AI",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who opens the debate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FirstSpeaker {
    #[default]
    User,
    Ai,
}

impl FirstSpeaker {
    pub fn speaker(&self) -> Speaker {
        match self {
            FirstSpeaker::User => Speaker::Human,
            FirstSpeaker::Ai => Speaker::Ai,
        }
    }
}

impl FromStr for FirstSpeaker {
    type Err = DebateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "human" | "me" => Ok(FirstSpeaker::User),
            "ai" | "bot" => Ok(FirstSpeaker::Ai),
            _ => Err(DebateError::ConfigError(format!(
                "Unknown first speaker '{}'. Expected 'user' or 'ai'.",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_always_the_other_side() {
        for side in [Side::Pro, Side::Con] {
            assert_ne!(side, side.opponent());
            assert_eq!(side, side.opponent().opponent());
        }
    }

    #[test]
    fn test_parse_side_labels() {
        assert_eq!("pro".parse::<Side>().unwrap(), Side::Pro);
        assert_eq!("Pro (For)".parse::<Side>().unwrap(), Side::Pro);
        assert_eq!("Con (Against)".parse::<Side>().unwrap(), Side::Con);
        assert_eq!("AGAINST".parse::<Side>().unwrap(), Side::Con);
    }

    #[test]
    fn test_parse_side_rejects_unknown() {
        let err = "neutral".parse::<Side>().unwrap_err();
        assert!(matches!(err, DebateError::ConfigError(_)));
        assert!("".parse::<Side>().is_err());
    }

    #[test]
    fn test_parse_first_speaker() {
        assert_eq!("AI".parse::<FirstSpeaker>().unwrap(), FirstSpeaker::Ai);
        assert_eq!("user".parse::<FirstSpeaker>().unwrap(), FirstSpeaker::User);
        assert!("nobody".parse::<FirstSpeaker>().is_err());
    }

    #[test]
    fn test_speaker_labels() {
        assert_eq!(Speaker::Human.label(), "You");
        assert_eq!(Speaker::Ai.to_string(), "AI");
    }
}
