//! Configuration module for loading TOML config files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::debate_format::{DEFAULT_TOTAL_ROUNDS, PracticeFormat};
use crate::error::DebateError;
use crate::participant::Side;

/// Root configuration structure. Every section is optional in the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub debate: DebateSettings,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub voices: VoicesConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

/// Debate defaults offered to the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DebateSettings {
    pub default_topic: String,
    pub total_rounds: u32,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            default_topic: "Social Media does more harm than good".to_string(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
        }
    }
}

/// Models used by the hosted adapters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub chat_model: String,
    pub transcription_model: String,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat_model: "gpt-4o-mini".to_string(),
            transcription_model: "whisper-1".to_string(),
            max_tokens: 400,
            request_timeout_secs: 120,
        }
    }
}

/// Voice configuration for TTS.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoicesConfig {
    pub ai_voice: String,
    /// Playback rate; 1.0 is natural speed.
    pub speech_rate: f32,
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            ai_voice: "bm_george".to_string(),
            speech_rate: 1.0,
        }
    }
}

/// Prompt templates.
///
/// `responder_prompt` placeholders: `{topic}`, `{ai_side}`, `{user_side}`,
/// `{history}`, `{latest_argument}`.
/// `evaluator_prompt` placeholders: `{topic}`, `{user_side}`, `{arguments}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub responder_prompt: String,
    pub evaluator_prompt: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            responder_prompt: DEFAULT_RESPONDER_PROMPT.to_string(),
            evaluator_prompt: DEFAULT_EVALUATOR_PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DebateError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| DebateError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_str(&content)
    }

    /// Load configuration from string content.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, DebateError> {
        toml::from_str(content)
            .map_err(|e| DebateError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn practice_format(&self) -> PracticeFormat {
        PracticeFormat::new(self.debate.total_rounds)
    }

    /// Responder prompt with placeholders replaced.
    pub fn responder_prompt(
        &self,
        topic: &str,
        user_side: Side,
        ai_side: Side,
        history: &str,
        latest_argument: &str,
    ) -> String {
        self.prompts
            .responder_prompt
            .replace("{topic}", topic)
            .replace("{ai_side}", ai_side.display_name())
            .replace("{user_side}", user_side.display_name())
            .replace("{history}", history)
            .replace("{latest_argument}", latest_argument)
    }

    /// Evaluator prompt with placeholders replaced.
    pub fn evaluator_prompt(&self, topic: &str, user_side: Side, arguments: &str) -> String {
        self.prompts
            .evaluator_prompt
            .replace("{topic}", topic)
            .replace("{user_side}", user_side.display_name())
            .replace("{arguments}", arguments)
    }
}

const DEFAULT_RESPONDER_PROMPT: &str = r#"You are in a debate about: "{topic}"
Role: {ai_side} | Opponent: {user_side}

History:
{history}

Opponent's latest argument:
{latest_argument}

Reply with a counter-argument.
1. Be persuasive and logical.
2. Keep it under 150 words.
3. Address the specific point made.
4. STRICTLY OUTPUT PLAIN TEXT ONLY. DO NOT USE MARKDOWN OR HTML TAGS.
"#;

const DEFAULT_EVALUATOR_PROMPT: &str = r#"Act as a strict debate coach.
Topic: {topic}
Side: {user_side}

Here are the user's arguments:
{arguments}

Provide a performance review.
1. Start with an 'Overall Score' from 0 to 100 based on logic, persuasion, and relevance.
2. Provide a breakdown for each round.
3. STRICTLY OUTPUT PLAIN TEXT ONLY. DO NOT USE HTML TAGS.

Format:
Overall Score: [0-100]/100

Round 1:
Score: [0-100]
Feedback: [Your feedback]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.debate.total_rounds, 3);
        assert_eq!(
            config.debate.default_topic,
            "Social Media does more harm than good"
        );
        assert_eq!(config.practice_format().total_rounds(), 3);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_str(
            r#"
            [debate]
            total_rounds = 5

            [voices]
            ai_voice = "af_sky"
            "#,
        )
        .unwrap();
        assert_eq!(config.debate.total_rounds, 5);
        assert_eq!(
            config.debate.default_topic,
            "Social Media does more harm than good"
        );
        assert_eq!(config.voices.ai_voice, "af_sky");
        assert_eq!(config.voices.speech_rate, 1.0);
        assert_eq!(config.model.chat_model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_str("[debate\ntotal_rounds = ").unwrap_err();
        assert!(matches!(err, DebateError::ConfigError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/debatecoach.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_responder_prompt_placeholders() {
        let config = Config::default();
        let prompt = config.responder_prompt(
            "School uniforms",
            Side::Pro,
            Side::Con,
            "Round 1 - You: They reduce bullying.",
            "They reduce bullying.",
        );
        assert!(prompt.contains(r#"debate about: "School uniforms""#));
        assert!(prompt.contains("Role: Con | Opponent: Pro"));
        assert!(prompt.contains("Round 1 - You: They reduce bullying."));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_evaluator_prompt_placeholders() {
        let config = Config::default();
        let prompt = config.evaluator_prompt("School uniforms", Side::Con, "Round 1:\nCost.");
        assert!(prompt.contains("Side: Con"));
        assert!(prompt.contains("Round 1:\nCost."));
        assert!(!prompt.contains("{arguments}"));
    }
}
