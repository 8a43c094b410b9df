//! Speech-to-text against an OpenAI-compatible `/audio/transcriptions`
//! endpoint (OpenAI Whisper, faster-whisper-server, LocalAI, ...).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::collaborator::Transcriber;
use crate::error::CollaboratorError;
use crate::openai::ApiConfig;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

pub struct WhisperTranscriber {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(
        api: &ApiConfig,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: transcription_endpoint(&api.api_base),
            api_key: api.api_key.clone(),
            model: model.into(),
        })
    }
}

fn transcription_endpoint(api_base: &str) -> String {
    format!("{}/audio/transcriptions", api_base.trim_end_matches('/'))
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<String, CollaboratorError> {
        if audio.is_empty() {
            return Ok(String::new());
        }

        let file = Part::bytes(audio.to_vec())
            .file_name("argument.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", file);

        debug!(bytes = audio.len(), model = %self.model, "Uploading clip for transcription");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base() {
        assert_eq!(
            transcription_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/audio/transcriptions"
        );
        assert_eq!(
            transcription_endpoint("http://localhost:8000/v1"),
            "http://localhost:8000/v1/audio/transcriptions"
        );
    }

    #[tokio::test]
    async fn test_empty_clip_skips_upload() {
        // Unroutable base: any request would fail.
        let api = ApiConfig::new("http://127.0.0.1:9", "sk-test");
        let transcriber =
            WhisperTranscriber::new(&api, "whisper-1", Duration::from_secs(1)).unwrap();
        assert_eq!(transcriber.transcribe(&[]).await.unwrap(), "");
    }
}
