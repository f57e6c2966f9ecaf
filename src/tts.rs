use crate::config::TtsConfig;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Turns text into encoded audio (MP3 bytes).
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

/// OpenAI `/audio/speech` endpoint with a fixed model and voice.
pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    config: TtsConfig,
}

impl OpenAiSpeech {
    pub fn new(api_key: impl Into<String>, config: TtsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'))
    }
}

impl SpeechSynthesizer for OpenAiSpeech {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SpeechRequest {
            model: &self.config.model,
            voice: &self.config.voice,
            input: text,
            response_format: "mp3",
        };
        debug!(model = %self.config.model, voice = %self.config.voice, "requesting speech for {text:?}");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes()?;
        if audio.is_empty() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: "empty audio response".to_string(),
            });
        }
        debug!("received {} bytes for {text:?}", audio.len());
        Ok(audio.to_vec())
    }
}
