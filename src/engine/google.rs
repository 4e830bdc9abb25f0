//! Cloud transcription via the Google Cloud Speech REST API.
//!
//! Sends the normalized waveform as base64 LINEAR16 content to
//! `POST {base_url}/v1/speech:recognize` and concatenates the top
//! alternative of every result.  All connection details (base URL, API key,
//! timeout) come from [`GoogleConfig`]; nothing is hardcoded.
//!
//! The reqwest client is async, but the batch pipeline is strictly
//! sequential — a private current-thread tokio runtime drives each request
//! to completion before `transcribe` returns.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::audio::{TempWav, NORMALIZED_RATE};
use crate::config::GoogleConfig;

use super::{EngineError, SpeechEngine};

// ---------------------------------------------------------------------------
// GoogleEngine
// ---------------------------------------------------------------------------

/// Speech engine backed by the Google Cloud Speech REST API.
pub struct GoogleEngine {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    url: String,
    language: String,
}

impl std::fmt::Debug for GoogleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleEngine")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EngineError::Recognition("request to recognition service timed out".into())
        } else {
            EngineError::Recognition(e.to_string())
        }
    }
}

impl GoogleEngine {
    /// Build the engine from config.
    ///
    /// # Errors
    ///
    /// [`EngineError::Init`] — the tokio runtime could not be created.
    pub fn new(config: &GoogleConfig, language: &str) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EngineError::Init(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut url = format!("{}/v1/speech:recognize", config.base_url);
        if let Some(key) = config.api_key.as_deref() {
            if !key.is_empty() {
                url.push_str("?key=");
                url.push_str(key);
            }
        }

        Ok(Self {
            client,
            runtime,
            url,
            language: language.to_string(),
        })
    }

    /// Extract the transcript from a `speech:recognize` response body.
    fn extract_transcript(json: &serde_json::Value) -> Result<String, EngineError> {
        let results = json["results"].as_array().ok_or(EngineError::NoSpeech)?;

        let mut transcript = String::new();
        for result in results {
            if let Some(text) = result["alternatives"][0]["transcript"].as_str() {
                transcript.push_str(text);
            }
        }

        if transcript.is_empty() {
            return Err(EngineError::NoSpeech);
        }
        Ok(transcript)
    }
}

impl SpeechEngine for GoogleEngine {
    fn transcribe(&self, wav: &TempWav) -> Result<String, EngineError> {
        let samples = wav
            .samples()
            .map_err(|e| EngineError::Recognition(e.to_string()))?;

        // Re-encode as raw little-endian LINEAR16 for the API.
        let mut pcm = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            pcm.extend_from_slice(&v.to_le_bytes());
        }

        let body = serde_json::json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": NORMALIZED_RATE,
                "languageCode": self.language,
            },
            "audio": {
                "content": BASE64.encode(&pcm),
            }
        });

        let json: serde_json::Value = self.runtime.block_on(async {
            let response = self
                .client
                .post(&self.url)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;

            Ok::<_, EngineError>(
                response
                    .json()
                    .await
                    .map_err(|e| EngineError::Recognition(format!("bad response: {e}")))?,
            )
        })?;

        Self::extract_transcript(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
