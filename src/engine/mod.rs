//! Speech-recognition engine dispatch.
//!
//! # Overview
//!
//! [`SpeechEngine`] is the interface the batch runner drives.  It is
//! object-safe and `Send + Sync` so an engine can be held behind a
//! `Box<dyn SpeechEngine>` for the lifetime of a batch.
//!
//! [`EngineKind`] is the closed set of selectors the host may pass.  Parsing
//! rejects anything else up front — an unsupported selector never touches
//! the filesystem or audio.
//!
//! Implementations:
//! - [`WhisperEngine`] — local neural transcription via whisper-rs.
//! - [`GoogleEngine`]  — Google Cloud Speech REST API.
//! - [`SphinxEngine`]  — offline CMU pocketsphinx via subprocess.
//!
//! [`MockEngine`] (under `#[cfg(test)]`) returns a pre-configured response
//! without touching a model, the network, or a subprocess.

pub mod google;
pub mod sphinx;
pub mod whisper;

pub use google::GoogleEngine;
pub use sphinx::SphinxEngine;
pub use whisper::WhisperEngine;

use std::str::FromStr;

use thiserror::Error;

use crate::audio::TempWav;
use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// All errors that can arise from the recognition subsystem.
///
/// `Clone` is required: when the engine itself fails to build, the runner
/// replays the same error into every task of the batch.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The selector is outside the supported set.
    #[error("Unsupported engine: {0}")]
    Unsupported(String),

    /// A required model file was not found.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The engine could not be initialised (context, runtime, client).
    #[error("Engine initialisation failed: {0}")]
    Init(String),

    /// The recognition pass itself failed (inference, network, subprocess).
    #[error("Recognition failed: {0}")]
    Recognition(String),

    /// The engine completed but produced no transcript.
    #[error("Recognition service returned no transcript")]
    NoSpeech,
}

// ---------------------------------------------------------------------------
// EngineKind
// ---------------------------------------------------------------------------

/// Closed set of recognition engine selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Local neural transcription (whisper-rs, GGML model).
    Whisper,
    /// Google Cloud Speech REST API.
    Google,
    /// Offline CMU pocketsphinx.
    Sphinx,
}

impl EngineKind {
    /// Selector string as the host passes it.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Whisper => "whisper",
            EngineKind::Google => "google",
            EngineKind::Sphinx => "sphinx",
        }
    }
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whisper" => Ok(EngineKind::Whisper),
            "google" => Ok(EngineKind::Google),
            "sphinx" => Ok(EngineKind::Sphinx),
            other => Err(EngineError::Unsupported(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe interface over the recognition backends.
///
/// Language and model selection happen at construction time; `transcribe`
/// only consumes the normalized waveform.  Calls block until the backend
/// returns or fails — there is no timeout beyond what the backend itself
/// enforces.
pub trait SpeechEngine: Send + Sync {
    /// Transcribe the normalized WAV and return the recognized text.
    fn transcribe(&self, wav: &TempWav) -> Result<String, EngineError>;
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// build_engine
// ---------------------------------------------------------------------------

/// Construct the engine for `kind`, wiring in language, model name, and the
/// relevant section of [`AppConfig`].
///
/// Only the whisper engine consumes `model`; google and sphinx ignore it.
pub fn build_engine(
    kind: EngineKind,
    language: &str,
    model: &str,
    config: &AppConfig,
) -> Result<Box<dyn SpeechEngine>, EngineError> {
    match kind {
        EngineKind::Whisper => {
            let model_path = config.whisper.models_dir.join(format!("{model}.bin"));
            Ok(Box::new(WhisperEngine::load(&model_path, language)?))
        }
        EngineKind::Google => Ok(Box::new(GoogleEngine::new(&config.google, language)?)),
        EngineKind::Sphinx => Ok(Box::new(SphinxEngine::new(&config.sphinx, language))),
    }
}

// ---------------------------------------------------------------------------
// MockEngine  (test-only)
// ---------------------------------------------------------------------------

/// Test double that returns a pre-configured response.
#[cfg(test)]
pub struct MockEngine {
    response: Result<String, EngineError>,
}

#[cfg(test)]
impl MockEngine {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: EngineError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl SpeechEngine for MockEngine {
    fn transcribe(&self, _wav: &TempWav) -> Result<String, EngineError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
