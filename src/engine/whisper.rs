//! Local neural transcription via whisper-rs.
//!
//! The GGML model is loaded once when the engine is built and shared across
//! every task in the batch; a fresh `WhisperState` is created per
//! transcription, so the engine needs no interior locking.

use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::TempWav;

use super::{EngineError, SpeechEngine};

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Speech engine backed by a `whisper_rs::WhisperContext`.
pub struct WhisperEngine {
    ctx: WhisperContext,
    language: String,
    n_threads: i32,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("language", &self.language)
            .field("n_threads", &self.n_threads)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send`/`Sync` in whisper-rs — the model weights are read-only
// after loading.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model from `model_path`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ModelNotFound`] — `model_path` does not exist.
    /// - [`EngineError::Init`] — whisper-rs failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, language: &str) -> Result<Self, EngineError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(EngineError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            EngineError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| EngineError::Init(e.to_string()))?;

        Ok(Self {
            ctx,
            language: language.to_string(),
            n_threads: optimal_threads(),
        })
    }
}

impl SpeechEngine for WhisperEngine {
    fn transcribe(&self, wav: &TempWav) -> Result<String, EngineError> {
        let audio = wav
            .samples()
            .map_err(|e| EngineError::Recognition(e.to_string()))?;

        let mut fp = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        // "auto" lets Whisper detect the language itself.
        let lang: Option<&str> = if self.language == "auto" {
            None
        } else {
            Some(self.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.n_threads);
        // Whisper's own progress chatter would pollute the diagnostic stream.
        fp.set_print_progress(false);
        fp.set_print_realtime(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| EngineError::Init(e.to_string()))?;

        state
            .full(fp, &audio)
            .map_err(|e| EngineError::Recognition(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| EngineError::Recognition(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let seg = state
                .full_get_segment_text(i)
                .map_err(|e| EngineError::Recognition(format!("segment {i}: {e}")))?;
            text.push_str(&seg);
        }

        Ok(text.trim().to_string())
    }
}

/// Number of CPU threads handed to Whisper, capped at 8 to avoid
/// diminishing returns.
fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
