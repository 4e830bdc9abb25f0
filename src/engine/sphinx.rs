//! Offline transcription via CMU pocketsphinx.
//!
//! There is no maintained in-process binding, so the engine drives the
//! `pocketsphinx_continuous` command-line decoder (command and model paths
//! configurable) and reads the hypothesis from its stdout.  The decoder's
//! own chatter goes to its log file argument, which is pointed at the null
//! device.

use std::path::PathBuf;
use std::process::Command;

use crate::audio::TempWav;
use crate::config::SphinxConfig;

use super::{EngineError, SpeechEngine};

#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

// ---------------------------------------------------------------------------
// SphinxEngine
// ---------------------------------------------------------------------------

/// Speech engine backed by the pocketsphinx CLI decoder.
#[derive(Debug)]
pub struct SphinxEngine {
    command: String,
    hmm: Option<PathBuf>,
    lm: Option<PathBuf>,
    dict: Option<PathBuf>,
    language: String,
}

impl SphinxEngine {
    /// Build the engine from config.
    ///
    /// Construction never fails — a missing decoder binary only surfaces
    /// when the first task tries to spawn it.
    pub fn new(config: &SphinxConfig, language: &str) -> Self {
        Self {
            command: config.command.clone(),
            hmm: config.hmm.clone(),
            lm: config.lm.clone(),
            dict: config.dict.clone(),
            language: language.to_string(),
        }
    }
}

impl SpeechEngine for SphinxEngine {
    fn transcribe(&self, wav: &TempWav) -> Result<String, EngineError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-infile")
            .arg(wav.path())
            .arg("-logfn")
            .arg(NULL_DEVICE);

        // Default model paths are compiled into pocketsphinx; overrides are
        // only passed when configured.
        if let Some(hmm) = &self.hmm {
            cmd.arg("-hmm").arg(hmm);
        }
        if let Some(lm) = &self.lm {
            cmd.arg("-lm").arg(lm);
        }
        if let Some(dict) = &self.dict {
            cmd.arg("-dict").arg(dict);
        }

        log::debug!(
            "Running sphinx decoder: {} (language {})",
            self.command,
            self.language
        );

        let output = cmd.output().map_err(|e| {
            EngineError::Recognition(format!("failed to run {}: {e}", self.command))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("no diagnostic output");
            return Err(EngineError::Recognition(format!(
                "{} exited with {}: {detail}",
                self.command, output.status
            )));
        }

        // One hypothesis line per utterance.
        let transcript = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.is_empty() {
            return Err(EngineError::NoSpeech);
        }
        Ok(transcript)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
