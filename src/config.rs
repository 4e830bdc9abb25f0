//! Engine configuration and TOML persistence.
//!
//! The host passes engine / language / model on the command line; everything
//! else an engine needs (model directory, API endpoint and key, decoder
//! command) lives in a `settings.toml` under the platform config directory:
//!
//!   Windows: `%APPDATA%\script-check\settings.toml`
//!   macOS:   `~/Library/Application Support/script-check/settings.toml`
//!   Linux:   `~/.config/script-check/settings.toml`
//!
//! A missing file yields [`AppConfig::default`] so the tool runs without any
//! setup step.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "script-check";

// ---------------------------------------------------------------------------
// WhisperConfig
// ---------------------------------------------------------------------------

/// Settings for the local whisper engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperConfig {
    /// Directory holding GGML model files; the CLI's `model` argument is the
    /// file stem (`<models_dir>/<model>.bin`).
    pub models_dir: PathBuf,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            models_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_NAME)
                .join("models"),
        }
    }
}

// ---------------------------------------------------------------------------
// GoogleConfig
// ---------------------------------------------------------------------------

/// Settings for the Google Cloud Speech engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Base URL of the Speech API.
    pub base_url: String,
    /// API key appended as a query parameter — `None` when ambient
    /// credentials (proxy, local emulator) are in play.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://speech.googleapis.com".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// SphinxConfig
// ---------------------------------------------------------------------------

/// Settings for the offline pocketsphinx engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SphinxConfig {
    /// Decoder executable to spawn.
    pub command: String,
    /// Acoustic model directory override (`-hmm`).
    pub hmm: Option<PathBuf>,
    /// Language model override (`-lm`).
    pub lm: Option<PathBuf>,
    /// Pronunciation dictionary override (`-dict`).
    pub dict: Option<PathBuf>,
}

impl Default for SphinxConfig {
    fn default() -> Self {
        Self {
            command: "pocketsphinx_continuous".into(),
            hmm: None,
            lm: None,
            dict: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local whisper engine settings.
    pub whisper: WhisperConfig,
    /// Google Cloud Speech settings.
    pub google: GoogleConfig,
    /// pocketsphinx settings.
    pub sphinx: SphinxConfig,
}

impl AppConfig {
    /// Path of the platform-appropriate `settings.toml`.
    pub fn settings_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join("settings.toml")
    }

    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist so
    /// callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_file())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
