//! script-check — batch speech recognition against expected script text.
//!
//! Processes a JSON task list of (audio file, expected script) pairs: each
//! audio file is normalized to 16 kHz mono WAV, transcribed by the selected
//! engine (whisper / google / sphinx), and compared against the script with
//! a character-level similarity ratio and a line-level unified diff.  The
//! whole batch is emitted as one JSON line on stdout for the host
//! application; diagnostics go to the log on stderr.
//!
//! # Modules
//!
//! - [`batch`]   — request parsing, the sequential runner, report emission.
//! - [`audio`]   — decode / downmix / resample / temp-WAV lifecycle.
//! - [`engine`]  — the closed engine set behind the [`engine::SpeechEngine`]
//!   trait.
//! - [`compare`] — similarity ratio and unified diff.
//! - [`config`]  — engine settings (`settings.toml`).

pub mod audio;
pub mod batch;
pub mod compare;
pub mod config;
pub mod engine;
