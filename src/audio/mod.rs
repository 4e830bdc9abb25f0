//! Audio normalization boundary.
//!
//! Recognition engines consume **16 kHz mono 16-bit PCM WAV**.  This module
//! turns an arbitrary source file into that shape:
//!
//! 1. [`decode`] — container/codec decoding via symphonia (wav, mp3, m4a,
//!    flac, ogg, …) into interleaved `f32` samples.
//! 2. [`resample`] — channel downmix and resampling to 16 kHz.
//! 3. [`normalize`] — writes the converted audio to a `<stem>_temp.wav`
//!    sibling of the source and hands back a [`TempWav`] guard that deletes
//!    the file when dropped.

pub mod decode;
pub mod normalize;
pub mod resample;

pub use decode::{decode_file, DecodedAudio};
pub use normalize::{normalize, TempWav, NORMALIZED_RATE};
pub use resample::{downmix_to_mono, resample_to_16k};

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// All errors that can arise while converting a source file to the
/// normalized waveform.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The source file could not be opened.
    #[error("Failed to open audio file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    /// symphonia could not probe or decode the file.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The container holds no track with a decodable codec.
    #[error("No decodable audio track found")]
    NoAudioTrack,

    /// Decoding succeeded but produced zero samples.
    #[error("Audio file contains no samples")]
    EmptyAudio,

    /// The normalized WAV could not be written or read back.
    #[error("Failed to write normalized wav: {0}")]
    Wav(String),
}
