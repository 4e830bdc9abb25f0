//! Normalized temporary WAV creation and scoped cleanup.
//!
//! [`normalize`] converts a source audio file to 16 kHz mono 16-bit PCM and
//! writes it to a `<stem>_temp.wav` sibling of the source.  The returned
//! [`TempWav`] owns that file and removes it in `Drop`, so the artifact is
//! cleaned up on every exit path — success, recognition failure, or panic.

use std::path::{Path, PathBuf};

use super::decode::decode_file;
use super::resample::{downmix_to_mono, resample_to_16k};
use super::AudioError;

/// Marker inserted before the forced `.wav` extension of the temp file.
const TEMP_MARKER: &str = "_temp";

/// Sample rate of every normalized WAV.
pub const NORMALIZED_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// TempWav
// ---------------------------------------------------------------------------

/// Scoped handle to a normalized temporary WAV file.
///
/// The file is deleted when the handle is dropped.  Engines either read the
/// samples back through [`samples`](Self::samples) (whisper, google) or pass
/// [`path`](Self::path) to an external process (sphinx).
#[derive(Debug)]
pub struct TempWav {
    path: PathBuf,
}

impl TempWav {
    /// Path of the temporary WAV on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file back as 16 kHz mono `f32` samples.
    pub fn samples(&self) -> Result<Vec<f32>, AudioError> {
        let mut reader =
            hound::WavReader::open(&self.path).map_err(|e| AudioError::Wav(e.to_string()))?;

        reader
            .samples::<i16>()
            .map(|s| {
                s.map(|v| v as f32 / i16::MAX as f32)
                    .map_err(|e| AudioError::Wav(e.to_string()))
            })
            .collect()
    }
}

impl Drop for TempWav {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove temp wav {}: {e}", self.path.display());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Derive the temp path: `<dir>/<stem>_temp.wav`.
fn temp_wav_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    source.with_file_name(format!("{stem}{TEMP_MARKER}.wav"))
}

/// Convert `source` to 16 kHz mono 16-bit PCM and write it next to the
/// source file.
///
/// The guard is constructed before the write starts, so even a partially
/// written file is removed when the error propagates.
pub fn normalize(source: &Path) -> Result<TempWav, AudioError> {
    let decoded = decode_file(source)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    let resampled = resample_to_16k(&mono, decoded.sample_rate);

    if resampled.is_empty() {
        return Err(AudioError::EmptyAudio);
    }

    let temp = TempWav {
        path: temp_wav_path(source),
    };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: NORMALIZED_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(temp.path(), spec).map_err(|e| AudioError::Wav(e.to_string()))?;
    for &s in &resampled {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(v)
            .map_err(|e| AudioError::Wav(e.to_string()))?;
    }
    writer.finalize().map_err(|e| AudioError::Wav(e.to_string()))?;

    Ok(temp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
