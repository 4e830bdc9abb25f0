//! Source-file decoding via symphonia.
//!
//! Handles every container/codec combination the enabled symphonia features
//! cover (wav and the royalty-free codecs by default, plus mp3 / aac / m4a).
//! Output is interleaved `f32` samples together with the stream's native
//! sample rate and channel count — resampling is a separate step.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioError;

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Raw decoded audio in the stream's native format.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved `f32` samples.
    pub samples: Vec<f32>,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode `path` into interleaved `f32` samples.
///
/// # Errors
///
/// - [`AudioError::Open`] — the file cannot be opened.
/// - [`AudioError::Decode`] — the container cannot be probed or the codec
///   fails mid-stream.
/// - [`AudioError::NoAudioTrack`] — no track carries a decodable codec.
/// - [`AudioError::EmptyAudio`] — decoding yields zero samples.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Decode(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioError::NoAudioTrack)?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an UnexpectedEof I/O error.
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Recoverable per-packet corruption — skip and keep going.
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u16;

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    if samples.is_empty() {
        return Err(AudioError::EmptyAudio);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Write a mono 16-bit PCM WAV with the given samples and rate.
    fn write_wav(dir: &Path, name: &str, samples: &[i16], rate: u32) -> PathBuf {
        let path = dir.join(name);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("create wav");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
        path
    }

    #[test]
    fn decodes_mono_wav() {
        let dir = tempdir().expect("temp dir");
        let samples: Vec<i16> = (0..1_600).map(|i| (i % 100) as i16 * 100).collect();
        let path = write_wav(dir.path(), "tone.wav", &samples, 16_000);

        let decoded = decode_file(&path).expect("decode");
        assert_eq!(decoded.sample_rate, 16_000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), 1_600);
    }

    #[test]
    fn reports_native_sample_rate() {
        let dir = tempdir().expect("temp dir");
        let path = write_wav(dir.path(), "hi.wav", &[0_i16; 441], 44_100);

        let decoded = decode_file(&path).expect("decode");
        assert_eq!(decoded.sample_rate, 44_100);
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = decode_file(Path::new("/nonexistent/audio.wav")).unwrap_err();
        assert!(matches!(err, AudioError::Open { .. }), "got: {err:?}");
        assert!(err.to_string().contains("/nonexistent/audio.wav"));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("not-audio.wav");
        std::fs::write(&path, b"this is not a waveform").expect("write");

        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, AudioError::Decode(_)), "got: {err:?}");
    }
}
