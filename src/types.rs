//! Core audio data types
//!
//! Defines the waveform and encoded-output structures used throughout the
//! audio pipeline.
//!
//! **Format:**
//! - Samples are f32 (floating point -1.0 to 1.0)
//! - Planar layout: one independent sample sequence per channel
//! - Sample rate carried alongside the samples; no implicit resampling

use crate::error::{Error, Result};

/// Default sample rate assumed for headerless PCM payloads (Hz).
///
/// Speech providers that return raw PCM emit it at this rate.
pub const DEFAULT_PCM_SAMPLE_RATE: u32 = 24_000;

/// Default channel count assumed for headerless PCM payloads.
pub const DEFAULT_PCM_CHANNELS: u16 = 1;

/// Decoded audio held in memory as planar float channels.
///
/// A `Waveform` is immutable once produced: decoders and the mixer allocate
/// new waveforms rather than mutating one already handed to a caller. All
/// channel sequences have identical length (`frame_count`).
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Sample rate in Hz (always > 0)
    pub(crate) sample_rate: u32,

    /// Per-channel sample sequences, all of equal length
    pub(crate) channels: Vec<Vec<f32>>,
}

impl Waveform {
    /// Build a waveform from planar channel data, validating invariants.
    ///
    /// # Errors
    /// - Zero sample rate
    /// - No channels
    /// - Channel sequences of differing lengths
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidWaveform("sample rate must be > 0".to_string()));
        }
        if channels.is_empty() {
            return Err(Error::InvalidWaveform("at least one channel required".to_string()));
        }
        let frame_count = channels[0].len();
        if channels.iter().any(|c| c.len() != frame_count) {
            return Err(Error::InvalidWaveform(format!(
                "channel lengths differ: {:?}",
                channels.iter().map(|c| c.len()).collect::<Vec<_>>()
            )));
        }

        Ok(Self { sample_rate, channels })
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels (>= 1)
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Number of samples per channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// True if the waveform holds no audio
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Samples for one channel
    ///
    /// # Panics
    /// Panics if `channel >= channel_count()`.
    pub fn channel(&self, channel: u16) -> &[f32] {
        &self.channels[channel as usize]
    }

    /// Get duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.frame_count() as f32 / self.sample_rate as f32
    }
}

/// Output container formats produced by the encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// Uncompressed 16-bit PCM in a RIFF/WAVE container
    Wav,

    /// MPEG layer III, fixed 128 kbps
    Mp3,
}

impl AudioFormat {
    /// MIME type for download/playback
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mp3",
        }
    }

    /// Conventional file extension (without dot)
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

/// An encoded byte artifact plus its container tag.
///
/// Produced once by an encoder and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    /// Container format of `bytes`
    pub format: AudioFormat,

    /// The encoded byte stream
    pub bytes: Vec<u8>,
}
