//! MP3 encoder
//!
//! Serializes a [`Waveform`] to MP3 via an external streaming encoder treated
//! as a black-box capability. The capability is an injected trait so the
//! float-to-int conversion and chunk-streaming logic stay testable without the
//! real LAME library; the production implementation ([`LameMp3Encoder`]) lives
//! behind the `lame` cargo feature.
//!
//! One capability instance serves exactly one encode operation; instances are
//! never reused across encodes.

use crate::error::{Error, Result};
use crate::types::{AudioFormat, EncodedAudio, Waveform};
use tracing::debug;

/// Fixed MP3 output bitrate (kbps).
pub const MP3_BITRATE_KBPS: u32 = 128;

/// Streaming MP3 encoding capability.
///
/// Implementations own interleaving and internal buffering. Each call may
/// return an empty chunk (the encoder is still filling its internal frame
/// buffer); [`flush`](Mp3Encoder::flush) drains whatever remains.
pub trait Mp3Encoder {
    /// Encode a block of 16-bit samples.
    ///
    /// `right` is `None` for mono input; for multi-channel input both slices
    /// have equal length.
    fn encode_frames(&mut self, left: &[i16], right: Option<&[i16]>) -> Result<Vec<u8>>;

    /// Finalize the stream, returning any buffered trailing bytes.
    fn flush(&mut self) -> Result<Vec<u8>>;
}

/// Convert a float sample to i16 with the MP3 path's symmetric scaling:
/// negative values scale by 32768, non-negative by 32767. A different
/// convention from the WAV path's conditional branch; each is internally
/// consistent.
fn to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Encode a waveform through an injected MP3 capability.
///
/// Feeds channel 0 (and channel 1 when present) as whole-channel sample
/// arrays, then flushes, concatenating all non-empty chunks in order. Any
/// encoder error aborts the operation; no partial output is returned.
pub fn encode_mp3_with(waveform: &Waveform, encoder: &mut dyn Mp3Encoder) -> Result<EncodedAudio> {
    let left: Vec<i16> = waveform.channel(0).iter().copied().map(to_i16).collect();
    let right: Option<Vec<i16>> = if waveform.channel_count() > 1 {
        Some(waveform.channel(1).iter().copied().map(to_i16).collect())
    } else {
        None
    };

    let mut bytes = Vec::new();

    let chunk = encoder.encode_frames(&left, right.as_deref())?;
    if !chunk.is_empty() {
        bytes.extend_from_slice(&chunk);
    }

    let tail = encoder.flush()?;
    if !tail.is_empty() {
        bytes.extend_from_slice(&tail);
    }

    debug!(
        "Encoded {} frames to {} MP3 bytes",
        waveform.frame_count(),
        bytes.len()
    );

    Ok(EncodedAudio {
        format: AudioFormat::Mp3,
        bytes,
    })
}

/// Encode a waveform to MP3 with a fresh LAME capability.
///
/// Configures the encoder for the waveform's exact channel count and sample
/// rate at the fixed 128 kbps bitrate.
///
/// # Errors
/// [`Error::Mp3Unavailable`] when the crate was built without the `lame`
/// feature or the encoder rejects the configuration; [`Error::Mp3Encode`] on
/// mid-stream failure.
pub fn encode_mp3(waveform: &Waveform) -> Result<EncodedAudio> {
    let mut encoder = new_lame_encoder(waveform.channel_count(), waveform.sample_rate())?;
    encode_mp3_with(waveform, encoder.as_mut())
}

/// Construct the LAME-backed capability, or report it unavailable.
#[cfg(feature = "lame")]
pub fn new_lame_encoder(channels: u16, sample_rate: u32) -> Result<Box<dyn Mp3Encoder>> {
    Ok(Box::new(LameMp3Encoder::new(channels, sample_rate)?))
}

/// Construct the LAME-backed capability, or report it unavailable.
#[cfg(not(feature = "lame"))]
pub fn new_lame_encoder(_channels: u16, _sample_rate: u32) -> Result<Box<dyn Mp3Encoder>> {
    Err(Error::Mp3Unavailable(
        "built without the `lame` feature".to_string(),
    ))
}

/// MP3 capability backed by the LAME encoder.
#[cfg(feature = "lame")]
pub struct LameMp3Encoder {
    encoder: mp3lame_encoder::Encoder,
}

#[cfg(feature = "lame")]
impl LameMp3Encoder {
    /// Configure LAME for the given channel layout and sample rate at the
    /// fixed 128 kbps bitrate.
    pub fn new(channels: u16, sample_rate: u32) -> Result<Self> {
        use mp3lame_encoder::{Birtate, Builder, Quality};

        let unavailable = |stage: &str, e: mp3lame_encoder::BuildError| {
            Error::Mp3Unavailable(format!("{}: {:?}", stage, e))
        };

        let mut builder = Builder::new()
            .ok_or_else(|| Error::Mp3Unavailable("failed to allocate LAME context".to_string()))?;
        builder
            .set_num_channels(channels.min(2) as u8)
            .map_err(|e| unavailable("set_num_channels", e))?;
        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| unavailable("set_sample_rate", e))?;
        builder
            .set_brate(Birtate::Kbps128)
            .map_err(|e| unavailable("set_brate", e))?;
        builder
            .set_quality(Quality::Best)
            .map_err(|e| unavailable("set_quality", e))?;

        let encoder = builder
            .build()
            .map_err(|e| unavailable("build", e))?;

        Ok(Self { encoder })
    }

    fn drain(buffer: &mut Vec<u8>, written: usize) -> Vec<u8> {
        // Written bytes were initialized by LAME into the spare capacity.
        unsafe { buffer.set_len(written) };
        std::mem::take(buffer)
    }
}

#[cfg(feature = "lame")]
impl Mp3Encoder for LameMp3Encoder {
    fn encode_frames(&mut self, left: &[i16], right: Option<&[i16]>) -> Result<Vec<u8>> {
        use mp3lame_encoder::{max_required_buffer_size, DualPcm, MonoPcm};

        let mut buffer: Vec<u8> = Vec::with_capacity(max_required_buffer_size(left.len()));
        let written = match right {
            Some(right) => self
                .encoder
                .encode(DualPcm { left, right }, buffer.spare_capacity_mut())
                .map_err(|e| Error::Mp3Encode(format!("{:?}", e)))?,
            None => self
                .encoder
                .encode(MonoPcm(left), buffer.spare_capacity_mut())
                .map_err(|e| Error::Mp3Encode(format!("{:?}", e)))?,
        };

        Ok(Self::drain(&mut buffer, written))
    }

    fn flush(&mut self) -> Result<Vec<u8>> {
        use mp3lame_encoder::{max_required_buffer_size, FlushNoGap};

        let mut buffer: Vec<u8> = Vec::with_capacity(max_required_buffer_size(0));
        let written = self
            .encoder
            .flush::<FlushNoGap>(buffer.spare_capacity_mut())
            .map_err(|e| Error::Mp3Encode(format!("{:?}", e)))?;

        Ok(Self::drain(&mut buffer, written))
    }
}
