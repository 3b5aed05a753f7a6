//! Headerless PCM decoder
//!
//! Interprets a byte buffer as interleaved 16-bit signed little-endian PCM and
//! produces a normalized float [`Waveform`]. Speech providers that skip the
//! container step emit exactly this: raw samples with no header, rate and
//! channel layout assumed by convention (24 kHz mono).

use crate::types::{Waveform, DEFAULT_PCM_CHANNELS, DEFAULT_PCM_SAMPLE_RATE};
use tracing::debug;

/// Decode headerless interleaved 16-bit LE PCM bytes into a waveform.
///
/// Never fails: an odd trailing byte is dropped (a 16-bit sample element needs
/// an even total length), and zero-length input yields a zero-frame waveform.
/// A zero `channels` argument is treated as 1.
///
/// Samples are normalized by dividing by 32768.0 regardless of sign. Positive
/// values are therefore not rescaled by 32767; the small asymmetry against the
/// WAV encoder is intentional, matching the observed pipeline behavior.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Waveform {
    let channels = channels.max(1);

    // Defensive trim: drop a trailing incomplete byte rather than failing.
    let usable_len = bytes.len() & !1;
    let frame_count = usable_len / 2 / channels as usize;

    let mut planar: Vec<Vec<f32>> = (0..channels)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();
    for (c, channel) in planar.iter_mut().enumerate() {
        for i in 0..frame_count {
            let pos = (i * channels as usize + c) * 2;
            let sample = i16::from_le_bytes([bytes[pos], bytes[pos + 1]]);
            channel.push(sample as f32 / 32768.0);
        }
    }

    debug!(
        "Decoded {} raw PCM bytes: {} frames, {} ch, {} Hz",
        bytes.len(),
        frame_count,
        channels,
        sample_rate
    );

    Waveform {
        sample_rate,
        channels: planar,
    }
}

/// Decode headerless PCM with the conventional provider layout (24 kHz mono).
pub fn decode_pcm16_default(bytes: &[u8]) -> Waveform {
    decode_pcm16(bytes, DEFAULT_PCM_SAMPLE_RATE, DEFAULT_PCM_CHANNELS)
}
