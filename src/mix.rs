//! Waveform mixer
//!
//! Combines a foreground waveform (typically spoken voice) with a background
//! waveform (typically music) into one output. The foreground dictates the
//! output duration and sample rate; the background loops via modulo indexing
//! when shorter and is truncated when longer.
//!
//! # Known limitation
//!
//! The background is NOT resampled to the foreground's rate. If the rates
//! differ, the background plays at the wrong speed/pitch.

use crate::error::{Error, Result};
use crate::types::Waveform;
use tracing::debug;

/// Gain settings for a mix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixParams {
    /// Gain applied to the foreground (voice) samples
    pub foreground_gain: f32,

    /// Gain applied to the background (music) samples
    pub background_gain: f32,
}

impl Default for MixParams {
    /// Full-volume voice over half-volume music
    fn default() -> Self {
        Self {
            foreground_gain: 1.0,
            background_gain: 0.5,
        }
    }
}

/// Mix a background waveform under a foreground waveform.
///
/// - Output frame count and sample rate come from the foreground.
/// - Output channel count is the max of the two operands. For each output
///   channel, an operand contributes its matching channel when it has one and
///   its channel 0 otherwise (so a mono operand is broadcast everywhere).
/// - The background loops if shorter than the foreground and is truncated if
///   longer.
/// - Every output sample is hard-clamped to [-1.0, 1.0] after summing.
///
/// The inputs are only read; the output is a freshly allocated waveform.
///
/// # Errors
/// Returns [`Error::Mix`] if the background holds no frames (looping over an
/// empty waveform is undefined). Decoding must reject empty streams before
/// they reach the mixer; this guards against callers that skipped that check.
pub fn mix(foreground: &Waveform, background: &Waveform, params: &MixParams) -> Result<Waveform> {
    if background.is_empty() {
        return Err(Error::Mix("background waveform has no frames".to_string()));
    }

    let channel_count = foreground.channel_count().max(background.channel_count());
    let frame_count = foreground.frame_count();
    let bg_frame_count = background.frame_count();

    let mut channels: Vec<Vec<f32>> = Vec::with_capacity(channel_count as usize);

    for c in 0..channel_count {
        // Exact channel when the operand has it, channel 0 otherwise.
        let fg_data =
            foreground.channel(if c < foreground.channel_count() { c } else { 0 });
        let bg_data =
            background.channel(if c < background.channel_count() { c } else { 0 });

        let mut out = Vec::with_capacity(frame_count);
        for j in 0..frame_count {
            let mixed = fg_data[j] * params.foreground_gain
                + bg_data[j % bg_frame_count] * params.background_gain;
            out.push(mixed.clamp(-1.0, 1.0));
        }
        channels.push(out);
    }

    debug!(
        "Mixed {} fg frames with {} bg frames into {} ch output",
        frame_count, bg_frame_count, channel_count
    );

    Ok(Waveform {
        sample_rate: foreground.sample_rate(),
        channels,
    })
}
