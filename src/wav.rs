//! WAV encoder
//!
//! Serializes a [`Waveform`] into a canonical uncompressed PCM RIFF/WAVE byte
//! stream, always 16 bits per sample. The output is fully deterministic:
//! `44 + frame_count * channel_count * 2` bytes for any valid waveform, with
//! no failure modes.

use crate::types::{AudioFormat, EncodedAudio, Waveform};

/// RIFF/WAVE header length for a 16-bit PCM file with one data chunk.
pub const WAV_HEADER_LEN: usize = 44;

/// Bits per sample in encoder output (fixed).
pub const WAV_BITS_PER_SAMPLE: u16 = 16;

/// Quantize a float sample to i16 with the WAV path's rounding convention.
///
/// Clamp to [-1, 1], then scale: samples below -0.5 by 32768, the rest by
/// 32767, truncating toward zero. The conditional split (rather than a sign
/// test) is preserved observed behavior for bit-for-bit compatible output.
fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if 0.5 + s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Encode a waveform as a 16-bit PCM WAV byte stream.
///
/// Always succeeds; encoding the same waveform twice yields byte-identical
/// output.
pub fn encode_wav(waveform: &Waveform) -> EncodedAudio {
    let channel_count = waveform.channel_count();
    let frame_count = waveform.frame_count();
    let sample_rate = waveform.sample_rate();

    let data_len = frame_count * channel_count as usize * 2;
    let total_len = WAV_HEADER_LEN + data_len;
    let mut bytes = Vec::with_capacity(total_len);

    // RIFF chunk
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&((total_len - 8) as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    // fmt subchunk: integer PCM, 16-bit
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channel_count.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2 * channel_count as u32).to_le_bytes());
    bytes.extend_from_slice(&(channel_count * 2).to_le_bytes());
    bytes.extend_from_slice(&WAV_BITS_PER_SAMPLE.to_le_bytes());

    // data subchunk: frame-major, one sample per channel in channel order
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data_len as u32).to_le_bytes());
    for frame in 0..frame_count {
        for channel in 0..channel_count {
            let sample = waveform.channel(channel)[frame];
            bytes.extend_from_slice(&quantize(sample).to_le_bytes());
        }
    }

    EncodedAudio {
        format: AudioFormat::Wav,
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Waveform;

    fn data_samples(encoded: &EncodedAudio) -> Vec<i16> {
        encoded.bytes[WAV_HEADER_LEN..]
            .chunks(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn test_known_waveform_byte_exact() {
        let wf = Waveform::from_channels(24_000, vec![vec![1.0, -1.0]]).unwrap();
        let encoded = encode_wav(&wf);

        assert_eq!(encoded.format, AudioFormat::Wav);
        assert_eq!(encoded.bytes.len(), 48);
        assert_eq!(data_samples(&encoded), vec![32767, -32768]);
    }

    #[test]
    fn test_header_fields() {
        let wf = Waveform::from_channels(44_100, vec![vec![0.0; 100], vec![0.0; 100]]).unwrap();
        let encoded = encode_wav(&wf);
        let b = &encoded.bytes;

        assert_eq!(&b[0..4], b"RIFF");
        assert_eq!(
            u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            (encoded.bytes.len() - 8) as u32
        );
        assert_eq!(&b[8..12], b"WAVE");
        assert_eq!(&b[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes([b[16], b[17], b[18], b[19]]), 16);
        assert_eq!(u16::from_le_bytes([b[20], b[21]]), 1); // integer PCM
        assert_eq!(u16::from_le_bytes([b[22], b[23]]), 2); // channels
        assert_eq!(u32::from_le_bytes([b[24], b[25], b[26], b[27]]), 44_100);
        assert_eq!(
            u32::from_le_bytes([b[28], b[29], b[30], b[31]]),
            44_100 * 2 * 2
        ); // byte rate
        assert_eq!(u16::from_le_bytes([b[32], b[33]]), 4); // block align
        assert_eq!(u16::from_le_bytes([b[34], b[35]]), 16); // bits per sample
        assert_eq!(&b[36..40], b"data");
        assert_eq!(
            u32::from_le_bytes([b[40], b[41], b[42], b[43]]),
            (100 * 2 * 2) as u32
        );
    }

    #[test]
    fn test_total_length_formula() {
        let wf = Waveform::from_channels(24_000, vec![vec![0.1; 7], vec![0.2; 7]]).unwrap();
        let encoded = encode_wav(&wf);
        assert_eq!(encoded.bytes.len(), 44 + 7 * 2 * 2);
    }

    #[test]
    fn test_interleaving_order() {
        let wf =
            Waveform::from_channels(24_000, vec![vec![0.25, 0.75], vec![-0.25, -0.75]]).unwrap();
        let samples = data_samples(&encode_wav(&wf));

        // L0, R0, L1, R1
        assert_eq!(samples[0], (0.25f32 * 32767.0) as i16);
        assert_eq!(samples[1], (-0.25f32 * 32767.0) as i16);
        assert_eq!(samples[2], (0.75f32 * 32767.0) as i16);
        assert_eq!(samples[3], (-0.75f32 * 32768.0) as i16);
    }

    #[test]
    fn test_quantize_convention() {
        // Threshold sits at -0.5: below it scales by 32768, at or above by 32767.
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32768);
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(-0.25), (-0.25f32 * 32767.0) as i16);
        assert_eq!(quantize(-0.75), (-0.75f32 * 32768.0) as i16);
    }

    #[test]
    fn test_out_of_range_samples_clamped() {
        let wf = Waveform::from_channels(24_000, vec![vec![1.5, -1.5]]).unwrap();
        assert_eq!(data_samples(&encode_wav(&wf)), vec![32767, -32768]);
    }

    #[test]
    fn test_empty_waveform_is_header_only() {
        let wf = Waveform::from_channels(24_000, vec![vec![]]).unwrap();
        let encoded = encode_wav(&wf);
        assert_eq!(encoded.bytes.len(), WAV_HEADER_LEN);
    }

    #[test]
    fn test_idempotent() {
        let wf = Waveform::from_channels(24_000, vec![vec![0.1, -0.2, 0.3]]).unwrap();
        assert_eq!(encode_wav(&wf).bytes, encode_wav(&wf).bytes);
    }
}
