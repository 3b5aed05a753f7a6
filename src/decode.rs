//! Container decoder using symphonia
//!
//! Decodes self-describing audio containers (WAV, MP3, FLAC, OGG, AAC, M4A) to
//! a planar float [`Waveform`], with the headerless PCM decoder as fallback for
//! payloads of unknown origin.
//!
//! # Input tagging
//!
//! Callers that know where their bytes came from say so via [`AudioPayload`]:
//! a provider documented to return MP3 passes `Container`, a provider that
//! emits raw 24 kHz mono PCM passes `RawPcm` and skips the wasted container
//! probe. Only genuinely untagged bytes go through the `Unknown` variant's
//! try-container-then-PCM heuristic.

use crate::error::{Error, Result};
use crate::pcm;
use crate::types::{Waveform, DEFAULT_PCM_CHANNELS, DEFAULT_PCM_SAMPLE_RATE};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// A decoder input byte payload, tagged with what the caller knows about it.
#[derive(Debug, Clone)]
pub enum AudioPayload {
    /// A self-describing container (WAV/MP3/FLAC/...); format sniffed from
    /// magic bytes. Decode errors surface to the caller.
    Container(Vec<u8>),

    /// Headerless interleaved 16-bit LE PCM with a known layout.
    RawPcm {
        bytes: Vec<u8>,
        sample_rate: u32,
        channels: u16,
    },

    /// Origin unknown: try container decode first, fall back to headerless
    /// PCM at the default 24 kHz mono layout.
    Unknown(Vec<u8>),
}

/// Decode a tagged byte payload into a waveform.
///
/// # Errors
/// Only the `Container` variant can fail (malformed data, unsupported codec,
/// no audio track, or a stream with zero frames). `RawPcm` and `Unknown`
/// always succeed; the `Unknown` fallback recovers any container failure by
/// PCM-decoding the original, unconsumed bytes.
pub fn decode(payload: &AudioPayload) -> Result<Waveform> {
    match payload {
        AudioPayload::Container(bytes) => decode_container(bytes),
        AudioPayload::RawPcm {
            bytes,
            sample_rate,
            channels,
        } => Ok(pcm::decode_pcm16(bytes, *sample_rate, *channels)),
        AudioPayload::Unknown(bytes) => match decode_container(bytes) {
            Ok(waveform) => Ok(waveform),
            Err(e) => {
                warn!("Container decode failed ({}), falling back to raw PCM", e);
                Ok(pcm::decode_pcm16(
                    bytes,
                    DEFAULT_PCM_SAMPLE_RATE,
                    DEFAULT_PCM_CHANNELS,
                ))
            }
        },
    }
}

/// Decode a self-describing container via symphonia.
///
/// Probes the format from the byte stream (no filename hint available for
/// in-memory payloads), decodes every packet of the default audio track, and
/// de-interleaves into planar f32 channels.
pub fn decode_container(bytes: &[u8]) -> Result<Waveform> {
    // The probe consumes its media source; hand it a copy so the caller's
    // buffer stays available for the PCM fallback path.
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let hint = Hint::new();
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("Failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Decode("No audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;
    let channel_count = codec_params
        .channels
        .map(|c| c.count())
        .ok_or_else(|| Error::Decode("Channel count not found".to_string()))?;
    if channel_count == 0 {
        return Err(Error::Decode("Stream declares zero channels".to_string()));
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut planar: Vec<Vec<f32>> = vec![Vec::new(); channel_count];

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Error::Decode(format!("Failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                warn!("Skipping corrupt packet: {}", e);
                continue;
            }
            Err(e) => return Err(Error::Decode(format!("Decode error: {}", e))),
        };

        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(frames as u64, spec);
        buf.copy_interleaved_ref(decoded);

        for (i, &sample) in buf.samples().iter().enumerate() {
            planar[i % channel_count].push(sample);
        }
    }

    if planar[0].is_empty() {
        return Err(Error::Decode("No audio samples decoded".to_string()));
    }

    debug!(
        "Decoded container: {} frames, {} ch, {} Hz",
        planar[0].len(),
        channel_count,
        sample_rate
    );

    // Keep the container path's error surface uniform: a stream that yields
    // ragged planar channels (layout change mid-file) is a decode failure.
    Waveform::from_channels(sample_rate, planar).map_err(|e| Error::Decode(e.to_string()))
}
