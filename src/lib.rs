//! # voicemix
//!
//! Client-side audio pipeline for speech applications: decode provider speech
//! payloads (container-encoded or raw headerless PCM) into a uniform in-memory
//! waveform, mix a voice waveform over looped background music, and serialize
//! the result to WAV or MP3 for download/playback.
//!
//! **Architecture:** symphonia for container decoding, a hand-rolled RIFF/WAVE
//! writer for exact 16-bit PCM output, and LAME (behind an injected capability
//! trait) for MP3.
//!
//! All components are synchronous, pure CPU-bound transformations over
//! already-resident buffers: decode → mix → encode is a strict data dependency
//! chain enforced by ownership, with each step allocating its output fresh.

pub mod decode;
pub mod error;
pub mod mix;
pub mod mp3;
pub mod pcm;
pub mod types;
pub mod wav;

pub use decode::{decode, AudioPayload};
pub use error::{Error, Result};
pub use mix::{mix, MixParams};
pub use mp3::{encode_mp3, encode_mp3_with, Mp3Encoder};
pub use pcm::{decode_pcm16, decode_pcm16_default};
pub use types::{AudioFormat, EncodedAudio, Waveform};
pub use wav::encode_wav;
