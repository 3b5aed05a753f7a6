//! Error types for voicemix
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the voicemix pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Container decode failed (malformed data, unsupported codec, empty stream)
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Mixer precondition violated (e.g. empty background waveform)
    #[error("Mix error: {0}")]
    Mix(String),

    /// Waveform constructor invariant violated
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(String),

    /// MP3 encoding capability missing or failed to initialize
    #[error("MP3 encoder unavailable: {0}")]
    Mp3Unavailable(String),

    /// MP3 encoder failed mid-stream; no partial output is returned
    #[error("MP3 encode error: {0}")]
    Mp3Encode(String),
}

/// Convenience Result type using voicemix Error
pub type Result<T> = std::result::Result<T, Error>;
