//! Mixdown utility
//!
//! Decodes a voice file (container or raw provider PCM), optionally mixes it
//! over looped background music, and exports the result as WAV or MP3.
//!
//! **Usage:**
//! ```bash
//! mixdown narration.mp3 --music bed.mp3 -o narrated.wav
//! mixdown tts_dump.pcm --raw-pcm -o voice.mp3 --format mp3
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voicemix::types::{DEFAULT_PCM_CHANNELS, DEFAULT_PCM_SAMPLE_RATE};
use voicemix::{decode, encode_mp3, encode_wav, mix, AudioFormat, AudioPayload, MixParams};

/// Command-line arguments for mixdown
#[derive(Parser, Debug)]
#[command(name = "mixdown")]
#[command(about = "Mix narration over background music and export WAV/MP3")]
#[command(version)]
struct Args {
    /// Voice audio file (container format, or raw PCM with --raw-pcm)
    voice: PathBuf,

    /// Background music file (always a container format)
    #[arg(short, long)]
    music: Option<PathBuf>,

    /// Gain applied to the voice
    #[arg(long, default_value = "1.0")]
    voice_gain: f32,

    /// Gain applied to the music
    #[arg(long, default_value = "0.5")]
    music_gain: f32,

    /// Treat the voice file as headerless 16-bit LE PCM
    #[arg(long)]
    raw_pcm: bool,

    /// Sample rate assumed for raw PCM input
    #[arg(long, default_value_t = DEFAULT_PCM_SAMPLE_RATE)]
    sample_rate: u32,

    /// Channel count assumed for raw PCM input
    #[arg(long, default_value_t = DEFAULT_PCM_CHANNELS)]
    channels: u16,

    /// Output container format
    #[arg(long, default_value = "wav", value_parser = parse_format)]
    format: AudioFormat,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

fn parse_format(s: &str) -> std::result::Result<AudioFormat, String> {
    match s {
        "wav" => Ok(AudioFormat::Wav),
        "mp3" => Ok(AudioFormat::Mp3),
        other => Err(format!("unknown format '{}', expected wav or mp3", other)),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicemix=debug,mixdown=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let voice_bytes = std::fs::read(&args.voice)
        .with_context(|| format!("reading voice file {}", args.voice.display()))?;
    let voice_payload = if args.raw_pcm {
        AudioPayload::RawPcm {
            bytes: voice_bytes,
            sample_rate: args.sample_rate,
            channels: args.channels,
        }
    } else {
        AudioPayload::Container(voice_bytes)
    };
    let voice = decode(&voice_payload).context("decoding voice audio")?;
    info!(
        "Voice: {:.2}s, {} ch, {} Hz",
        voice.duration_seconds(),
        voice.channel_count(),
        voice.sample_rate()
    );

    let waveform = match &args.music {
        Some(music_path) => {
            let music_bytes = std::fs::read(music_path)
                .with_context(|| format!("reading music file {}", music_path.display()))?;
            // User-supplied music is never assumed headerless.
            let music =
                decode(&AudioPayload::Container(music_bytes)).context("decoding music audio")?;
            info!(
                "Music: {:.2}s, {} ch, {} Hz",
                music.duration_seconds(),
                music.channel_count(),
                music.sample_rate()
            );

            let params = MixParams {
                foreground_gain: args.voice_gain,
                background_gain: args.music_gain,
            };
            mix(&voice, &music, &params).context("mixing voice over music")?
        }
        None => voice,
    };

    let encoded = match args.format {
        AudioFormat::Wav => encode_wav(&waveform),
        AudioFormat::Mp3 => encode_mp3(&waveform).context("encoding MP3")?,
    };

    std::fs::write(&args.output, &encoded.bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        "Wrote {} bytes of {} to {}",
        encoded.bytes.len(),
        encoded.format.mime_type(),
        args.output.display()
    );

    Ok(())
}
