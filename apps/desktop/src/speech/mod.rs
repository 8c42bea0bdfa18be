//! Text-to-speech: synthesis, playback and timed narration.

pub mod narrator;
pub mod playback;
pub mod tts;

pub use narrator::Narrator;
pub use playback::{wav_duration, AudioPlayer};
pub use tts::GoogleTts;

use std::future::Future;
use thiserror::Error;
use wordbook_core::{Language, Voice};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("nothing to speak")]
    EmptyText,

    #[error("tts request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("tts HTTP {status}")]
    Http { status: reqwest::StatusCode },

    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid player command: '{0}'")]
    InvalidCommand(String),

    #[error("player '{program}' exited with {status}")]
    Player {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Turns text into MP3 bytes.
pub trait SpeechSynthesizer: Send + Sync + 'static {
    fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        language: Language,
    ) -> impl Future<Output = Result<Vec<u8>, SpeechError>> + Send;
}
