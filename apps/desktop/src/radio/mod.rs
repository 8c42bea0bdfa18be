//! Radio mode: a generated bilingual script that uses every word of a
//! wordbook, plus its narrated audio.

pub mod generator;
pub mod pipeline;
pub mod transcode;

pub use generator::{OpenAiScriptGenerator, ScriptGenerator};
pub use pipeline::{generate_radio, RadioOutput};
pub use transcode::{AudioTranscoder, FfmpegTranscoder};

use crate::speech::SpeechError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadioError {
    #[error("an OpenAI API key is required for radio generation")]
    MissingApiKey,

    #[error("wordbook '{0}' has no words")]
    NoWords(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty response from the script generator")]
    EmptyResponse,

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("speech synthesis failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("transcoding failed: {0}")]
    Transcode(String),
}

impl RadioError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Playback clock as `MM:SS`. Minutes keep counting past 59.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
