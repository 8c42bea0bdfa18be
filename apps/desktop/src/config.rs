//! Runtime configuration read from the environment (and `.env`).

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use wordbook_core::player::DEFAULT_INTERVAL;
use wordbook_core::Voice;

const APP_DIR: &str = "wordbook";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";
const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_FFMPEG: &str = "ffmpeg";
const HISTORY_DB_FILE: &str = "history.db";
const LOG_FILE: &str = "wordbook.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("could not create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Chat-completions settings for radio script generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
}

impl OpenAiConfig {
    pub fn has_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub words_dir: PathBuf,
    pub data_dir: PathBuf,
    pub interval: Duration,
    pub voice: Voice,
    pub openai: OpenAiConfig,
    /// Player command line; the audio file path is appended.
    pub audio_player: String,
    pub ffmpeg: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("WORDBOOK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let words_dir = get("WORDBOOK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("words"));

        let interval = match get("WORDBOOK_INTERVAL_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "WORDBOOK_INTERVAL_MS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_INTERVAL,
        };

        let voice = match get("WORDBOOK_VOICE") {
            Some(raw) => Voice::from_str(&raw).ok_or(ConfigError::InvalidValue {
                key: "WORDBOOK_VOICE",
                value: raw,
            })?,
            None => Voice::default(),
        };

        let openai = OpenAiConfig {
            api_key: get("OPENAI_API_KEY"),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_endpoint: get("OPENAI_API_ENDPOINT")
                .map(|e| e.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
        };

        Ok(Self {
            words_dir,
            data_dir,
            interval,
            voice,
            openai,
            audio_player: get("WORDBOOK_AUDIO_PLAYER").unwrap_or_else(|| default_audio_player().to_string()),
            ffmpeg: get("WORDBOOK_FFMPEG").unwrap_or_else(|| DEFAULT_FFMPEG.to_string()),
        })
    }

    pub fn with_words_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.words_dir = dir;
        }
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.openai.api_key = Some(key);
        }
        self
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_DB_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Create the data and words directories if missing.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        for dir in [&self.data_dir, &self.words_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_audio_player() -> &'static str {
    if cfg!(target_os = "macos") {
        "afplay"
    } else {
        "ffplay -nodisp -autoexit -loglevel quiet"
    }
}
