//! Error types for wordbook-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by explicit wordbook collection changes.
///
/// Parsing never produces one of these: unreadable or malformed files
/// degrade to zero entries instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wordbook not found: {0}")]
    NotFound(String),

    #[error("a wordbook titled '{0}' already exists")]
    TitleConflict(String),

    #[error("invalid wordbook title: '{0}'")]
    InvalidTitle(String),

    #[error("no words could be loaded from {0}")]
    EmptyWordbook(String),

    #[error("entry {index} of '{title}' cannot be written: {reason}")]
    InvalidEntry {
        title: String,
        index: usize,
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
