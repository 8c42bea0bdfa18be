//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("study session not found: {0}")]
    SessionNotFound(i64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
