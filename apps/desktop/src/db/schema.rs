//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the history database.
pub const SCHEMA: &str = r#"
-- One row per popup session over a wordbook
CREATE TABLE IF NOT EXISTS study_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    wordbook_title TEXT NOT NULL,
    started_at TEXT NOT NULL,
    ended_at TEXT,
    cards_viewed INTEGER NOT NULL DEFAULT 0,
    tts_enabled INTEGER NOT NULL DEFAULT 0
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_study_sessions_started ON study_sessions(started_at);
CREATE INDEX IF NOT EXISTS idx_study_sessions_title ON study_sessions(wordbook_title);
"#;
