//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// One stretch of studying a wordbook in the popup player.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StudySession {
    pub id: i64,
    pub wordbook_title: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cards_viewed: u32,
    pub tts_enabled: bool,
}

impl StudySession {
    /// Length of a finished session.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}

/// Totals across all sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct HistoryStats {
    pub sessions: usize,
    pub total_views: usize,
    pub wordbooks: usize,
    pub last_studied_at: Option<DateTime<Utc>>,
}

/// Repository for study history.
pub trait HistoryRepository {
    fn start_session(&self, wordbook_title: &str, tts_enabled: bool) -> Result<i64>;
    fn record_view(&self, session_id: i64) -> Result<()>;
    fn finish_session(&self, session_id: i64) -> Result<()>;
    fn recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>>;
    fn history_stats(&self) -> Result<HistoryStats>;
    /// Carry history over when a wordbook is renamed.
    fn rename_wordbook(&self, old: &str, new: &str) -> Result<usize>;
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("bad timestamp '{raw}': {e}")))
}

type SessionRow = (i64, String, String, Option<String>, u32, bool);

fn row_to_session(row: SessionRow) -> Result<StudySession> {
    let (id, wordbook_title, started_at, ended_at, cards_viewed, tts_enabled) = row;
    Ok(StudySession {
        id,
        wordbook_title,
        started_at: parse_timestamp(&started_at)?,
        ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
        cards_viewed,
        tts_enabled,
    })
}

impl HistoryRepository for SqliteRepository {
    fn start_session(&self, wordbook_title: &str, tts_enabled: bool) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO study_sessions (wordbook_title, started_at, tts_enabled) VALUES (?1, ?2, ?3)",
            params![wordbook_title, Self::now(), tts_enabled],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn record_view(&self, session_id: i64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE study_sessions SET cards_viewed = cards_viewed + 1 WHERE id = ?1",
            params![session_id],
        )?;
        if updated == 0 {
            return Err(DbError::SessionNotFound(session_id));
        }
        Ok(())
    }

    fn finish_session(&self, session_id: i64) -> Result<()> {
        let exists = self
            .conn
            .query_row(
                "SELECT id FROM study_sessions WHERE id = ?1",
                params![session_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(DbError::SessionNotFound(session_id));
        }

        self.conn.execute(
            "UPDATE study_sessions SET ended_at = ?1 WHERE id = ?2 AND ended_at IS NULL",
            params![Self::now(), session_id],
        )?;
        Ok(())
    }

    fn recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, wordbook_title, started_at, ended_at, cards_viewed, tts_enabled
             FROM study_sessions
             ORDER BY started_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<SessionRow>, _>>()?;

        rows.into_iter().map(row_to_session).collect()
    }

    fn history_stats(&self) -> Result<HistoryStats> {
        let (sessions, total_views, wordbooks, last) = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(cards_viewed), 0),
                COUNT(DISTINCT wordbook_title),
                MAX(started_at)
             FROM study_sessions",
            [],
            |row| {
                Ok((
                    row.get::<_, usize>(0)?,
                    row.get::<_, usize>(1)?,
                    row.get::<_, usize>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )?;

        Ok(HistoryStats {
            sessions,
            total_views,
            wordbooks,
            last_studied_at: last.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    fn rename_wordbook(&self, old: &str, new: &str) -> Result<usize> {
        let updated = self.conn.execute(
            "UPDATE study_sessions SET wordbook_title = ?1 WHERE wordbook_title = ?2",
            params![new, old],
        )?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn session_lifecycle() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = repo.start_session("animals", true).unwrap();
        repo.record_view(id).unwrap();
        repo.record_view(id).unwrap();
        repo.finish_session(id).unwrap();

        let sessions = repo.recent_sessions(10).unwrap();
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.wordbook_title, "animals");
        assert_eq!(session.cards_viewed, 2);
        assert!(session.tts_enabled);
        assert!(session.ended_at.is_some());
        assert!(session.duration().unwrap() >= chrono::Duration::zero());
    }

    #[test]
    fn finishing_twice_keeps_first_end() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = repo.start_session("animals", false).unwrap();
        repo.finish_session(id).unwrap();
        let first = repo.recent_sessions(1).unwrap()[0].ended_at;
        repo.finish_session(id).unwrap();
        assert_eq!(repo.recent_sessions(1).unwrap()[0].ended_at, first);
    }

    #[test]
    fn unknown_session_is_reported() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert!(matches!(repo.record_view(42), Err(DbError::SessionNotFound(42))));
        assert!(matches!(repo.finish_session(42), Err(DbError::SessionNotFound(42))));
    }

    #[test]
    fn recent_sessions_newest_first_with_limit() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.start_session("a", false).unwrap();
        let b = repo.start_session("b", false).unwrap();
        let c = repo.start_session("c", false).unwrap();

        let ids: Vec<i64> = repo.recent_sessions(2).unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c, b]);
    }

    #[test]
    fn stats_aggregate_sessions() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.history_stats().unwrap(), HistoryStats::default());

        let a = repo.start_session("animals", false).unwrap();
        repo.record_view(a).unwrap();
        let b = repo.start_session("animals", false).unwrap();
        repo.record_view(b).unwrap();
        repo.record_view(b).unwrap();
        repo.start_session("verbs", false).unwrap();

        let stats = repo.history_stats().unwrap();
        assert_eq!(stats.sessions, 3);
        assert_eq!(stats.total_views, 3);
        assert_eq!(stats.wordbooks, 2);
        assert!(stats.last_studied_at.is_some());
    }

    #[test]
    fn rename_moves_history() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.start_session("animals", false).unwrap();
        repo.start_session("animals", false).unwrap();
        assert_eq!(repo.rename_wordbook("animals", "pets").unwrap(), 2);
        assert!(repo
            .recent_sessions(10)
            .unwrap()
            .iter()
            .all(|s| s.wordbook_title == "pets"));
    }

    #[test]
    fn open_on_disk_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        {
            let repo = SqliteRepository::open(&path).unwrap();
            repo.start_session("animals", false).unwrap();
        }
        let repo = SqliteRepository::open(&path).unwrap();
        assert_eq!(repo.history_stats().unwrap().sessions, 1);
    }
}
