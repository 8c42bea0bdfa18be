//! Study history command.

use super::OutputFormat;
use crate::db::{HistoryRepository, HistoryStats, StudySession};
use anyhow::Result;
use chrono::Local;

pub fn run<R: HistoryRepository>(repo: &R, limit: usize, format: OutputFormat) -> Result<String> {
    let sessions = repo.recent_sessions(limit)?;
    let stats = repo.history_stats()?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "stats": stats,
            "sessions": sessions,
        }))?),
        OutputFormat::Plain => Ok(render(&stats, &sessions)),
    }
}

pub fn render(stats: &HistoryStats, sessions: &[StudySession]) -> String {
    let mut out = format!(
        "{} sessions, {} cards viewed, {} wordbooks",
        stats.sessions, stats.total_views, stats.wordbooks
    );
    if sessions.is_empty() {
        out.push_str("\n(no study sessions yet)");
        return out;
    }

    out.push('\n');
    for session in sessions {
        out.push('\n');
        out.push_str(&session_line(session));
    }
    out
}

pub fn session_line(session: &StudySession) -> String {
    let started = session.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let length = match session.duration() {
        Some(d) => format!("{}m{:02}s", d.num_minutes(), d.num_seconds() % 60),
        None => "open".to_string(),
    };
    let tts = if session.tts_enabled { "  tts" } else { "" };
    format!(
        "{started}  {:<20} {:>4} cards  {length}{tts}",
        session.wordbook_title, session.cards_viewed
    )
}
