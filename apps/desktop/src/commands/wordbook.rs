//! Wordbook listing and management commands.

use super::{resolve_title, OutputFormat};
use crate::db::HistoryRepository;
use crate::state::AppState;
use anyhow::{bail, Context, Result};
use std::fmt::Write;
use std::path::PathBuf;
use wordbook_core::{DisplayOrder, WordDraft, Wordbook, WordbookStore};

pub fn list(store: &WordbookStore, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let output: Vec<_> = store
                .iter()
                .map(|book| {
                    serde_json::json!({
                        "title": book.title,
                        "count": book.count(),
                        "path": book.source_path.to_string_lossy(),
                        "hasScript": book.artifacts().has_text(),
                        "hasAudio": book.artifacts().has_audio(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Plain => {
            if store.is_empty() {
                return Ok(format!("(no wordbooks in {})", store.root().display()));
            }
            let width = store.iter().map(|b| b.title.chars().count()).max().unwrap_or(0);
            let mut out = String::new();
            for book in store.iter() {
                let radio = if book.artifacts().has_text() { "  [radio]" } else { "" };
                writeln!(out, "{:<width$}  {:>4} words{}", book.title, book.count(), radio)?;
            }
            Ok(out.trim_end().to_string())
        }
    }
}

pub fn show(store: &WordbookStore, query: &str, order: DisplayOrder, format: OutputFormat) -> Result<String> {
    let title = resolve_title(store, query)?;
    let book = store
        .get(&title)
        .with_context(|| format!("wordbook '{title}' disappeared"))?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = book
                .entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "word": e.word,
                        "meaning": e.meaning,
                        "example": e.example(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "title": book.title,
                "path": book.source_path.to_string_lossy(),
                "entries": entries,
            }))?)
        }
        OutputFormat::Plain => Ok(render_wordbook(book, order)),
    }
}

fn render_wordbook(book: &Wordbook, order: DisplayOrder) -> String {
    let mut out = format!("{} ({} words)\n", book.title, book.count());
    for (i, entry) in book.entries.iter().enumerate() {
        let (first, second) = order.arrange(&entry.word, &entry.meaning);
        out.push_str(&format!("{:>4}. {}  {}\n", i + 1, first, second));
        for line in entry.example().display_text().lines() {
            out.push_str(&format!("      {line}\n"));
        }
    }
    out.trim_end().to_string()
}

pub fn import(state: &mut AppState, paths: &[PathBuf]) -> Result<String> {
    let mut out = Vec::new();
    for path in paths {
        let book = state
            .store
            .import(path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        out.push(format!(
            "imported '{}' ({} words) -> {}",
            book.title,
            book.count(),
            book.source_path.display()
        ));
    }
    Ok(out.join("\n"))
}

/// Parse `word|meaning|example`; the example part is optional.
pub fn parse_entry_arg(raw: &str) -> Result<WordDraft> {
    let mut parts = raw.splitn(3, '|');
    let word = parts.next().unwrap_or_default().trim();
    let meaning = parts.next().unwrap_or_default().trim();
    let example = parts.next().unwrap_or_default().trim();
    if word.is_empty() || meaning.is_empty() {
        bail!("entry '{raw}' needs at least 'word|meaning'");
    }
    Ok(WordDraft::new(word, meaning, example))
}

pub fn create(state: &mut AppState, title: &str, entries: &[String]) -> Result<String> {
    let drafts = entries
        .iter()
        .map(|raw| parse_entry_arg(raw))
        .collect::<Result<Vec<_>>>()?;
    let book = state.store.create(title, drafts)?;
    Ok(format!(
        "created '{}' ({} words) -> {}",
        book.title,
        book.count(),
        book.source_path.display()
    ))
}

pub fn rename(state: &mut AppState, old: &str, new: &str) -> Result<String> {
    let old = resolve_title(&state.store, old)?;
    state.store.rename(&old, new)?;
    let moved = state.history.rename_wordbook(&old, new.trim())?;
    Ok(format!(
        "renamed '{old}' to '{}' ({moved} history sessions updated)",
        new.trim()
    ))
}

pub fn delete(state: &mut AppState, query: &str) -> Result<String> {
    let title = resolve_title(&state.store, query)?;
    let book = state.store.delete(&title)?;
    Ok(format!("deleted '{}' ({})", book.title, book.source_path.display()))
}
