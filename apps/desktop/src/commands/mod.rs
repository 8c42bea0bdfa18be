//! CLI subcommands. Each returns the text to print.

pub mod history;
pub mod radio;
pub mod wordbook;

use anyhow::{bail, Result};
use wordbook_core::WordbookStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Find a wordbook title: exact match first, then a unique case-insensitive
/// prefix.
pub fn resolve_title(store: &WordbookStore, query: &str) -> Result<String> {
    if store.contains(query) {
        return Ok(query.to_string());
    }

    let query_lower = query.to_lowercase();
    let titles = store.titles();

    if let Some(title) = titles.iter().find(|t| t.to_lowercase() == query_lower) {
        return Ok(title.clone());
    }

    let matches: Vec<&String> = titles
        .iter()
        .filter(|t| t.to_lowercase().starts_with(&query_lower))
        .collect();

    match matches.len() {
        0 => bail!(
            "No wordbook matching '{}'. Available wordbooks:\n{}",
            query,
            bullet_list(titles.iter())
        ),
        1 => Ok(matches[0].clone()),
        _ => bail!(
            "Ambiguous wordbook name '{}'. Matches:\n{}",
            query,
            bullet_list(matches.into_iter())
        ),
    }
}

fn bullet_list<'a>(titles: impl Iterator<Item = &'a String>) -> String {
    titles
        .map(|t| format!("  - {t}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store(titles: &[&str]) -> (tempfile::TempDir, WordbookStore) {
        let dir = tempfile::tempdir().unwrap();
        for (i, title) in titles.iter().enumerate() {
            let folder = dir.path().join(format!("f{i}"));
            fs::create_dir_all(&folder).unwrap();
            fs::write(folder.join(format!("{title}_wordbook.txt")), "cat\n고양이\n").unwrap();
        }
        let store = WordbookStore::load_all(dir.path());
        (dir, store)
    }

    #[test]
    fn exact_then_case_insensitive() {
        let (_dir, store) = store(&["Animals", "animals2"]);
        assert_eq!(resolve_title(&store, "Animals").unwrap(), "Animals");
        assert_eq!(resolve_title(&store, "animals").unwrap(), "Animals");
    }

    #[test]
    fn unique_prefix() {
        let (_dir, store) = store(&["animals", "verbs"]);
        assert_eq!(resolve_title(&store, "ver").unwrap(), "verbs");
    }

    #[test]
    fn ambiguous_or_missing() {
        let (_dir, store) = store(&["travel-1", "travel-2"]);
        let err = resolve_title(&store, "trav").unwrap_err().to_string();
        assert!(err.contains("Ambiguous"));
        let err = resolve_title(&store, "zzz").unwrap_err().to_string();
        assert!(err.contains("travel-1"));
    }
}
