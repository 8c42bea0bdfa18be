//! Shared setup for integration tests.
//!
//! Every context owns a temporary data directory with a `words/` tree and an
//! in-memory history database. Nothing touches the network.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wordbook_core::WordbookStore;
use wordbook_lib::config::AppConfig;
use wordbook_lib::db::SqliteRepository;
use wordbook_lib::state::AppState;

pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Empty words directory.
    pub fn new() -> Self {
        Self::with_books(&[])
    }

    /// Words directory seeded with `(folder, title, content)` triples.
    pub fn with_books(books: &[(&str, &str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = test_config(dir.path());
        fs::create_dir_all(&config.words_dir).expect("words dir");

        for (folder, title, content) in books {
            write_book(&config.words_dir, folder, title, content);
        }

        let store = WordbookStore::load_all(&config.words_dir);
        let history = SqliteRepository::open_in_memory().expect("history db");
        let state = AppState::with_parts(config, store, history);
        Self { dir, state }
    }

    pub fn words_dir(&self) -> &Path {
        &self.state.config.words_dir
    }

    /// Write a file outside the words directory, for import tests.
    pub fn outside_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join("incoming").join(name);
        fs::create_dir_all(path.parent().expect("parent")).expect("incoming dir");
        fs::write(&path, content).expect("write outside file");
        path
    }
}

pub fn test_config(data_dir: &Path) -> AppConfig {
    let vars: HashMap<&str, String> = [
        ("WORDBOOK_DATA_DIR", data_dir.to_string_lossy().to_string()),
        ("WORDBOOK_INTERVAL_MS", "2000".to_string()),
        ("WORDBOOK_AUDIO_PLAYER", "true".to_string()),
    ]
    .into_iter()
    .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub fn write_book(words_dir: &Path, folder: &str, title: &str, content: &str) -> PathBuf {
    let folder = words_dir.join(folder);
    fs::create_dir_all(&folder).expect("book folder");
    let path = folder.join(format!("{title}_wordbook.txt"));
    fs::write(&path, content).expect("write book");
    path
}
