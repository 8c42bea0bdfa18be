//! Application state.

use crate::config::AppConfig;
use crate::db::SqliteRepository;
use anyhow::Context;
use tracing::info;
use wordbook_core::WordbookStore;

/// Everything a command or the terminal UI works against.
pub struct AppState {
    pub config: AppConfig,
    pub store: WordbookStore,
    pub history: SqliteRepository,
}

impl AppState {
    /// Create directories, load every wordbook and open the history database.
    pub fn open(config: AppConfig) -> anyhow::Result<Self> {
        config.ensure_dirs()?;

        let store = WordbookStore::load_all(&config.words_dir);
        let db_path = config.history_db_path();
        let history = SqliteRepository::open(&db_path)
            .with_context(|| format!("failed to open history database {}", db_path.display()))?;

        info!(
            words_dir = %config.words_dir.display(),
            wordbooks = store.len(),
            "application state ready"
        );
        Ok(Self {
            config,
            store,
            history,
        })
    }

    /// In-memory history, for tests.
    pub fn with_parts(config: AppConfig, store: WordbookStore, history: SqliteRepository) -> Self {
        Self {
            config,
            store,
            history,
        }
    }
}
