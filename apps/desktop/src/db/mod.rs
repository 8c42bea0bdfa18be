//! Local SQLite database for study history.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{HistoryRepository, HistoryStats, SqliteRepository, StudySession};
