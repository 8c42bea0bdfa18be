//! Core wordbook library shared by the terminal app and its tests.
//!
//! Provides:
//! - Line parser and serializer for `*_wordbook.txt` files
//! - The wordbook collection and its file operations
//! - The flashcard player state machine and narration plans
//! - Radio script parsing and artifact locations

pub mod error;
pub mod narration;
pub mod parser;
pub mod player;
pub mod script;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use narration::{NarrationPlan, NarrationStep};
pub use parser::{parse, parse_file, serialize};
pub use player::{DisplayModel, Player, PlayerSettings, TimerCommand, Update};
pub use script::{render_script, ScriptArtifacts, ScriptKind, ScriptLine};
pub use store::{WordDraft, WordbookStore};
pub use types::{DisplayOrder, Example, Language, Voice, WordEntry, Wordbook};
