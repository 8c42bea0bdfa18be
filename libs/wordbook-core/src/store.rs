//! Wordbook collection keyed by title, backed by files under one root.
//!
//! New wordbooks are written to `<root>/<yyMMdd_HHmm>/<title>_wordbook.txt`
//! so that each one gets its own folder for script artifacts.

use crate::error::{Result, StoreError};
use crate::parser::{self, title_from_file_name, wordbook_file_name, WORDBOOK_SUFFIX};
use crate::script::ScriptArtifacts;
use crate::types::{Example, WordEntry, Wordbook, EXAMPLE_MARKER};
use chrono::Local;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One row typed into the wordbook editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDraft {
    pub word: String,
    pub meaning: String,
    /// Example as typed; the marker is optional.
    pub example: String,
}

impl WordDraft {
    pub fn new(word: &str, meaning: &str, example: &str) -> Self {
        Self {
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: example.to_string(),
        }
    }

    /// Rows need both a word and a meaning to be kept.
    fn into_entry(self) -> Option<WordEntry> {
        let word = self.word.trim();
        let meaning = self.meaning.trim();
        if word.is_empty() || meaning.is_empty() {
            return None;
        }
        Some(WordEntry::new(word, meaning).with_example(&Example::parse(&self.example)))
    }
}

#[derive(Debug, Clone)]
pub struct WordbookStore {
    root: PathBuf,
    books: BTreeMap<String, Wordbook>,
}

impl WordbookStore {
    /// Empty store rooted at `root`; nothing is read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            books: BTreeMap::new(),
        }
    }

    /// Discover and parse every `*_wordbook.txt` under `root`, recursively.
    ///
    /// When two files share a title, the first in path order wins and the
    /// rest are skipped with a warning.
    pub fn load_all(root: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(root);
        store.reload();
        store
    }

    /// Re-run discovery, replacing the in-memory collection.
    pub fn reload(&mut self) {
        self.books.clear();

        if !self.root.is_dir() {
            warn!(root = %self.root.display(), "wordbook directory does not exist");
            return;
        }

        let mut paths: Vec<(String, PathBuf)> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable path");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let title = title_from_file_name(entry.file_name().to_str()?)?;
                Some((title, entry.into_path()))
            })
            .collect();
        paths.sort_by(|a, b| a.1.cmp(&b.1));

        for (title, path) in paths {
            if let Some(existing) = self.books.get(&title) {
                warn!(
                    title = %title,
                    kept = %existing.source_path.display(),
                    skipped = %path.display(),
                    "duplicate wordbook title"
                );
                continue;
            }

            let (entries, count) = parser::parse_file(&path);
            if count == 0 {
                warn!(path = %path.display(), "failed to load wordbook");
                continue;
            }

            debug!(title = %title, count, "loaded wordbook");
            self.books.insert(
                title.clone(),
                Wordbook {
                    title,
                    entries,
                    source_path: path,
                },
            );
        }

        info!(root = %self.root.display(), count = self.books.len(), "wordbooks loaded");
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, title: &str) -> Option<&Wordbook> {
        self.books.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.books.contains_key(title)
    }

    pub fn titles(&self) -> Vec<String> {
        self.books.keys().cloned().collect()
    }

    /// Word count per title, sorted by title.
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.books
            .values()
            .map(|book| (book.title.clone(), book.count()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wordbook> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Add an external wordbook file, copying it under the root.
    pub fn import(&mut self, path: &Path) -> Result<&Wordbook> {
        let (entries, count) = parser::parse_file(path);
        if count == 0 {
            return Err(StoreError::EmptyWordbook(path.display().to_string()));
        }

        let title = title_from_import_path(path)
            .ok_or_else(|| StoreError::InvalidTitle(path.display().to_string()))?;
        validate_title(&title)?;
        if self.contains(&title) {
            return Err(StoreError::TitleConflict(title));
        }

        let dir = self.fresh_dir()?;
        let target = dir.join(wordbook_file_name(&title));
        fs::copy(path, &target).map_err(|e| StoreError::io(&target, e))?;

        info!(title = %title, from = %path.display(), count, "imported wordbook");
        Ok(self.insert(Wordbook {
            title,
            entries,
            source_path: target,
        }))
    }

    /// Write a new wordbook from editor rows.
    pub fn create(&mut self, title: &str, drafts: Vec<WordDraft>) -> Result<&Wordbook> {
        let title = title.trim().to_string();
        validate_title(&title)?;
        if self.contains(&title) {
            return Err(StoreError::TitleConflict(title));
        }

        let entries: Vec<WordEntry> = drafts.into_iter().filter_map(WordDraft::into_entry).collect();
        if entries.is_empty() {
            return Err(StoreError::EmptyWordbook(title));
        }

        let dir = self.fresh_dir()?;
        let path = dir.join(wordbook_file_name(&title));
        write_entries(&path, &entries)?;

        info!(title = %title, count = entries.len(), "created wordbook");
        Ok(self.insert(Wordbook {
            title,
            entries,
            source_path: path,
        }))
    }

    /// Replace a wordbook's entries and rewrite its file.
    pub fn save(&mut self, title: &str, entries: Vec<WordEntry>) -> Result<()> {
        let book = self
            .books
            .get_mut(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;

        check_entries(title, &entries)?;
        write_entries(&book.source_path, &entries)?;
        book.entries = entries;
        Ok(())
    }

    /// Rename a wordbook. Collisions are rejected before anything changes.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        validate_title(new)?;

        let source = self
            .books
            .get(old)
            .map(|book| book.source_path.clone())
            .ok_or_else(|| StoreError::NotFound(old.to_string()))?;

        if self.contains(new) {
            return Err(StoreError::TitleConflict(new.to_string()));
        }

        let target = source
            .parent()
            .unwrap_or(self.root.as_path())
            .join(wordbook_file_name(new));
        if target.exists() {
            return Err(StoreError::TitleConflict(new.to_string()));
        }

        fs::rename(&source, &target).map_err(|e| StoreError::io(&source, e))?;

        if let Some(mut book) = self.books.remove(old) {
            book.title = new.to_string();
            book.source_path = target;
            self.books.insert(new.to_string(), book);
        }

        info!(from = %old, to = %new, "renamed wordbook");
        Ok(())
    }

    /// Delete a wordbook's file and drop it from the collection.
    ///
    /// Script artifacts go too once no other wordbook shares the folder.
    pub fn delete(&mut self, title: &str) -> Result<Wordbook> {
        let path = self
            .books
            .get(title)
            .map(|book| book.source_path.clone())
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "wordbook file already gone");
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        }

        if let Some(dir) = path.parent() {
            self.clean_folder(dir);
        }

        info!(title = %title, "deleted wordbook");
        self.books
            .remove(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    fn insert(&mut self, book: Wordbook) -> &Wordbook {
        let title = book.title.clone();
        self.books.entry(title).or_insert(book)
    }

    /// A new, empty dated folder under the root.
    fn fresh_dir(&self) -> Result<PathBuf> {
        let stamp = Local::now().format("%y%m%d_%H%M").to_string();
        let mut dir = self.root.join(&stamp);
        let mut n = 2;
        while dir_has_entries(&dir) {
            dir = self.root.join(format!("{stamp}_{n}"));
            n += 1;
        }
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(dir)
    }

    fn clean_folder(&self, dir: &Path) {
        let shared = self
            .books
            .values()
            .filter(|book| book.source_path.parent() == Some(dir))
            .count()
            > 1;
        if shared {
            return;
        }

        let artifacts = ScriptArtifacts::in_dir(dir);
        for file in [&artifacts.text, &artifacts.audio, &artifacts.temp_audio] {
            if file.exists() {
                if let Err(e) = fs::remove_file(file) {
                    warn!(path = %file.display(), error = %e, "failed to remove script artifact");
                }
            }
        }

        if dir != self.root && !dir_has_entries(dir) {
            if let Err(e) = fs::remove_dir(dir) {
                warn!(path = %dir.display(), error = %e, "failed to remove empty wordbook folder");
            }
        }
    }
}

/// Reject rows that would not read back as the same entries.
fn check_entries(title: &str, entries: &[WordEntry]) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        let reason = if entry.word.trim().is_empty() {
            "missing word"
        } else if entry.meaning.trim().is_empty() {
            "missing meaning"
        } else if [&entry.word, &entry.meaning, &entry.example]
            .iter()
            .any(|field| field.contains(['\n', '\r']))
        {
            "line break inside a field"
        } else if entry.word.trim_start().starts_with(EXAMPLE_MARKER) {
            "word starts with the example marker"
        } else {
            continue;
        };
        return Err(StoreError::InvalidEntry {
            title: title.to_string(),
            index,
            reason,
        });
    }
    Ok(())
}

fn write_entries(path: &Path, entries: &[WordEntry]) -> Result<()> {
    fs::write(path, parser::serialize(entries)).map_err(|e| StoreError::io(path, e))
}

fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Title for an imported file: its name without `_wordbook.txt`, or its stem.
fn title_from_import_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if let Some(title) = title_from_file_name(name) {
        return Some(title);
    }
    let stem = path.file_stem()?.to_str()?;
    let trimmed = stem.strip_suffix(WORDBOOK_SUFFIX.trim_end_matches(".txt")).unwrap_or(stem);
    Some(trimmed.to_string())
}

fn validate_title(title: &str) -> Result<()> {
    let bad = title.is_empty()
        || title != title.trim()
        || title == "."
        || title == ".."
        || title.contains(['/', '\\', '\n', '\r']);
    if bad {
        return Err(StoreError::InvalidTitle(title.to_string()));
    }
    Ok(())
}
