//! Line-oriented parser for wordbook files.
//!
//! # Format
//! ```text
//! run
//! 달리다
//! -I run fast+나는 빠르게 달린다
//! cat
//! 고양이
//! ```
//!
//! Lines are trimmed and blank lines are skipped. Each entry is a word line,
//! a meaning line, and an optional example line starting with `-`.

use crate::types::{Example, WordEntry, EXAMPLE_MARKER, EXAMPLE_SEPARATOR};
use std::fs;
use std::path::Path;
use tracing::warn;

/// File name suffix that marks a wordbook file.
pub const WORDBOOK_SUFFIX: &str = "_wordbook.txt";

/// Parse wordbook content into entries.
///
/// Never fails: a trailing word with no meaning line becomes an entry with an
/// empty meaning.
pub fn parse(content: &str) -> Vec<WordEntry> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let word = lines[i];
        let meaning = lines.get(i + 1).copied().unwrap_or_default();

        match lines.get(i + 2).copied().filter(|l| is_example_line(l)) {
            Some(line) => {
                entries.push(WordEntry {
                    word: word.to_string(),
                    meaning: meaning.to_string(),
                    example: normalize_example(line),
                });
                i += 3;
            }
            None => {
                entries.push(WordEntry::new(word, meaning));
                i += 2;
            }
        }
    }

    entries
}

/// Read and parse a wordbook file, returning the entries and their count.
///
/// I/O errors are logged and reported as zero entries.
pub fn parse_file(path: &Path) -> (Vec<WordEntry>, usize) {
    match fs::read_to_string(path) {
        Ok(content) => {
            let entries = parse(&content);
            let count = entries.len();
            (entries, count)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read wordbook");
            (Vec::new(), 0)
        }
    }
}

/// Serialize entries back into the wordbook line format.
pub fn serialize(entries: &[WordEntry]) -> String {
    let mut out = String::new();

    for entry in entries {
        out.push_str(&entry.word);
        out.push('\n');
        out.push_str(&entry.meaning);
        out.push('\n');
        if entry.has_example() {
            out.push_str(&restore_marker(&entry.example));
            out.push('\n');
        }
    }

    out
}

/// Recover a title from `<title>_wordbook.txt`.
pub fn title_from_file_name(file_name: &str) -> Option<String> {
    file_name
        .strip_suffix(WORDBOOK_SUFFIX)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
}

/// File name for a wordbook title.
pub fn wordbook_file_name(title: &str) -> String {
    format!("{title}{WORDBOOK_SUFFIX}")
}

fn is_example_line(line: &str) -> bool {
    line.starts_with(EXAMPLE_MARKER)
}

/// Tidy `-a + b` into `-a+b`; lines without a separator are kept verbatim.
fn normalize_example(line: &str) -> String {
    if line.contains(EXAMPLE_SEPARATOR) {
        Example::parse(line).to_line()
    } else {
        line.to_string()
    }
}

fn restore_marker(example: &str) -> String {
    let trimmed = example.trim();
    if trimmed.starts_with(EXAMPLE_MARKER) {
        trimmed.to_string()
    } else {
        format!("{EXAMPLE_MARKER}{trimmed}")
    }
}
