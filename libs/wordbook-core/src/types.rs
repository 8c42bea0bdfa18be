//! Core types for the wordbook application.

use crate::script::ScriptArtifacts;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Leading character of an example line.
pub const EXAMPLE_MARKER: char = '-';

/// Separator between the primary-language and translated example clauses.
pub const EXAMPLE_SEPARATOR: char = '+';

/// One word of a wordbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub meaning: String,
    /// Raw example line as stored on disk (marker included), or empty.
    pub example: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            example: String::new(),
        }
    }

    pub fn with_example(mut self, example: &Example) -> Self {
        self.example = example.to_line();
        self
    }

    /// Parsed view of the example line.
    pub fn example(&self) -> Example {
        Example::parse(&self.example)
    }

    pub fn has_example(&self) -> bool {
        !self.example.trim().is_empty()
    }
}

/// Example sentence attached to a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Example {
    None,
    Bilingual { primary: String, translated: String },
    Plain { text: String },
}

impl Example {
    /// Parse an example line, with or without its leading marker.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let body = trimmed.strip_prefix(EXAMPLE_MARKER).unwrap_or(trimmed);

        if body.trim().is_empty() {
            return Self::None;
        }

        match body.split_once(EXAMPLE_SEPARATOR) {
            Some((primary, translated)) => Self::Bilingual {
                primary: primary.trim().to_string(),
                translated: translated.trim().to_string(),
            },
            None => Self::Plain {
                text: body.trim().to_string(),
            },
        }
    }

    /// On-disk form, marker restored.
    pub fn to_line(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Bilingual {
                primary,
                translated,
            } => format!("{EXAMPLE_MARKER}{primary}{EXAMPLE_SEPARATOR}{translated}"),
            Self::Plain { text } => format!("{EXAMPLE_MARKER}{text}"),
        }
    }

    /// Text shown under the word: one clause per line.
    pub fn display_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Bilingual {
                primary,
                translated,
            } => format!("{primary}\n{translated}"),
            Self::Plain { text } => text.clone(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A titled list of words backed by a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wordbook {
    pub title: String,
    pub entries: Vec<WordEntry>,
    pub source_path: PathBuf,
}

impl Wordbook {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Script artifact locations next to the wordbook file.
    pub fn artifacts(&self) -> ScriptArtifacts {
        ScriptArtifacts::for_wordbook(&self.source_path)
    }

    /// Words to hand to the script generator, blanks removed.
    pub fn words(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.word.is_empty())
            .map(|e| e.word.clone())
            .collect()
    }
}

/// Which field of an entry is shown first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOrder {
    #[default]
    WordFirst,
    MeaningFirst,
}

impl DisplayOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::WordFirst => Self::MeaningFirst,
            Self::MeaningFirst => Self::WordFirst,
        }
    }

    /// Order a (word, meaning) pair for display.
    pub fn arrange<'a>(self, word: &'a str, meaning: &'a str) -> (&'a str, &'a str) {
        match self {
            Self::WordFirst => (word, meaning),
            Self::MeaningFirst => (meaning, word),
        }
    }
}

/// Language of a narrated clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// The language being studied (English).
    Source,
    /// The learner's language (Korean).
    Translation,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::Source => "en",
            Self::Translation => "ko",
        }
    }
}

/// Narration voice for source-language text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Voice {
    #[default]
    UsFemale,
    UkMale,
    KoreanFemale,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsFemale => "us-female",
            Self::UkMale => "uk-male",
            Self::KoreanFemale => "korean-female",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us-female" | "us" => Some(Self::UsFemale),
            "uk-male" | "uk" => Some(Self::UkMale),
            "korean-female" | "ko" | "kr" => Some(Self::KoreanFemale),
            _ => None,
        }
    }

    /// Language code and regional host suffix used for a clause.
    ///
    /// Translation clauses always use the Korean voice.
    pub fn locale_for(self, language: Language) -> (&'static str, &'static str) {
        match (language, self) {
            (Language::Translation, _) | (_, Self::KoreanFemale) => ("ko", "co.kr"),
            (Language::Source, Self::UsFemale) => ("en", "com"),
            (Language::Source, Self::UkMale) => ("en", "co.uk"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bilingual_example() {
        let example = Example::parse("-Hello there+안녕하세요");
        assert_eq!(
            example,
            Example::Bilingual {
                primary: "Hello there".into(),
                translated: "안녕하세요".into(),
            }
        );
    }

    #[test]
    fn parse_example_without_separator_is_opaque() {
        let example = Example::parse("-just english, no marker");
        assert_eq!(
            example,
            Example::Plain {
                text: "just english, no marker".into()
            }
        );
    }

    #[test]
    fn parse_example_splits_on_first_separator_only() {
        let example = Example::parse("-1 + 1 is two+1 더하기 1은 2");
        assert_eq!(
            example,
            Example::Bilingual {
                primary: "1".into(),
                translated: "1 is two+1 더하기 1은 2".into(),
            }
        );
    }

    #[test]
    fn empty_example_is_none() {
        assert!(Example::parse("").is_none());
        assert!(Example::parse("-").is_none());
        assert_eq!(Example::None.to_line(), "");
    }

    #[test]
    fn example_line_restores_marker() {
        let example = Example::parse("I run fast + 나는 빠르게 달린다");
        assert_eq!(example.to_line(), "-I run fast+나는 빠르게 달린다");
        assert_eq!(example.display_text(), "I run fast\n나는 빠르게 달린다");
    }

    #[test]
    fn display_order_arranges_fields() {
        assert_eq!(DisplayOrder::WordFirst.arrange("cat", "고양이"), ("cat", "고양이"));
        assert_eq!(DisplayOrder::MeaningFirst.arrange("cat", "고양이"), ("고양이", "cat"));
        assert_eq!(DisplayOrder::WordFirst.toggled().toggled(), DisplayOrder::WordFirst);
    }

    #[test]
    fn voice_locale_mapping() {
        assert_eq!(Voice::UkMale.locale_for(Language::Source), ("en", "co.uk"));
        assert_eq!(Voice::UsFemale.locale_for(Language::Translation), ("ko", "co.kr"));
        assert_eq!(Voice::from_str("UK-male"), Some(Voice::UkMale));
        assert_eq!(Voice::from_str("robot"), None);
    }
}
