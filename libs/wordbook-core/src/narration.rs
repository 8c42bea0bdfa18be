//! Narration plans: what to speak for an entry, and when.

use crate::types::{Example, Language, WordEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay before the meaning is spoken.
pub const MEANING_DELAY: Duration = Duration::from_millis(1500);
/// Delay before the primary example clause is spoken.
pub const EXAMPLE_DELAY: Duration = Duration::from_millis(3000);
/// Delay before the translated example clause is spoken.
pub const EXAMPLE_TRANSLATION_DELAY: Duration = Duration::from_millis(5000);

/// One utterance, offset from the start of its plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationStep {
    pub delay: Duration,
    pub text: String,
    pub language: Language,
}

/// Ordered utterances for one displayed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationPlan {
    pub steps: Vec<NarrationStep>,
}

impl NarrationPlan {
    /// Word, then meaning, then (optionally) the example clauses.
    pub fn for_entry(entry: &WordEntry, include_example: bool) -> Self {
        let mut plan = Self::default();
        plan.push(Duration::ZERO, &entry.word, Language::Source);
        plan.push(MEANING_DELAY, &entry.meaning, Language::Translation);

        if include_example {
            match entry.example() {
                Example::Bilingual {
                    primary,
                    translated,
                } => {
                    plan.push(EXAMPLE_DELAY, &primary, Language::Source);
                    plan.push(EXAMPLE_TRANSLATION_DELAY, &translated, Language::Translation);
                }
                Example::Plain { text } => plan.push(EXAMPLE_DELAY, &text, Language::Source),
                Example::None => {}
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn push(&mut self, delay: Duration, text: &str, language: Language) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.steps.push(NarrationStep {
            delay,
            text: text.to_string(),
            language,
        });
    }
}
