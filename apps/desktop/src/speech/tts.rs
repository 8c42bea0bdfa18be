//! Google Translate TTS client.

use super::{SpeechError, SpeechSynthesizer};
use std::time::Duration;
use tracing::debug;
use wordbook_core::{Language, Voice};

/// The endpoint rejects longer inputs.
pub const MAX_CHUNK_CHARS: usize = 200;

const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) wordbook";

#[derive(Clone)]
pub struct GoogleTts {
    client: reqwest::Client,
}

impl GoogleTts {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    fn endpoint(tld: &str) -> String {
        format!("https://translate.google.{tld}/translate_tts")
    }

    async fn fetch_chunk(&self, url: &str, lang: &str, chunk: &str, index: usize, total: usize) -> Result<Vec<u8>, SpeechError> {
        let idx = index.to_string();
        let total = total.to_string();
        let len = chunk.chars().count().to_string();

        let resp = self
            .client
            .get(url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", len.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SpeechError::Http { status });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

impl Default for GoogleTts {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, voice: Voice, language: Language) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let (lang, tld) = voice.locale_for(language);
        let url = Self::endpoint(tld);
        debug!(lang, tld, chunks = chunks.len(), "synthesizing speech");

        let mut audio = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(&url, lang, chunk, i, chunks.len()).await?);
        }
        Ok(audio)
    }
}

/// Split text into pieces of at most `max` characters, breaking on whitespace.
///
/// Words longer than `max` are cut at character boundaries.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("  hello   world ", 200), vec!["hello world".to_string()]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_chunks("   \n ", 200).is_empty());
    }

    #[test]
    fn breaks_on_whitespace() {
        assert_eq!(
            split_chunks("aa bb cc dd", 5),
            vec!["aa bb".to_string(), "cc dd".to_string()]
        );
    }

    #[test]
    fn long_word_is_cut() {
        assert_eq!(
            split_chunks("x abcdefg y", 3),
            vec!["x".to_string(), "abc".into(), "def".into(), "g".into(), "y".into()]
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let chunks = split_chunks("나는 빠르게 달린다", 6);
        assert_eq!(chunks, vec!["나는 빠르게".to_string(), "달린다".into()]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 6));
    }

    #[test]
    fn endpoint_uses_regional_host() {
        assert_eq!(
            GoogleTts::endpoint("co.uk"),
            "https://translate.google.co.uk/translate_tts"
        );
    }
}
