//! Sample wordbook content and fakes for the radio pipeline.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use wordbook_core::{Language, Voice};
use wordbook_lib::radio::{AudioTranscoder, RadioError, ScriptGenerator};
use wordbook_lib::speech::{SpeechError, SpeechSynthesizer};

pub const ANIMALS: &str = "\
cat
고양이
-The cat sleeps+고양이가 잔다
dog
강아지
bird
새
";

pub const VERBS: &str = "\
run
달리다
-I run fast+나는 빠르게 달린다
eat
먹다
";

/// `n` generated entries without examples.
pub fn numbered(n: usize) -> String {
    (0..n)
        .map(|i| format!("word{i}\n뜻{i}\n"))
        .collect::<Vec<_>>()
        .join("")
}

/// Returns a fixed script and remembers the words it was asked about.
pub struct CannedGenerator {
    pub script: String,
    pub seen: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptGenerator for CannedGenerator {
    async fn generate_script(&self, words: &[String]) -> Result<String, RadioError> {
        self.seen.lock().unwrap().extend(words.iter().cloned());
        Ok(self.script.clone())
    }
}

/// Echoes the text back as the audio bytes.
pub struct EchoSynth;

impl SpeechSynthesizer for EchoSynth {
    async fn synthesize(&self, text: &str, _voice: Voice, _language: Language) -> Result<Vec<u8>, SpeechError> {
        Ok(text.as_bytes().to_vec())
    }
}

/// Copies the mp3 bytes to the wav path.
pub struct CopyTranscoder;

impl AudioTranscoder for CopyTranscoder {
    async fn mp3_to_wav(&self, mp3: &Path, wav: &Path) -> Result<(), RadioError> {
        fs::copy(mp3, wav).map_err(|source| RadioError::Io {
            path: wav.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
