//! Radio script artifacts stored beside a wordbook.
//!
//! `script.txt` holds alternating lines prefixed `+` (source language) or
//! `-` (translation). `script.wav` is the narration of the `+` lines.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const SCRIPT_TEXT_FILE: &str = "script.txt";
pub const SCRIPT_AUDIO_FILE: &str = "script.wav";
pub const SCRIPT_TEMP_AUDIO_FILE: &str = "script_temp.mp3";

/// Which half of the bilingual script a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    Source,
    Translation,
}

impl ScriptKind {
    pub fn sign(self) -> char {
        match self {
            Self::Source => '+',
            Self::Translation => '-',
        }
    }

    fn from_sign(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Source),
            '-' => Some(Self::Translation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub kind: ScriptKind,
    pub text: String,
}

/// Parse script text. Lines without a `+`/`-` sign are dropped.
pub fn parse_script(text: &str) -> Vec<ScriptLine> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            let mut chars = line.chars();
            let kind = ScriptKind::from_sign(chars.next()?)?;
            Some(ScriptLine {
                kind,
                text: chars.as_str().trim().to_string(),
            })
        })
        .collect()
}

/// Read and parse `script.txt`; unreadable files yield no lines.
pub fn parse_script_file(path: &Path) -> Vec<ScriptLine> {
    match fs::read_to_string(path) {
        Ok(text) => parse_script(&text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read script");
            Vec::new()
        }
    }
}

/// Render the selected halves of a script, one paragraph per line.
pub fn render_script(lines: &[ScriptLine], show_source: bool, show_translation: bool) -> String {
    lines
        .iter()
        .filter(|line| match line.kind {
            ScriptKind::Source => show_source,
            ScriptKind::Translation => show_translation,
        })
        .map(|line| format!("{}{}", line.kind.sign(), line.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text that gets narrated: the source lines only.
pub fn narration_text(lines: &[ScriptLine]) -> String {
    lines
        .iter()
        .filter(|line| line.kind == ScriptKind::Source && !line.text.is_empty())
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paths of the generated files for one wordbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptArtifacts {
    pub text: PathBuf,
    pub audio: PathBuf,
    pub temp_audio: PathBuf,
}

impl ScriptArtifacts {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            text: dir.join(SCRIPT_TEXT_FILE),
            audio: dir.join(SCRIPT_AUDIO_FILE),
            temp_audio: dir.join(SCRIPT_TEMP_AUDIO_FILE),
        }
    }

    pub fn for_wordbook(wordbook_path: &Path) -> Self {
        Self::in_dir(wordbook_path.parent().unwrap_or_else(|| Path::new(".")))
    }

    pub fn has_text(&self) -> bool {
        self.text.is_file()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_file()
    }

    /// Load the script if it exists.
    pub fn load_lines(&self) -> Vec<ScriptLine> {
        if self.has_text() {
            parse_script_file(&self.text)
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "+Good morning, listeners!\n-좋은 아침입니다, 청취자 여러분!\n\nTitle: ignored\n+  Let's collaborate.  \n-함께 협력합시다.";

    #[test]
    fn parse_signs_and_skip_other_lines() {
        let lines = parse_script(SCRIPT);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].kind, ScriptKind::Source);
        assert_eq!(lines[1].kind, ScriptKind::Translation);
        assert_eq!(lines[2].text, "Let's collaborate.");
    }

    #[test]
    fn render_filters_by_half() {
        let lines = parse_script(SCRIPT);
        assert_eq!(
            render_script(&lines, true, false),
            "+Good morning, listeners!\n\n+Let's collaborate."
        );
        assert_eq!(render_script(&lines, false, false), "");
        assert_eq!(render_script(&lines, true, true).matches("\n\n").count(), 3);
    }

    #[test]
    fn narration_uses_source_lines_only() {
        let lines = parse_script(SCRIPT);
        assert_eq!(
            narration_text(&lines),
            "Good morning, listeners! Let's collaborate."
        );
    }

    #[test]
    fn artifacts_sit_beside_wordbook() {
        let artifacts = ScriptArtifacts::for_wordbook(Path::new("/words/250112_0930/a_wordbook.txt"));
        assert_eq!(artifacts.text, PathBuf::from("/words/250112_0930/script.txt"));
        assert_eq!(artifacts.audio, PathBuf::from("/words/250112_0930/script.wav"));
        assert_eq!(
            artifacts.temp_audio,
            PathBuf::from("/words/250112_0930/script_temp.mp3")
        );
    }

    #[test]
    fn missing_script_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ScriptArtifacts::in_dir(dir.path());
        assert!(!artifacts.has_text());
        assert!(artifacts.load_lines().is_empty());
        assert!(parse_script_file(&artifacts.text).is_empty());
    }
}
