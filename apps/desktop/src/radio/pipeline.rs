//! Script -> text file -> narration -> WAV.

use super::{AudioTranscoder, RadioError, ScriptGenerator};
use crate::speech::SpeechSynthesizer;
use std::fs;
use tracing::{info, warn};
use wordbook_core::script::{narration_text, parse_script};
use wordbook_core::{Language, ScriptArtifacts, ScriptLine, Voice, Wordbook};

/// Result of a finished radio generation.
#[derive(Debug, Clone)]
pub struct RadioOutput {
    pub title: String,
    pub lines: Vec<ScriptLine>,
    pub artifacts: ScriptArtifacts,
    /// False when the script had no source lines to narrate.
    pub audio_written: bool,
}

/// Generate the radio script and audio for a wordbook.
///
/// Writes `script.txt` and `script.wav` beside the wordbook file. Any
/// earlier `script.wav` is removed once the new script is written, so the
/// audio on disk always narrates the current script. The intermediate MP3 is
/// removed whether or not transcoding succeeds.
pub async fn generate_radio<G, S, T>(
    generator: &G,
    synth: &S,
    transcoder: &T,
    voice: Voice,
    wordbook: &Wordbook,
) -> Result<RadioOutput, RadioError>
where
    G: ScriptGenerator,
    S: SpeechSynthesizer,
    T: AudioTranscoder,
{
    let words = wordbook.words();
    if words.is_empty() {
        return Err(RadioError::NoWords(wordbook.title.clone()));
    }

    let script = generator.generate_script(&words).await?;
    let artifacts = wordbook.artifacts();
    fs::write(&artifacts.text, script.trim()).map_err(|e| RadioError::io(&artifacts.text, e))?;
    remove_audio(&artifacts)?;

    let lines = parse_script(&script);
    let narration = narration_text(&lines);
    if narration.is_empty() {
        warn!(title = %wordbook.title, "script has no lines to narrate");
        return Ok(RadioOutput {
            title: wordbook.title.clone(),
            lines,
            artifacts,
            audio_written: false,
        });
    }

    let mp3 = synth.synthesize(&narration, voice, Language::Source).await?;
    fs::write(&artifacts.temp_audio, mp3).map_err(|e| RadioError::io(&artifacts.temp_audio, e))?;

    let transcoded = transcoder
        .mp3_to_wav(&artifacts.temp_audio, &artifacts.audio)
        .await;
    if let Err(e) = fs::remove_file(&artifacts.temp_audio) {
        warn!(path = %artifacts.temp_audio.display(), error = %e, "failed to remove temp audio");
    }
    if transcoded.is_err() {
        remove_audio(&artifacts)?;
    }
    transcoded?;

    info!(title = %wordbook.title, lines = lines.len(), "radio generated");
    Ok(RadioOutput {
        title: wordbook.title.clone(),
        lines,
        artifacts,
        audio_written: true,
    })
}

fn remove_audio(artifacts: &ScriptArtifacts) -> Result<(), RadioError> {
    match fs::remove_file(&artifacts.audio) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RadioError::io(&artifacts.audio, e)),
    }
}
