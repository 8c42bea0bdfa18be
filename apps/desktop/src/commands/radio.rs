//! Radio script commands.

use super::{resolve_title, OutputFormat};
use crate::radio::{generate_radio, FfmpegTranscoder, OpenAiScriptGenerator};
use crate::speech::{wav_duration, GoogleTts};
use crate::state::AppState;
use anyhow::{bail, Context, Result};
use wordbook_core::{render_script, WordbookStore};

pub async fn generate(state: &AppState, query: &str) -> Result<String> {
    let title = resolve_title(&state.store, query)?;
    let book = state
        .store
        .get(&title)
        .with_context(|| format!("wordbook '{title}' disappeared"))?;

    let generator = OpenAiScriptGenerator::new(state.config.openai.clone())?;
    let synth = GoogleTts::new();
    let transcoder = FfmpegTranscoder::new(state.config.ffmpeg.clone());

    let output = generate_radio(&generator, &synth, &transcoder, state.config.voice, book).await?;

    let mut text = render_script(&output.lines, true, true);
    text.push_str(&format!("\n\nscript: {}", output.artifacts.text.display()));
    if output.audio_written {
        let length = wav_duration(&output.artifacts.audio)
            .map(|d| format!(" ({})", crate::radio::format_clock(d)))
            .unwrap_or_default();
        text.push_str(&format!("\naudio:  {}{}", output.artifacts.audio.display(), length));
    }
    Ok(text)
}

pub fn show(
    store: &WordbookStore,
    query: &str,
    show_source: bool,
    show_translation: bool,
    format: OutputFormat,
) -> Result<String> {
    let title = resolve_title(store, query)?;
    let book = store
        .get(&title)
        .with_context(|| format!("wordbook '{title}' disappeared"))?;

    let artifacts = book.artifacts();
    if !artifacts.has_text() {
        bail!("no radio script for '{title}'; run `wordbook radio generate \"{title}\"` first");
    }
    let lines = artifacts.load_lines();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "title": title,
            "lines": lines,
            "audio": artifacts.has_audio().then(|| artifacts.audio.to_string_lossy().to_string()),
        }))?),
        OutputFormat::Plain => Ok(render_script(&lines, show_source, show_translation)),
    }
}
