//! Radio generation with fake generator, synthesizer and transcoder.

mod common;

use std::fs;

use common::fixtures::{CannedGenerator, CopyTranscoder, EchoSynth, ANIMALS};
use common::TestContext;
use pretty_assertions::assert_eq;
use wordbook_core::{ScriptKind, Voice, WordbookStore};
use wordbook_lib::commands::{radio, OutputFormat};
use wordbook_lib::radio::{generate_radio, RadioError};

const SCRIPT: &str = "\
+Good morning, this is animal radio. A cat sleeps in the sun.

-좋은 아침입니다, 동물 라디오입니다. 고양이가 햇볕에서 잔다.
+A dog and a bird play outside.
-개와 새가 밖에서 논다.
";

#[tokio::test]
async fn writes_script_and_audio_beside_wordbook() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let book = ctx.state.store.get("animals").unwrap();
    let generator = CannedGenerator::new(SCRIPT);

    let output = generate_radio(&generator, &EchoSynth, &CopyTranscoder, Voice::default(), book)
        .await
        .unwrap();

    assert_eq!(*generator.seen.lock().unwrap(), vec!["cat", "dog", "bird"]);
    assert_eq!(output.title, "animals");
    assert!(output.audio_written);

    let folder = ctx.words_dir().join("250101_0900");
    assert_eq!(output.artifacts.text, folder.join("script.txt"));
    assert_eq!(output.artifacts.audio, folder.join("script.wav"));
    assert!(!output.artifacts.temp_audio.exists());

    let kinds: Vec<ScriptKind> = output.lines.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ScriptKind::Source,
            ScriptKind::Translation,
            ScriptKind::Source,
            ScriptKind::Translation
        ]
    );

    let audio = fs::read_to_string(&output.artifacts.audio).unwrap();
    assert_eq!(
        audio,
        "Good morning, this is animal radio. A cat sleeps in the sun. A dog and a bird play outside."
    );
}

#[tokio::test]
async fn stored_script_is_shown_by_command() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let book = ctx.state.store.get("animals").unwrap();
    generate_radio(&CannedGenerator::new(SCRIPT), &EchoSynth, &CopyTranscoder, Voice::default(), book)
        .await
        .unwrap();

    let store = WordbookStore::load_all(ctx.words_dir());
    let translation = radio::show(&store, "animals", false, true, OutputFormat::Plain).unwrap();
    assert_eq!(
        translation,
        "-좋은 아침입니다, 동물 라디오입니다. 고양이가 햇볕에서 잔다.\n\n-개와 새가 밖에서 논다."
    );

    let json: serde_json::Value =
        serde_json::from_str(&radio::show(&store, "animals", true, true, OutputFormat::Json).unwrap()).unwrap();
    assert!(json["audio"].as_str().unwrap().ends_with("script.wav"));
}

#[tokio::test]
async fn script_without_source_lines_skips_audio() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let book = ctx.state.store.get("animals").unwrap();
    let earlier = generate_radio(&CannedGenerator::new(SCRIPT), &EchoSynth, &CopyTranscoder, Voice::default(), book)
        .await
        .unwrap();
    assert!(earlier.artifacts.has_audio());

    let generator = CannedGenerator::new("Sorry, I cannot help with that.");

    let output = generate_radio(&generator, &EchoSynth, &CopyTranscoder, Voice::default(), book)
        .await
        .unwrap();

    assert!(!output.audio_written);
    assert!(output.artifacts.has_text());
    assert!(!output.artifacts.has_audio());

    let store = WordbookStore::load_all(ctx.words_dir());
    let json: serde_json::Value =
        serde_json::from_str(&radio::show(&store, "animals", true, true, OutputFormat::Json).unwrap()).unwrap();
    assert!(json["audio"].is_null());
}

#[tokio::test]
async fn regeneration_overwrites_previous_script() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let book = ctx.state.store.get("animals").unwrap();

    generate_radio(&CannedGenerator::new(SCRIPT), &EchoSynth, &CopyTranscoder, Voice::default(), book)
        .await
        .unwrap();
    let output = generate_radio(
        &CannedGenerator::new("+A short one.\n-짧은 것.\n"),
        &EchoSynth,
        &CopyTranscoder,
        Voice::default(),
        book,
    )
    .await
    .unwrap();

    assert_eq!(fs::read_to_string(&output.artifacts.text).unwrap(), "+A short one.\n-짧은 것.");
    assert_eq!(fs::read_to_string(&output.artifacts.audio).unwrap(), "A short one.");
}

#[tokio::test]
async fn wordbook_without_words_is_rejected() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let mut book = ctx.state.store.get("animals").unwrap().clone();
    book.entries.clear();

    let err = generate_radio(&CannedGenerator::new(SCRIPT), &EchoSynth, &CopyTranscoder, Voice::default(), &book)
        .await
        .unwrap_err();
    assert!(matches!(err, RadioError::NoWords(title) if title == "animals"));
    assert!(!book.artifacts().has_text());
}
