//! Studying a wordbook end to end: store, player and history together.

mod common;

use std::fs;
use std::time::Duration;

use common::fixtures::{numbered, ANIMALS};
use common::TestContext;
use pretty_assertions::assert_eq;
use wordbook_core::{Language, Player, PlayerSettings, TimerCommand, WordbookStore};
use wordbook_lib::db::HistoryRepository;

fn player_for(ctx: &TestContext) -> Player {
    Player::new(PlayerSettings {
        interval: ctx.state.config.interval,
        ..PlayerSettings::default()
    })
}

#[test]
fn session_over_a_full_cycle() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let book = ctx.state.store.get("animals").unwrap().clone();
    let mut player = player_for(&ctx);
    let history = &ctx.state.history;

    let id = history.start_session(&book.title, false).unwrap();
    let update = player.set_entries(book.entries.clone());
    assert_eq!(update.timer, TimerCommand::Start(Duration::from_millis(2000)));
    history.record_view(id).unwrap();

    let mut seen = vec![player.render().headline];
    for _ in 0..3 {
        let update = player.tick();
        assert_eq!(update.timer, TimerCommand::Keep);
        history.record_view(id).unwrap();
        seen.push(player.render().headline);
    }
    assert_eq!(seen, vec!["cat", "dog", "bird", "cat"]);

    assert_eq!(player.close(), TimerCommand::Stop);
    history.finish_session(id).unwrap();

    let session = &history.recent_sessions(1).unwrap()[0];
    assert_eq!(session.cards_viewed, 4);
    assert!(session.duration().is_some());
}

#[test]
fn manual_navigation_restarts_timer() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let mut player = player_for(&ctx);
    player.set_entries(ctx.state.store.get("animals").unwrap().entries.clone());

    let update = player.previous();
    assert_eq!(update.timer, TimerCommand::Start(Duration::from_millis(2000)));
    assert_eq!(player.render().position, "3/3");

    player.toggle_auto_advance();
    assert_eq!(player.next().timer, TimerCommand::Keep);
    assert_eq!(player.timer(), None);
    assert_eq!(player.render().position, "1/3");
}

#[test]
fn narration_follows_entry_and_settings() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let mut player = player_for(&ctx);
    player.toggle_tts();
    player.toggle_example_narration();

    let update = player.set_entries(ctx.state.store.get("animals").unwrap().entries.clone());
    let plan = update.narration.unwrap();
    let spoken: Vec<(&str, Language)> = plan
        .steps
        .iter()
        .map(|s| (s.text.as_str(), s.language))
        .collect();
    assert_eq!(
        spoken,
        vec![
            ("cat", Language::Source),
            ("고양이", Language::Translation),
            ("The cat sleeps", Language::Source),
            ("고양이가 잔다", Language::Translation),
        ]
    );
    assert!(plan.steps.windows(2).all(|w| w[0].delay < w[1].delay));

    let plan = player.next().narration.unwrap();
    assert_eq!(plan.steps.len(), 2);
}

#[test]
fn edited_file_reloads_into_player() {
    let ctx = TestContext::with_books(&[("250101_0900", "animals", ANIMALS)]);
    let mut player = player_for(&ctx);
    player.set_entries(ctx.state.store.get("animals").unwrap().entries.clone());
    player.next();

    let path = ctx.state.store.get("animals").unwrap().source_path.clone();
    fs::write(&path, numbered(5)).unwrap();
    let store = WordbookStore::load_all(ctx.words_dir());

    player.set_entries(store.get("animals").unwrap().entries.clone());
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.render().headline, "word0");
    assert_eq!(player.len(), 5);
}

#[test]
fn empty_player_shows_placeholder() {
    let ctx = TestContext::new();
    let mut player = player_for(&ctx);
    let update = player.set_entries(Vec::new());
    assert_eq!(update.timer, TimerCommand::Stop);
    assert!(update.narration.is_none());

    let model = player.render();
    assert!(model.is_empty);
    assert_eq!(model.position, "0/0");
    assert_eq!(player.tick().timer, TimerCommand::Keep);
}

#[test]
fn duplicate_titles_keep_first_folder() {
    let ctx = TestContext::with_books(&[
        ("250101_0900", "animals", ANIMALS),
        ("250301_0900", "animals", &numbered(2)),
    ]);
    let book = ctx.state.store.get("animals").unwrap();
    assert_eq!(ctx.state.store.len(), 1);
    assert_eq!(book.count(), 3);
    assert!(book.source_path.to_string_lossy().contains("250101_0900"));
}
