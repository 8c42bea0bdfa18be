use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app_state::{TuiState, View};

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    state.flash_message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.quit = true;
        return;
    }

    match state.view {
        View::Library => handle_library_key(state, key),
        View::Popup => handle_popup_key(state, key),
        View::Radio => handle_radio_key(state, key),
        View::History => handle_history_key(state, key),
    }
}

fn handle_library_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char('j') | KeyCode::Down => state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.select_previous(),
        KeyCode::Char('J') => state.word_move_down(),
        KeyCode::Char('K') => state.word_move_up(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => state.open_popup(),
        KeyCode::Char('o') => {
            let update = state.player.toggle_display_order();
            state.apply(update);
        }
        KeyCode::Char('r') => state.open_radio(),
        KeyCode::Char('H') => state.open_history(),
        KeyCode::Char('R') => {
            state.reload_store();
            state.flash_message = Some(format!("Reloaded {} wordbooks", state.titles.len()));
        }
        _ => {}
    }
}

fn handle_popup_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Esc | KeyCode::Char('h') => state.close_popup(),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('l') => state.popup_next(),
        KeyCode::Left | KeyCode::Char('p') => state.popup_previous(),
        KeyCode::Char(' ') => {
            state.toggle_auto_advance();
            let label = if state.player.settings().auto_advance { "on" } else { "off" };
            state.flash_message = Some(format!("Auto-advance {label}"));
        }
        KeyCode::Char('t') => {
            state.toggle_tts();
            let label = if state.player.settings().tts_enabled { "on" } else { "off" };
            state.flash_message = Some(format!("Speech {label}"));
        }
        KeyCode::Char('e') => {
            let update = state.player.toggle_example_visible();
            state.apply(update);
        }
        KeyCode::Char('x') => {
            let update = state.player.toggle_example_narration();
            state.apply(update);
        }
        KeyCode::Char('o') => {
            let update = state.player.toggle_display_order();
            state.apply(update);
        }
        _ => {}
    }
}

fn handle_radio_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Esc | KeyCode::Char('h') => state.close_radio(),
        KeyCode::Char('s') => state.toggle_radio_source(),
        KeyCode::Char('t') => state.toggle_radio_translation(),
        KeyCode::Char('g') => state.start_radio_generation(),
        KeyCode::Char('p') | KeyCode::Char(' ') => state.toggle_playback(),
        KeyCode::Char('j') | KeyCode::Down => {
            state.radio.scroll = state.radio.scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.radio.scroll = state.radio.scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_history_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Esc | KeyCode::Char('h') => state.view = View::Library,
        KeyCode::Char('j') | KeyCode::Down => {
            if state.history_scroll + 1 < state.history.len() {
                state.history_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.history_scroll = state.history_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
