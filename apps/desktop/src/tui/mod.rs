//! Interactive study UI.

mod app_state;
mod key_handler;
mod status_bar;
mod ui;

use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use crate::commands::resolve_title;
use crate::state::AppState;
pub use app_state::{TuiState, UiMessage, View};

/// Run the study UI until the user quits. Must be called inside a tokio
/// runtime context; narration and radio generation spawn tasks on it.
pub fn run(app: AppState, initial: Option<&str>) -> Result<()> {
    let initial = initial
        .map(|query| resolve_title(&app.store, query))
        .transpose()?;

    let mut state = TuiState::new(app)?;
    state.start_watching();
    if let Some(title) = initial {
        state.select_title(&title);
        state.open_popup();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut state);
    state.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut TuiState) -> Result<()> {
    loop {
        state.drain_messages();
        state.poll_playback();
        state.check_timer(Instant::now());

        terminal.draw(|f| ui::draw(f, &*state))?;

        if state.quit {
            return Ok(());
        }

        if event::poll(state.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    key_handler::handle_key(state, key);
                }
            }
        }
    }
}
