use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{TuiState, View};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {msg}"))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    let hints = match state.view {
        View::Library => {
            " j/k: wordbook  J/K: word  Enter: study  o: order  r: radio  H: history  R: reload  q: quit "
        }
        View::Popup => {
            " ←/→: word  space: auto  t: speech  x: examples  e: show example  o: order  Esc: back "
        }
        View::Radio => {
            " g: generate  p: play/stop  s: source  t: translation  j/k: scroll  Esc: back "
        }
        View::History => " j/k: scroll  Esc: back  q: quit ",
    };

    let status = Paragraph::new(hints).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}
