use ratatui::layout::{Constraint, Direction, Flex, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use wordbook_core::ScriptKind;

use super::app_state::{TuiState, View};
use super::status_bar;
use crate::commands::history::session_line;

pub fn draw(f: &mut Frame, state: &TuiState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = outer[0];
    let status_area = outer[1];

    match state.view {
        View::Library | View::Popup => {
            draw_library(f, main_area, state);
            if state.view == View::Popup {
                draw_popup(f, main_area, state);
            }
        }
        View::Radio => draw_radio(f, main_area, state),
        View::History => draw_history(f, main_area, state),
    }

    status_bar::draw(f, status_area, state);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_library(f: &mut Frame, area: Rect, state: &TuiState) {
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let focused = state.view == View::Library;

    let items: Vec<ListItem> = state
        .titles
        .iter()
        .map(|title| {
            let count = state.app.store.get(title).map_or(0, |b| b.count());
            ListItem::new(format!("{title} ({count})"))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Wordbooks ")
                .borders(Borders::ALL)
                .border_style(border_style(focused)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !state.titles.is_empty() {
        list_state.select(Some(state.selected));
    }
    f.render_stateful_widget(list, panels[0], &mut list_state);

    draw_words(f, panels[1], state, focused);
}

fn draw_words(f: &mut Frame, area: Rect, state: &TuiState, focused: bool) {
    let order = state.player.settings().order;
    let block = Block::default()
        .title(format!(" {} ", state.selected_title().unwrap_or("No wordbooks")))
        .borders(Borders::ALL)
        .border_style(border_style(focused));

    let Some(book) = state.selected_book() else {
        let hint = Paragraph::new(format!(
            "Drop *_wordbook.txt files into {}",
            state.app.config.words_dir.display()
        ))
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let items: Vec<ListItem> = book
        .entries
        .iter()
        .map(|entry| {
            let (first, second) = order.arrange(&entry.word, &entry.meaning);
            let mut lines = vec![Line::from(vec![
                Span::styled(first.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::raw(second.to_string()),
            ])];
            if entry.has_example() {
                lines.push(Line::styled(
                    format!("    {}", entry.example().display_text().replace('\n', " / ")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow));
    let mut list_state = ListState::default();
    list_state.select(Some(state.word_selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn draw_popup(f: &mut Frame, area: Rect, state: &TuiState) {
    let card = centered(area, area.width.saturating_sub(8).min(72), area.height.min(12));
    let model = state.player.render();
    let settings = state.player.settings();

    let mut lines = vec![
        Line::from(""),
        Line::styled(
            model.headline,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
        .centered(),
        Line::from(model.subline).centered(),
        Line::from(""),
    ];
    for example in model.example.lines() {
        lines.push(Line::styled(example.to_string(), Style::default().fg(Color::Gray)).centered());
    }

    let flag = |on: bool, label: &str| {
        let style = if on {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!(" {label} "), style)
    };
    let flags = Line::from(vec![
        flag(settings.auto_advance, "auto"),
        flag(settings.tts_enabled, "speech"),
        flag(settings.narrate_examples, "examples"),
        flag(settings.example_visible, "show example"),
    ]);

    let block = Block::default()
        .title(format!(" {} ", state.selected_title().unwrap_or_default()))
        .title_bottom(Line::from(format!(" {} ", model.position)).right_aligned())
        .title_bottom(flags)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, card);
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        card,
    );
}

fn draw_radio(f: &mut Frame, area: Rect, state: &TuiState) {
    let radio = &state.radio;
    let title = state.selected_title().unwrap_or_default();

    let lines: Vec<Line> = if radio.lines.is_empty() {
        vec![Line::styled(
            "No script yet. Press g to generate one.",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        radio
            .lines
            .iter()
            .filter(|line| match line.kind {
                ScriptKind::Source => radio.show_source,
                ScriptKind::Translation => radio.show_translation,
            })
            .map(|line| match line.kind {
                ScriptKind::Source => Line::from(line.text.clone()),
                ScriptKind::Translation => {
                    Line::styled(line.text.clone(), Style::default().fg(Color::Gray))
                }
            })
            .collect()
    };

    let mut status = match radio.generating.as_deref() {
        Some(generating) => format!(" generating '{generating}'... "),
        None => String::new(),
    };
    if let Some(clock) = state.radio_clock() {
        status.push_str(&format!(" {clock} "));
    }

    let block = Block::default()
        .title(format!(" Radio: {title} "))
        .title_bottom(Line::from(status).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((radio.scroll, 0))
            .block(block),
        area,
    );
}

fn draw_history(f: &mut Frame, area: Rect, state: &TuiState) {
    let stats = &state.history_stats;
    let mut summary = format!(
        " {} sessions, {} cards viewed, {} wordbooks ",
        stats.sessions, stats.total_views, stats.wordbooks
    );
    if let Some(last) = stats.last_studied_at {
        summary.push_str(&format!(
            "- last {} ",
            last.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        ));
    }

    let items: Vec<ListItem> = if state.history.is_empty() {
        vec![ListItem::new("No study sessions yet")]
    } else {
        state
            .history
            .iter()
            .map(|session| ListItem::new(session_line(session)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(" History ")
                .title_bottom(summary)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !state.history.is_empty() {
        list_state.select(Some(state.history_scroll));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}
