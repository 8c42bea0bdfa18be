use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::process::Child;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use wordbook_core::{
    Player, PlayerSettings, ScriptLine, TimerCommand, Update, WordEntry, Wordbook,
};

use crate::db::{HistoryRepository, HistoryStats, StudySession};
use crate::radio::{format_clock, generate_radio, FfmpegTranscoder, OpenAiScriptGenerator, RadioOutput};
use crate::speech::{wav_duration, AudioPlayer, GoogleTts, Narrator};
use crate::state::AppState;
use crate::watcher::{FileWatcher, WatchEvent};

const TICK_RATE: Duration = Duration::from_millis(100);
const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Library,
    Popup,
    Radio,
    History,
}

/// Results from background work, drained on the UI loop.
#[derive(Debug)]
pub enum UiMessage {
    RadioFinished {
        title: String,
        result: std::result::Result<RadioOutput, String>,
    },
    FilesChanged(WatchEvent),
}

pub struct Playback {
    child: Child,
    started: Instant,
    total: Option<Duration>,
}

pub struct RadioPanel {
    pub lines: Vec<ScriptLine>,
    pub show_source: bool,
    pub show_translation: bool,
    /// Title whose generation is in flight.
    pub generating: Option<String>,
    pub playback: Option<Playback>,
    pub scroll: u16,
}

impl RadioPanel {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            show_source: true,
            show_translation: true,
            generating: None,
            playback: None,
            scroll: 0,
        }
    }
}

pub struct TuiState {
    pub app: AppState,
    pub view: View,

    // Library state
    pub titles: Vec<String>,
    pub selected: usize,
    pub word_selected: usize,

    // Popup state
    pub player: Player,
    pub deadline: Option<Instant>,
    pub session: Option<i64>,
    narrator: Narrator<GoogleTts>,

    pub radio: RadioPanel,
    audio_player: AudioPlayer,

    pub history: Vec<StudySession>,
    pub history_stats: HistoryStats,
    pub history_scroll: usize,

    tx: UnboundedSender<UiMessage>,
    rx: UnboundedReceiver<UiMessage>,
    watcher: FileWatcher,

    pub flash_message: Option<String>,
    pub quit: bool,
}

impl TuiState {
    pub fn new(app: AppState) -> Result<Self> {
        let audio_player = AudioPlayer::from_command_line(&app.config.audio_player)?;
        let narrator = Narrator::new(GoogleTts::new(), audio_player.clone(), app.config.voice);
        let settings = PlayerSettings {
            interval: app.config.interval,
            ..PlayerSettings::default()
        };
        let (tx, rx) = unbounded_channel();

        let mut state = Self {
            app,
            view: View::Library,
            titles: Vec::new(),
            selected: 0,
            word_selected: 0,
            player: Player::new(settings),
            deadline: None,
            session: None,
            narrator,
            radio: RadioPanel::new(),
            audio_player,
            history: Vec::new(),
            history_stats: HistoryStats::default(),
            history_scroll: 0,
            tx,
            rx,
            watcher: FileWatcher::new(),
            flash_message: None,
            quit: false,
        };

        state.refresh_titles();
        Ok(state)
    }

    /// Forward changes under the words directory to the UI loop.
    pub fn start_watching(&mut self) {
        let tx = self.tx.clone();
        let dir = self.app.config.words_dir.clone();
        if let Err(e) = self.watcher.start(&dir, move |event| {
            let _ = tx.send(UiMessage::FilesChanged(event));
        }) {
            warn!(error = %e, "file watching disabled");
        }
    }

    pub fn sender(&self) -> UnboundedSender<UiMessage> {
        self.tx.clone()
    }

    // ---- library ----

    pub fn selected_title(&self) -> Option<&str> {
        self.titles.get(self.selected).map(String::as_str)
    }

    pub fn selected_book(&self) -> Option<&Wordbook> {
        self.selected_title().and_then(|t| self.app.store.get(t))
    }

    /// Rebuild the title list, keeping the current title selected. The word
    /// cursor survives when the title does.
    fn refresh_titles(&mut self) {
        let previous = self.selected_title().map(str::to_string);
        self.titles = self.app.store.titles();
        self.selected = previous
            .as_ref()
            .and_then(|t| self.titles.iter().position(|x| x == t))
            .unwrap_or(0)
            .min(self.titles.len().saturating_sub(1));

        if self.selected_title() == previous.as_deref() {
            let len = self.selected_book().map_or(0, Wordbook::count);
            self.word_selected = self.word_selected.min(len.saturating_sub(1));
        } else {
            self.word_selected = 0;
        }
    }

    pub fn select_title(&mut self, title: &str) -> bool {
        match self.titles.iter().position(|t| t == title) {
            Some(i) => {
                self.set_selected(i);
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        if !self.titles.is_empty() {
            self.set_selected((self.selected + 1).min(self.titles.len() - 1));
        }
    }

    pub fn select_previous(&mut self) {
        self.set_selected(self.selected.saturating_sub(1));
    }

    fn set_selected(&mut self, index: usize) {
        if index != self.selected {
            self.selected = index;
            self.word_selected = 0;
            self.load_radio_lines();
        }
    }

    pub fn word_move_down(&mut self) {
        let len = self.selected_book().map_or(0, Wordbook::count);
        if self.word_selected + 1 < len {
            self.word_selected += 1;
        }
    }

    pub fn word_move_up(&mut self) {
        self.word_selected = self.word_selected.saturating_sub(1);
    }

    pub fn reload_store(&mut self) {
        self.reload_changed(&[]);
    }

    /// Re-read the store after `changed` paths moved on disk. Radio playback
    /// is only stopped when the selection moves or its script files changed.
    fn reload_changed(&mut self, changed: &[PathBuf]) {
        let previous = self.selected_title().map(str::to_string);
        self.app.store.reload();
        self.refresh_titles();

        let script_changed = self.selected_book().map(Wordbook::artifacts).is_some_and(|a| {
            changed
                .iter()
                .any(|path| *path == a.text || *path == a.audio)
        });
        if script_changed || self.selected_title() != previous.as_deref() {
            self.load_radio_lines();
        } else {
            self.refresh_radio_lines();
        }

        if self.view != View::Popup {
            return;
        }
        let entries = previous
            .and_then(|t| self.app.store.get(&t))
            .map(|b| b.entries.clone());
        match entries {
            Some(entries) if !entries_equal(&entries, &self.player) => {
                let update = self.player.set_entries(entries);
                self.apply(update);
                self.record_view();
            }
            Some(_) => {}
            None => {
                self.close_popup();
                self.flash_message = Some("Wordbook was removed".into());
            }
        }
    }

    fn selected_entries(&self) -> Option<Vec<WordEntry>> {
        self.selected_book().map(|b| b.entries.clone())
    }

    // ---- popup player ----

    pub fn open_popup(&mut self) {
        let Some(entries) = self.selected_entries() else {
            self.flash_message = Some("No wordbook selected".into());
            return;
        };
        let title = self.selected_title().unwrap_or_default().to_string();

        let update = self.player.set_entries(entries);
        self.view = View::Popup;

        self.session = match self
            .app
            .history
            .start_session(&title, self.player.settings().tts_enabled)
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "could not start study session");
                None
            }
        };
        info!(title = %title, words = self.player.len(), "study started");

        self.apply(update);
        self.record_view();
    }

    pub fn close_popup(&mut self) {
        let timer = self.player.close();
        self.apply_timer(timer);
        self.narrator.stop();

        if let Some(id) = self.session.take() {
            if let Err(e) = self.app.history.finish_session(id) {
                warn!(error = %e, "could not finish study session");
            }
        }
        self.view = View::Library;
    }

    pub fn popup_next(&mut self) {
        let update = self.player.next();
        self.apply(update);
        self.record_view();
    }

    pub fn popup_previous(&mut self) {
        let update = self.player.previous();
        self.apply(update);
        self.record_view();
    }

    pub fn toggle_auto_advance(&mut self) {
        let update = self.player.toggle_auto_advance();
        self.apply(update);
    }

    pub fn toggle_tts(&mut self) {
        let update = self.player.toggle_tts();
        self.apply(update);
        if !self.player.settings().tts_enabled {
            self.narrator.stop();
        }
    }

    /// Fire the auto-advance timer if its deadline has passed.
    pub fn check_timer(&mut self, now: Instant) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if now < deadline {
            return;
        }

        self.deadline = self.player.timer().map(|interval| now + interval);
        let update = self.player.tick();
        self.apply(update);
        self.record_view();
    }

    /// How long the loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now).min(TICK_RATE),
            None => TICK_RATE,
        }
    }

    pub fn apply(&mut self, update: Update) {
        self.apply_timer(update.timer);
        if let Some(plan) = update.narration {
            self.narrator.play_plan(plan);
        }
    }

    fn apply_timer(&mut self, timer: TimerCommand) {
        match timer {
            TimerCommand::Start(interval) => self.deadline = Some(Instant::now() + interval),
            TimerCommand::Stop => self.deadline = None,
            TimerCommand::Keep => {}
        }
    }

    fn record_view(&self) {
        let (Some(id), false) = (self.session, self.player.is_empty()) else {
            return;
        };
        if let Err(e) = self.app.history.record_view(id) {
            warn!(error = %e, "could not record card view");
        }
    }

    // ---- radio ----

    pub fn open_radio(&mut self) {
        self.load_radio_lines();
        self.view = View::Radio;
    }

    pub fn close_radio(&mut self) {
        self.stop_playback();
        self.view = View::Library;
    }

    fn load_radio_lines(&mut self) {
        self.stop_playback();
        self.radio.scroll = 0;
        self.refresh_radio_lines();
    }

    fn refresh_radio_lines(&mut self) {
        self.radio.lines = self
            .selected_book()
            .map(|b| b.artifacts().load_lines())
            .unwrap_or_default();
    }

    pub fn start_radio_generation(&mut self) {
        let Some(book) = self.selected_book().cloned() else {
            self.flash_message = Some("No wordbook selected".into());
            return;
        };
        if let Some(ref title) = self.radio.generating {
            self.flash_message = Some(format!("Already generating radio for '{title}'"));
            return;
        }
        if book.words().is_empty() {
            self.flash_message = Some("The word list is empty".into());
            return;
        }
        let generator = match OpenAiScriptGenerator::new(self.app.config.openai.clone()) {
            Ok(generator) => generator,
            Err(e) => {
                self.flash_message = Some(format!("{e} (set OPENAI_API_KEY or pass --api-key)"));
                return;
            }
        };

        let transcoder = FfmpegTranscoder::new(self.app.config.ffmpeg.clone());
        let voice = self.app.config.voice;
        let tx = self.tx.clone();
        let title = book.title.clone();
        self.radio.generating = Some(title.clone());
        self.stop_playback();

        tokio::spawn(async move {
            let result = generate_radio(&generator, &GoogleTts::new(), &transcoder, voice, &book)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UiMessage::RadioFinished { title, result });
        });
    }

    pub fn toggle_radio_source(&mut self) {
        self.radio.show_source = !self.radio.show_source;
    }

    pub fn toggle_radio_translation(&mut self) {
        self.radio.show_translation = !self.radio.show_translation;
    }

    pub fn toggle_playback(&mut self) {
        if self.radio.playback.is_some() {
            self.stop_playback();
            return;
        }

        let Some(artifacts) = self.selected_book().map(Wordbook::artifacts) else {
            return;
        };
        if !artifacts.has_audio() {
            self.flash_message = Some("No radio audio yet; press g to generate".into());
            return;
        }

        match self.audio_player.spawn(&artifacts.audio) {
            Ok(child) => {
                self.radio.playback = Some(Playback {
                    child,
                    started: Instant::now(),
                    total: wav_duration(&artifacts.audio),
                });
            }
            Err(e) => self.flash_message = Some(format!("Playback failed: {e}")),
        }
    }

    fn stop_playback(&mut self) {
        if let Some(mut playback) = self.radio.playback.take() {
            let _ = playback.child.start_kill();
        }
    }

    /// Clear finished playback.
    pub fn poll_playback(&mut self) {
        let finished = match self.radio.playback.as_mut() {
            Some(playback) => !matches!(playback.child.try_wait(), Ok(None)),
            None => false,
        };
        if finished {
            self.radio.playback = None;
        }
    }

    /// `MM:SS / MM:SS` while playing.
    pub fn radio_clock(&self) -> Option<String> {
        let playback = self.radio.playback.as_ref()?;
        let elapsed = playback.started.elapsed();
        let total = playback
            .total
            .map(format_clock)
            .unwrap_or_else(|| "--:--".to_string());
        Some(format!("{} / {}", format_clock(elapsed), total))
    }

    // ---- history ----

    pub fn open_history(&mut self) {
        match (
            self.app.history.recent_sessions(HISTORY_LIMIT),
            self.app.history.history_stats(),
        ) {
            (Ok(sessions), Ok(stats)) => {
                self.history = sessions;
                self.history_stats = stats;
            }
            (Err(e), _) | (_, Err(e)) => {
                self.flash_message = Some(format!("Could not load history: {e}"));
            }
        }
        self.history_scroll = 0;
        self.view = View::History;
    }

    // ---- background results ----

    pub fn drain_messages(&mut self) {
        let mut changed = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            match message {
                UiMessage::FilesChanged(event) => {
                    debug!(path = %event.path.display(), kind = ?event.kind, "files changed");
                    changed.push(event.path);
                }
                other => self.handle_message(other),
            }
        }
        if !changed.is_empty() {
            self.reload_changed(&changed);
        }
    }

    pub fn handle_message(&mut self, message: UiMessage) {
        match message {
            UiMessage::RadioFinished { title, result } => {
                if self.radio.generating.as_deref() == Some(title.as_str()) {
                    self.radio.generating = None;
                }
                match result {
                    Ok(output) if self.selected_title() == Some(title.as_str()) => {
                        self.radio.lines = output.lines;
                        self.radio.scroll = 0;
                        self.flash_message = Some(format!("Radio ready for '{title}'"));
                    }
                    Ok(_) => {
                        info!(title = %title, "radio finished for a wordbook no longer selected");
                    }
                    Err(e) => {
                        self.flash_message = Some(format!("Radio generation failed: {e}"));
                    }
                }
            }
            UiMessage::FilesChanged(event) => self.reload_changed(&[event.path]),
        }
    }

    /// Leave cleanly: end the session and stop audio.
    pub fn shutdown(&mut self) {
        if self.view == View::Popup {
            self.close_popup();
        }
        self.stop_playback();
        self.narrator.stop();
        self.watcher.stop();
    }
}

fn entries_equal(entries: &[WordEntry], player: &Player) -> bool {
    player.entries() == entries
}
