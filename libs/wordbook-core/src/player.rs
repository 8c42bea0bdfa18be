//! Flashcard player: cycles through one word list.
//!
//! The player owns no clock. Every transition returns an [`Update`] telling
//! the caller how to treat its single auto-advance timer and what, if
//! anything, to narrate. The caller feeds timer expiries back in as
//! [`Player::tick`].

use crate::narration::NarrationPlan;
use crate::types::{DisplayOrder, WordEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default auto-advance interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Headline shown when no entries are assigned.
pub const EMPTY_PLACEHOLDER: &str = "No wordbook selected";

/// What the caller should do with its auto-advance timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Arm the timer with a fresh countdown, replacing any armed one.
    Start(Duration),
    /// Disarm the timer.
    Stop,
    /// Leave the timer as it is.
    Keep,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub timer: TimerCommand,
    pub narration: Option<NarrationPlan>,
}

impl Update {
    fn keep() -> Self {
        Self {
            timer: TimerCommand::Keep,
            narration: None,
        }
    }
}

/// Initial flags for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub interval: Duration,
    pub auto_advance: bool,
    pub example_visible: bool,
    pub tts_enabled: bool,
    pub narrate_examples: bool,
    pub order: DisplayOrder,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            auto_advance: true,
            example_visible: true,
            tts_enabled: false,
            narrate_examples: false,
            order: DisplayOrder::WordFirst,
        }
    }
}

/// Everything a view needs to draw the current card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub headline: String,
    pub subline: String,
    pub example: String,
    pub position: String,
    pub is_empty: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    entries: Vec<WordEntry>,
    index: usize,
    settings: PlayerSettings,
    armed: Option<Duration>,
}

impl Player {
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            settings,
            armed: None,
        }
    }

    /// Assign a new list and restart at the first entry.
    pub fn set_entries(&mut self, entries: Vec<WordEntry>) -> Update {
        self.entries = entries;
        self.index = 0;

        let timer = if self.settings.auto_advance && !self.is_empty() {
            TimerCommand::Start(self.settings.interval)
        } else {
            TimerCommand::Stop
        };

        Update {
            timer: self.apply(timer),
            narration: self.narration(),
        }
    }

    /// Manual step forward; postpones the next automatic tick.
    pub fn next(&mut self) -> Update {
        self.step(true)
    }

    /// Manual step back; postpones the next automatic tick.
    pub fn previous(&mut self) -> Update {
        if self.is_empty() {
            return Update::keep();
        }
        self.index = self.index.checked_sub(1).unwrap_or(self.entries.len() - 1);
        self.after_manual_move()
    }

    /// Timer expiry. Advances without touching the timer.
    pub fn tick(&mut self) -> Update {
        self.step(false)
    }

    pub fn toggle_example_visible(&mut self) -> Update {
        self.settings.example_visible = !self.settings.example_visible;
        Update::keep()
    }

    pub fn toggle_tts(&mut self) -> Update {
        self.settings.tts_enabled = !self.settings.tts_enabled;
        Update::keep()
    }

    pub fn toggle_example_narration(&mut self) -> Update {
        self.settings.narrate_examples = !self.settings.narrate_examples;
        Update::keep()
    }

    pub fn toggle_display_order(&mut self) -> Update {
        self.settings.order = self.settings.order.toggled();
        Update::keep()
    }

    pub fn toggle_auto_advance(&mut self) -> Update {
        self.settings.auto_advance = !self.settings.auto_advance;

        let timer = match (self.settings.auto_advance, self.is_empty()) {
            (true, false) => TimerCommand::Start(self.settings.interval),
            (true, true) => TimerCommand::Keep,
            (false, _) => TimerCommand::Stop,
        };

        Update {
            timer: self.apply(timer),
            narration: None,
        }
    }

    /// The view is going away: stop the timer.
    pub fn close(&mut self) -> TimerCommand {
        self.apply(TimerCommand::Stop)
    }

    pub fn render(&self) -> DisplayModel {
        let Some(entry) = self.current() else {
            return DisplayModel {
                headline: EMPTY_PLACEHOLDER.to_string(),
                subline: String::new(),
                example: String::new(),
                position: "0/0".to_string(),
                is_empty: true,
            };
        };

        let (headline, subline) = self.settings.order.arrange(&entry.word, &entry.meaning);
        let example = if self.settings.example_visible {
            entry.example().display_text()
        } else {
            String::new()
        };

        DisplayModel {
            headline: headline.to_string(),
            subline: subline.to_string(),
            example,
            position: format!("{}/{}", self.index + 1, self.entries.len()),
            is_empty: false,
        }
    }

    /// Narration for the current entry when TTS is on.
    pub fn narration(&self) -> Option<NarrationPlan> {
        if !self.settings.tts_enabled {
            return None;
        }
        self.current()
            .map(|entry| NarrationPlan::for_entry(entry, self.settings.narrate_examples))
            .filter(|plan| !plan.is_empty())
    }

    pub fn current(&self) -> Option<&WordEntry> {
        self.entries.get(self.index)
    }

    /// Index of the current entry, `None` when empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.index)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Interval of the armed timer, if any.
    pub fn timer(&self) -> Option<Duration> {
        self.armed
    }

    fn step(&mut self, manual: bool) -> Update {
        if self.is_empty() {
            return Update::keep();
        }
        self.index = (self.index + 1) % self.entries.len();

        if manual {
            self.after_manual_move()
        } else {
            Update {
                timer: TimerCommand::Keep,
                narration: self.narration(),
            }
        }
    }

    fn after_manual_move(&mut self) -> Update {
        let timer = if self.settings.auto_advance {
            TimerCommand::Start(self.settings.interval)
        } else {
            TimerCommand::Keep
        };

        Update {
            timer: self.apply(timer),
            narration: self.narration(),
        }
    }

    fn apply(&mut self, command: TimerCommand) -> TimerCommand {
        match command {
            TimerCommand::Start(interval) => self.armed = Some(interval),
            TimerCommand::Stop => self.armed = None,
            TimerCommand::Keep => {}
        }
        command
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerSettings::default())
    }
}
