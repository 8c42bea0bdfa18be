//! File system watcher for the words directory.

use notify::{
    event::{CreateKind, ModifyKind, RemoveKind},
    Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wordbook_core::parser::WORDBOOK_SUFFIX;
use wordbook_core::script::{SCRIPT_AUDIO_FILE, SCRIPT_TEXT_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Created,
    Modified,
    Renamed,
    Deleted,
}

/// A change to a wordbook or script artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchKind,
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to create watcher: {0}")]
    Create(#[source] notify::Error),
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Watches one directory tree and forwards relevant changes to a callback.
pub struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self {
            watcher: None,
            stop_tx: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.watcher.is_some()
    }

    /// Start watching `dir` recursively. Restarts if already running.
    pub fn start<F>(&mut self, dir: &Path, on_event: F) -> Result<(), WatchError>
    where
        F: Fn(WatchEvent) + Send + 'static,
    {
        self.stop();

        let (tx, rx) = channel();
        let (stop_tx, stop_rx) = channel::<()>();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(e) => warn!(error = %e, "watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )
        .map_err(WatchError::Create)?;

        watcher
            .watch(dir, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Watch {
                path: dir.to_path_buf(),
                source,
            })?;

        self.watcher = Some(watcher);
        self.stop_tx = Some(stop_tx);

        thread::spawn(move || Self::event_loop(rx, stop_rx, on_event));
        debug!(dir = %dir.display(), "watching words directory");
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        self.watcher = None;
    }

    fn event_loop<F>(rx: Receiver<Event>, stop_rx: Receiver<()>, on_event: F)
    where
        F: Fn(WatchEvent),
    {
        loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }

            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => classify(&event).into_iter().for_each(&on_event),
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wordbook files and the script artifacts beside them.
pub fn is_relevant(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            name.ends_with(WORDBOOK_SUFFIX) || name == SCRIPT_TEXT_FILE || name == SCRIPT_AUDIO_FILE
        })
}

/// Map a raw notify event to the changes worth reporting.
pub fn classify(event: &Event) -> Vec<WatchEvent> {
    let kind = match &event.kind {
        EventKind::Create(CreateKind::File | CreateKind::Any) => WatchKind::Created,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => WatchKind::Modified,
        EventKind::Modify(ModifyKind::Name(_)) => WatchKind::Renamed,
        EventKind::Remove(RemoveKind::File | RemoveKind::Any) => WatchKind::Deleted,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .filter(|p| is_relevant(p))
        .map(|path| WatchEvent {
            path: path.clone(),
            kind,
        })
        .collect()
}
