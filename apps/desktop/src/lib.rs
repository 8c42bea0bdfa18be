//! Wordbook terminal application: CLI subcommands and the interactive study UI.

pub mod commands;
pub mod config;
pub mod db;
pub mod radio;
pub mod speech;
pub mod state;
pub mod tui;
pub mod watcher;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file; used while the terminal UI owns the screen.
    File,
}

fn env_filter() -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
}

/// Install the global tracing subscriber.
pub fn init_logging(target: LogTarget, log_path: &Path) -> anyhow::Result<()> {
    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogTarget::File => {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(log_path)?;
            tracing_subscriber::registry()
                .with(env_filter())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
    }
    Ok(())
}
