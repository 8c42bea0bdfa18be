use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use wordbook_core::DisplayOrder;
use wordbook_lib::commands::{self, OutputFormat};
use wordbook_lib::config::AppConfig;
use wordbook_lib::state::AppState;
use wordbook_lib::{init_logging, tui, LogTarget};

#[derive(Parser)]
#[command(name = "wordbook", about = "Flashcard wordbooks with spoken study and radio scripts", version)]
struct Cli {
    /// Directory holding wordbook folders (default: <data dir>/words)
    #[arg(long, global = true)]
    words_dir: Option<PathBuf>,

    /// OpenAI API key for radio script generation
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List wordbooks with their word counts
    List,

    /// Print the words of a wordbook
    Show {
        /// Wordbook title (case-insensitive prefix match)
        title: String,
        /// Show meanings before words
        #[arg(long)]
        meaning_first: bool,
    },

    /// Copy wordbook files into a new dated folder
    Import {
        /// Files named <title>_wordbook.txt
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Create a wordbook from the command line
    Create {
        title: String,
        /// Entry as "word|meaning|example"; repeatable
        #[arg(long = "entry", short = 'e', required = true)]
        entries: Vec<String>,
    },

    /// Rename a wordbook and its history
    Rename { old: String, new: String },

    /// Delete a wordbook file and its radio artifacts
    Delete { title: String },

    /// Radio script generation and display
    #[command(subcommand)]
    Radio(RadioCommand),

    /// Show recent study sessions
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Launch the interactive study UI (the default)
    Study {
        /// Open this wordbook right away
        title: Option<String>,
    },
}

#[derive(Subcommand)]
enum RadioCommand {
    /// Generate script.txt and script.wav for a wordbook
    Generate { title: String },

    /// Print a wordbook's radio script
    Show {
        title: String,
        /// Hide the English lines
        #[arg(long)]
        no_source: bool,
        /// Hide the Korean lines
        #[arg(long)]
        no_translation: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?
        .with_words_dir(cli.words_dir)
        .with_api_key(cli.api_key);

    let interactive = matches!(cli.command, None | Some(Command::Study { .. }));
    let target = if interactive { LogTarget::File } else { LogTarget::Stderr };
    init_logging(target, &config.log_path())?;

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let mut state = AppState::open(config)?;
    let format = cli.format;

    let output = match cli.command {
        None => {
            tui::run(state, None)?;
            None
        }
        Some(Command::Study { title }) => {
            tui::run(state, title.as_deref())?;
            None
        }
        Some(Command::List) => Some(commands::wordbook::list(&state.store, format)?),
        Some(Command::Show { title, meaning_first }) => {
            let order = if meaning_first {
                DisplayOrder::MeaningFirst
            } else {
                DisplayOrder::WordFirst
            };
            Some(commands::wordbook::show(&state.store, &title, order, format)?)
        }
        Some(Command::Import { paths }) => Some(commands::wordbook::import(&mut state, &paths)?),
        Some(Command::Create { title, entries }) => {
            Some(commands::wordbook::create(&mut state, &title, &entries)?)
        }
        Some(Command::Rename { old, new }) => Some(commands::wordbook::rename(&mut state, &old, &new)?),
        Some(Command::Delete { title }) => Some(commands::wordbook::delete(&mut state, &title)?),
        Some(Command::Radio(RadioCommand::Generate { title })) => {
            Some(runtime.block_on(commands::radio::generate(&state, &title))?)
        }
        Some(Command::Radio(RadioCommand::Show {
            title,
            no_source,
            no_translation,
        })) => Some(commands::radio::show(
            &state.store,
            &title,
            !no_source,
            !no_translation,
            format,
        )?),
        Some(Command::History { limit }) => Some(commands::history::run(&state.history, limit, format)?),
    };

    if let Some(output) = output {
        println!("{output}");
    }
    Ok(())
}
