use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "goldlist")]
#[command(about = "Goldlist vocabulary notebooks: write, rest, distill", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding store.json and settings.json (defaults to the user data dir)
    #[arg(long, global = true, env = "GOLDLIST_DATA")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or list notebooks
    Notebook {
        #[command(subcommand)]
        action: NotebookCommands,
    },

    /// Write a word on today's page, or on an earlier page that is still open
    Add {
        notebook: Uuid,
        term: String,
        translation: String,
        #[arg(long)]
        page: Option<u32>,
    },

    /// List entries due for review
    Due {
        #[arg(long)]
        notebook: Option<Uuid>,
    },

    /// Record the result of reviewing one entry
    Review {
        id: Uuid,
        #[arg(value_enum)]
        outcome: Outcome,
    },

    /// Show the current streak
    Streak,

    /// Show a notebook's day-by-day pages
    Roadmap {
        notebook: Uuid,
        /// Include locked future pages
        #[arg(long)]
        all: bool,
    },

    /// Show counts per stage and status
    Stats,

    /// Inspect or move the virtual clock
    Clock {
        #[command(subcommand)]
        action: ClockCommands,
    },
}

#[derive(Subcommand)]
pub enum NotebookCommands {
    New {
        name: String,
        #[arg(long)]
        words_per_page: Option<u32>,
    },
    List,
}

#[derive(Subcommand)]
pub enum ClockCommands {
    Show,
    /// Move the clock by a number of days (negative moves it back)
    Shift {
        #[arg(allow_hyphen_values = true)]
        days: i64,
    },
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Outcome {
    Remembered,
    Forgotten,
}
