use thiserror::Error;
use uuid::Uuid;

use super::models::Status;

#[derive(Error, Debug)]
pub enum GoldlistError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("Notebook not found: {0}")]
    NotebookNotFound(Uuid),

    #[error("Entry {id} is already {status} and cannot be reviewed again")]
    TerminalEntry { id: Uuid, status: Status },

    #[error("A review for entry {0} is already being written")]
    ReviewInFlight(Uuid),

    #[error("Page {page} does not accept new words ({reason})")]
    PageNotWritable { page: u32, reason: String },

    #[error("Shifting the clock by {0} days moves it too far from today")]
    ClockOutOfRange(i64),

    #[error("GoldlistError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for GoldlistError {
    fn from(error: std::io::Error) -> Self {
        GoldlistError::Io(Box::new(error))
    }
}
