//! Goldlist progression rules.
//!
//! A word is written on a page, waits [`REVIEW_INTERVAL_DAYS`], then gets reviewed. Remembered
//! words are distilled out as learned. Forgotten words come back one interval later, up to
//! [`MAX_ROUNDS`] times per stage, after which they move to the next stage. Failing the last
//! gold round marks the word a leech.

use chrono::{
    DateTime,
    NaiveDate,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    utils::date_after,
    GoldlistError,
    Stage,
    Status,
    VocabularyEntry,
};

pub const REVIEW_INTERVAL_DAYS: i64 = 14;
pub const MAX_ROUNDS: u8 = 4;

/// What a single review did to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Learned,
    NextRound(u8),
    Promoted(Stage),
    Leech,
}

/// The complete set of fields a review rewrites. Everything else on the entry is untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryUpdate {
    pub stage: Stage,
    pub round: u8,
    pub status: Status,
    pub next_review_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
    pub transition: Transition,
}

impl EntryUpdate {
    /// Returns the entry as it should be persisted.
    pub fn apply(&self, entry: &VocabularyEntry) -> VocabularyEntry {
        VocabularyEntry {
            stage: self.stage,
            round: self.round,
            status: self.status,
            next_review_date: self.next_review_date,
            updated_at: self.updated_at,
            ..entry.clone()
        }
    }
}

/// Computes the next state of `entry` after one review.
///
/// Learned and leech entries are out of rotation; passing one in is rejected rather than
/// silently rewritten.
pub fn advance(
    entry: &VocabularyEntry,
    remembered: bool,
    now: DateTime<Utc>,
) -> Result<EntryUpdate, GoldlistError> {
    if entry.status.is_terminal() {
        tracing::warn!(
            id = %entry.id,
            status = %entry.status,
            "refusing to advance a terminal entry"
        );
        return Err(GoldlistError::TerminalEntry { id: entry.id, status: entry.status });
    }

    if remembered {
        return Ok(EntryUpdate {
            stage: entry.stage,
            round: entry.round,
            status: Status::Learned,
            next_review_date: None,
            updated_at: now,
            transition: Transition::Learned,
        });
    }

    let next_review = Some(date_after(now, REVIEW_INTERVAL_DAYS));
    // Ready is only ever derived from the date, so a rescheduled entry goes back to waiting.
    let status = Status::Waiting;

    if entry.round < MAX_ROUNDS {
        let round = entry.round.max(1) + 1;
        return Ok(EntryUpdate {
            stage: entry.stage,
            round,
            status,
            next_review_date: next_review,
            updated_at: now,
            transition: Transition::NextRound(round),
        });
    }

    let update = match entry.stage.next() {
        Some(stage) => EntryUpdate {
            stage,
            round: 1,
            status,
            next_review_date: next_review,
            updated_at: now,
            transition: Transition::Promoted(stage),
        },
        None => EntryUpdate {
            stage: Stage::Gold,
            round: 1,
            status: Status::Leech,
            next_review_date: None,
            updated_at: now,
            transition: Transition::Leech,
        },
    };

    Ok(update)
}
