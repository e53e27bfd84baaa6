use std::fmt;

use chrono::{
    DateTime,
    NaiveDate,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use super::utils::{
    date_after,
    days_between,
    utc_day,
};
use crate::progression::REVIEW_INTERVAL_DAYS;

/// Distillation tier. Entries only ever move up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Bronze,
    Silver,
    Gold,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Bronze, Stage::Silver, Stage::Gold];

    /// The tier an entry moves to after failing its last round here, `None` at gold.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Bronze => Some(Stage::Silver),
            Stage::Silver => Some(Stage::Gold),
            Stage::Gold => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Bronze => "bronze",
            Stage::Silver => "silver",
            Stage::Gold => "gold",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Waiting,
    Ready,
    Learned,
    Leech,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Learned | Status::Leech)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Waiting => "waiting",
            Status::Ready => "ready",
            Status::Learned => "learned",
            Status::Leech => "leech",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: Uuid,
    pub notebook_id: Uuid,
    pub page_number: u32,
    pub term: String,
    pub translation: String,
    pub stage: Stage,
    pub round: u8,                           // Attempt within the current stage, 1..=4
    pub status: Status,
    pub next_review_date: Option<NaiveDate>, // None only once learned or leech
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VocabularyEntry {
    /// A freshly written word: bronze, first round, due one interval after today.
    pub fn new(
        notebook_id: Uuid,
        page_number: u32,
        term: impl Into<String>,
        translation: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            notebook_id,
            page_number,
            term: term.into(),
            translation: translation.into(),
            stage: Stage::Bronze,
            round: 1,
            status: Status::Waiting,
            next_review_date: Some(date_after(now, REVIEW_INTERVAL_DAYS)),
            created_at: now,
            updated_at: now,
        }
    }

    /// Status as the learner sees it on `today`: a waiting entry whose date has come is ready.
    pub fn effective_status(&self, today: NaiveDate) -> Status {
        match (self.status, self.next_review_date) {
            (Status::Waiting, Some(date)) if date <= today => Status::Ready,
            (status, _) => status,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        !self.status.is_terminal() && self.next_review_date.is_some_and(|date| date <= today)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub current_streak: u32,
    pub last_activity_date: Option<DateTime<Utc>>,
}

impl Profile {
    /// Counts an add or review toward the streak the same way the hosted backend does:
    /// once per calendar day, continuing from yesterday or restarting at one.
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        let gap = self.last_activity_date.map(|last| days_between(last, now));
        self.current_streak = match gap {
            Some(0) => self.current_streak.max(1),
            Some(1) => self.current_streak + 1,
            Some(days) if days < 0 => self.current_streak,
            _ => 1,
        };
        if gap.map_or(true, |days| days >= 0) {
            self.last_activity_date = Some(now);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub id: Uuid,
    pub name: String,
    pub words_per_page: u32,
    pub created_at: DateTime<Utc>,
    /// Highest page already seen in the past. Pages up to here never count as today or future.
    #[serde(default)]
    pub locked_through: u32,
}

impl Notebook {
    pub fn new(name: impl Into<String>, words_per_page: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            words_per_page,
            created_at: now,
            locked_through: 0,
        }
    }

    /// Page that corresponds to `now`; page 1 is the creation day.
    pub fn active_day(&self, now: DateTime<Utc>) -> i64 {
        days_between(self.created_at, now) + 1
    }

    /// Remembers how far the calendar has advanced. Returns true when the horizon moved.
    pub fn observe(&mut self, now: DateTime<Utc>) -> bool {
        let past = (self.active_day(now) - 1).clamp(0, i64::from(u32::MAX)) as u32;
        if past > self.locked_through {
            self.locked_through = past;
            true
        } else {
            false
        }
    }

    pub fn created_on(&self) -> NaiveDate {
        utc_day(self.created_at)
    }
}
