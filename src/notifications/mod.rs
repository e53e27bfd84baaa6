use chrono::{
    DateTime,
    NaiveTime,
    TimeZone,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    GoldlistError,
    VocabularyEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPlan {
    pub at: DateTime<Utc>,
    /// Entries that will be due by the time the reminder fires.
    pub due_count: usize,
}

/// Works out the single upcoming reminder for a set of entries: the soonest review date among
/// entries still in rotation, at the learner's reminder hour. Reviews that are already due are
/// reminded about today, or right away when that hour has passed.
pub fn plan_reminder(
    entries: &[VocabularyEntry],
    now: DateTime<Utc>,
    reminder_hour_utc: u32,
) -> Option<ReminderPlan> {
    let soonest = entries
        .iter()
        .filter(|e| !e.status.is_terminal())
        .filter_map(|e| e.next_review_date)
        .min()?;

    let day = soonest.max(now.date_naive());
    let time = NaiveTime::from_hms_opt(reminder_hour_utc.min(23), 0, 0)?;
    let at = Utc.from_utc_datetime(&day.and_time(time)).max(now);
    let due_count = entries.iter().filter(|e| e.is_due(day)).count();

    Some(ReminderPlan { at, due_count })
}

/// Hands reminders to whatever delivers them on the device.
pub trait NotificationScheduler: Send + Sync {
    fn schedule(&self, plan: ReminderPlan) -> Result<(), GoldlistError>;
    fn cancel_all(&self) -> Result<(), GoldlistError>;
}

/// Scheduler that only logs, used by the command line.
#[derive(Debug, Default)]
pub struct LogScheduler;

impl NotificationScheduler for LogScheduler {
    fn schedule(&self, plan: ReminderPlan) -> Result<(), GoldlistError> {
        tracing::info!(at = %plan.at, due = plan.due_count, "Reminder scheduled");
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), GoldlistError> {
        tracing::info!("Reminders cancelled");
        Ok(())
    }
}
