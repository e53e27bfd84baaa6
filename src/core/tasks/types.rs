use crate::notifications::ReminderPlan;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult {
    /// `Ok(None)` when nothing is left to remind about.
    RemindersScheduled(Result<Option<ReminderPlan>, String>),
    RemindersCancelled(Result<(), String>),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::RemindersScheduled(_) => "reminders_scheduled",
            TaskResult::RemindersCancelled(_) => "reminders_cancelled",
        }
    }

    pub fn is_err(&self) -> bool {
        match self {
            TaskResult::RemindersScheduled(result) => result.is_err(),
            TaskResult::RemindersCancelled(result) => result.is_err(),
        }
    }
}
