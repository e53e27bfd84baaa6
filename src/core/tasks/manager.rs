use std::{
    sync::{
        mpsc,
        Arc,
    },
    thread,
    time::Duration,
};

use chrono::{
    DateTime,
    Utc,
};

use super::TaskResult;
use crate::{
    core::VocabularyEntry,
    notifications::{
        plan_reminder,
        NotificationScheduler,
    },
};

enum TaskRequest {
    Reschedule { entries: Vec<VocabularyEntry>, now: DateTime<Utc>, reminder_hour_utc: u32 },
    Cancel,
}

/// Runs best-effort background work off the review path and reports back over a channel.
/// Nothing sent here can undo a write that already happened.
///
/// A single worker thread handles requests in order. When several are waiting, only the
/// newest runs, since each one replaces whatever reminder the previous left behind.
pub struct TaskManager {
    receiver: mpsc::Receiver<TaskResult>,
    requests: mpsc::Sender<TaskRequest>,
}

impl TaskManager {
    pub fn new(scheduler: Arc<dyn NotificationScheduler>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let (requests, pending) = mpsc::channel();

        thread::spawn(move || run_worker(pending, sender, scheduler));

        Self { receiver, requests }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    /// Blocks until the next result arrives or `timeout` passes.
    pub fn wait_result(&self, timeout: Duration) -> Option<TaskResult> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Replaces the pending reminder with one for the soonest upcoming review.
    pub fn reschedule_reminders(
        &self,
        entries: Vec<VocabularyEntry>,
        now: DateTime<Utc>,
        reminder_hour_utc: u32,
    ) {
        self.submit(TaskRequest::Reschedule { entries, now, reminder_hour_utc });
    }

    pub fn cancel_reminders(&self) {
        self.submit(TaskRequest::Cancel);
    }

    fn submit(&self, request: TaskRequest) {
        if self.requests.send(request).is_err() {
            tracing::warn!("Reminder worker has stopped, request dropped");
        }
    }
}

fn run_worker(
    pending: mpsc::Receiver<TaskRequest>,
    sender: mpsc::Sender<TaskResult>,
    scheduler: Arc<dyn NotificationScheduler>,
) {
    while let Ok(mut request) = pending.recv() {
        while let Ok(newer) = pending.try_recv() {
            request = newer;
        }

        let result = match request {
            TaskRequest::Reschedule { entries, now, reminder_hour_utc } => {
                let result = scheduler.cancel_all().and_then(|_| {
                    match plan_reminder(&entries, now, reminder_hour_utc) {
                        Some(plan) => scheduler.schedule(plan).map(|_| Some(plan)),
                        None => Ok(None),
                    }
                });
                if let Err(e) = &result {
                    tracing::warn!("Failed to reschedule reminders: {}", e);
                }
                TaskResult::RemindersScheduled(result.map_err(|e| e.to_string()))
            }
            TaskRequest::Cancel => {
                let result = scheduler.cancel_all();
                if let Err(e) = &result {
                    tracing::warn!("Failed to cancel reminders: {}", e);
                }
                TaskResult::RemindersCancelled(result.map_err(|e| e.to_string()))
            }
        };

        if sender.send(result).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::{
        core::GoldlistError,
        notifications::ReminderPlan,
    };

    #[derive(Default)]
    struct RecordingScheduler {
        scheduled: Mutex<Vec<ReminderPlan>>,
        fail: bool,
    }

    impl NotificationScheduler for RecordingScheduler {
        fn schedule(&self, plan: ReminderPlan) -> Result<(), GoldlistError> {
            if self.fail {
                return Err(GoldlistError::Custom("device refused".to_string()));
            }
            // Slow enough that requests pile up behind a running one.
            std::thread::sleep(Duration::from_millis(10));
            self.scheduled.lock().unwrap().push(plan);
            Ok(())
        }

        fn cancel_all(&self) -> Result<(), GoldlistError> {
            self.scheduled.lock().unwrap().clear();
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_reschedule_reports_plan() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let manager = TaskManager::new(scheduler.clone());
        let entry = VocabularyEntry::new(Uuid::new_v4(), 1, "hola", "hello", now());

        manager.reschedule_reminders(vec![entry], now(), 9);

        match manager.wait_result(Duration::from_secs(5)) {
            Some(TaskResult::RemindersScheduled(Ok(Some(plan)))) => {
                assert_eq!(plan.due_count, 1);
                assert_eq!(scheduler.scheduled.lock().unwrap().as_slice(), &[plan]);
            }
            other => panic!("Expected scheduled reminder, got {:?}", other),
        }
    }

    #[test]
    fn test_scheduler_failure_is_reported_not_raised() {
        let scheduler = Arc::new(RecordingScheduler { fail: true, ..Default::default() });
        let mut manager = TaskManager::new(scheduler);
        let entry = VocabularyEntry::new(Uuid::new_v4(), 1, "hola", "hello", now());

        manager.reschedule_reminders(vec![entry], now(), 9);
        let result = manager.wait_result(Duration::from_secs(5)).unwrap();
        assert_eq!(result.task_type(), "reminders_scheduled");
        assert!(result.is_err());
        assert!(manager.poll_results().is_empty());
    }

    #[test]
    fn test_latest_reschedule_wins() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let manager = TaskManager::new(scheduler.clone());
        let notebook_id = Uuid::new_v4();
        let early = vec![VocabularyEntry::new(notebook_id, 1, "uno", "one", now())];
        let late = vec![VocabularyEntry::new(
            notebook_id,
            2,
            "dos",
            "two",
            now() + chrono::Duration::days(5),
        )];
        let latest = plan_reminder(&late, now(), 9).unwrap();

        for _ in 0..10 {
            manager.reschedule_reminders(early.clone(), now(), 9);
        }
        manager.reschedule_reminders(late, now(), 9);

        loop {
            match manager.wait_result(Duration::from_secs(5)) {
                Some(TaskResult::RemindersScheduled(Ok(Some(plan)))) if plan == latest => break,
                Some(TaskResult::RemindersScheduled(Ok(Some(_)))) => continue,
                other => panic!("Expected scheduled reminder, got {:?}", other),
            }
        }

        assert_eq!(scheduler.scheduled.lock().unwrap().as_slice(), &[latest]);
        assert!(manager.wait_result(Duration::from_millis(50)).is_none());
    }

    #[test]
    fn test_cancel_reminders() {
        let manager = TaskManager::new(Arc::new(RecordingScheduler::default()));
        manager.cancel_reminders();
        assert_eq!(
            manager.wait_result(Duration::from_secs(5)),
            Some(TaskResult::RemindersCancelled(Ok(())))
        );
    }
}
