//! The review flow around the progression rules: reading an entry, computing its next state,
//! writing it back, then refreshing everything derived from it.

pub mod queue;
pub mod stats;

use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::{
        Mutex,
        MutexGuard,
    },
};

use chrono::{
    DateTime,
    Utc,
};
pub use queue::ReviewQueue;
pub use stats::{
    StatsCache,
    VocabularyStats,
};
use uuid::Uuid;

use crate::{
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        utils::utc_day,
        GoldlistError,
        Notebook,
        VocabularyEntry,
    },
    persistence::{
        Settings,
        VocabularyStore,
    },
    progression::{
        advance,
        Transition,
    },
    roadmap::{
        RoadmapPage,
        RoadmapSummary,
    },
    streak::StreakDisplay,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub entry: VocabularyEntry,
    pub transition: Transition,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, GoldlistError> {
    mutex.lock().map_err(|e| GoldlistError::Custom(format!("Lock poisoned: {}", e)))
}

/// Holds an entry id for the duration of one review write.
struct InFlight<'a> {
    ids: &'a Mutex<HashSet<Uuid>>,
    id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Ok(mut ids) = self.ids.lock() {
            ids.remove(&self.id);
        }
    }
}

pub struct ReviewService<S: VocabularyStore> {
    store: Mutex<S>,
    in_flight: Mutex<HashSet<Uuid>>,
    stats: Mutex<StatsCache>,
    tasks: Option<Mutex<TaskManager>>,
    settings: Settings,
}

impl<S: VocabularyStore> ReviewService<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self {
            store: Mutex::new(store),
            in_flight: Mutex::new(HashSet::new()),
            stats: Mutex::new(StatsCache::default()),
            tasks: None,
            settings,
        }
    }

    pub fn with_tasks(mut self, tasks: TaskManager) -> Self {
        self.tasks = Some(Mutex::new(tasks));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn claim(&self, id: Uuid) -> Result<InFlight<'_>, GoldlistError> {
        if !lock(&self.in_flight)?.insert(id) {
            return Err(GoldlistError::ReviewInFlight(id));
        }
        Ok(InFlight { ids: &self.in_flight, id })
    }

    /// Applies one "remembered" or "forgotten" answer to an entry.
    pub fn review(
        &self,
        id: Uuid,
        remembered: bool,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, GoldlistError> {
        let _claim = self.claim(id)?;

        let entry = lock(&self.store)?.entry(id)?;
        let update = advance(&entry, remembered, now)?;
        let updated = update.apply(&entry);

        lock(&self.store)?.update_entry(updated.clone())?;
        tracing::info!(
            id = %id,
            term = %updated.term,
            transition = ?update.transition,
            "Review recorded"
        );

        self.after_write(now);
        Ok(ReviewOutcome { entry: updated, transition: update.transition })
    }

    pub fn create_notebook(
        &self,
        name: &str,
        words_per_page: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Notebook, GoldlistError> {
        let words_per_page = words_per_page.unwrap_or(self.settings.words_per_page).max(1);
        let notebook = Notebook::new(name, words_per_page, now);
        lock(&self.store)?.upsert_notebook(notebook.clone())?;
        tracing::info!(id = %notebook.id, name, words_per_page, "Notebook created");
        Ok(notebook)
    }

    /// Writes a word on `page`, or on today's page when `page` is `None`.
    pub fn add_word(
        &self,
        notebook_id: Uuid,
        page: Option<u32>,
        term: &str,
        translation: &str,
        now: DateTime<Utc>,
    ) -> Result<VocabularyEntry, GoldlistError> {
        let entry = {
            let mut store = lock(&self.store)?;
            let notebook = Self::observed_notebook(&mut *store, notebook_id, now)?;
            let counts = store.page_counts(notebook_id)?;

            let page = match page.or_else(|| notebook.todays_page(now)) {
                Some(page) => page,
                None => {
                    return Err(GoldlistError::PageNotWritable {
                        page: notebook.active_day(now).clamp(0, i64::from(u32::MAX)) as u32,
                        reason: "notebook has no page for today".to_string(),
                    })
                }
            };
            notebook.can_add_words(page, now, &counts)?;

            let entry = VocabularyEntry::new(notebook_id, page, term, translation, now);
            store.insert_entry(entry.clone())?;
            entry
        };
        tracing::info!(id = %entry.id, page = entry.page_number, term, "Word added");

        self.after_write(now);
        Ok(entry)
    }

    pub fn queue(&self, now: DateTime<Utc>) -> Result<ReviewQueue, GoldlistError> {
        ReviewQueue::build(&*lock(&self.store)?, utc_day(now))
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<VocabularyStats, GoldlistError> {
        let today = utc_day(now);
        let mut cache = lock(&self.stats)?;
        if let Some(stats) = cache.get(today) {
            return Ok(stats.clone());
        }

        let stats = VocabularyStats::compute(&lock(&self.store)?.entries()?, today);
        cache.store(today, stats.clone());
        Ok(stats)
    }

    pub fn roadmap(
        &self,
        notebook_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(Vec<RoadmapPage>, RoadmapSummary), GoldlistError> {
        let mut store = lock(&self.store)?;
        let notebook = Self::observed_notebook(&mut *store, notebook_id, now)?;
        let counts = store.page_counts(notebook_id)?;
        Ok((notebook.roadmap(now, &counts), notebook.summary(now, &counts)))
    }

    pub fn page_counts(&self, notebook_id: Uuid) -> Result<HashMap<u32, u32>, GoldlistError> {
        lock(&self.store)?.page_counts(notebook_id)
    }

    pub fn notebooks(&self) -> Result<Vec<Notebook>, GoldlistError> {
        lock(&self.store)?.notebooks()
    }

    pub fn streak(&self, now: DateTime<Utc>) -> Result<StreakDisplay, GoldlistError> {
        Ok(lock(&self.store)?.profile()?.display_streak(now))
    }

    pub fn poll_task_results(&self) -> Vec<TaskResult> {
        match &self.tasks {
            Some(tasks) => lock(tasks).map(|mut t| t.poll_results()).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn wait_task_result(&self, timeout: std::time::Duration) -> Option<TaskResult> {
        let tasks = self.tasks.as_ref()?;
        lock(tasks).ok()?.wait_result(timeout)
    }

    /// Loads a notebook and moves its locked horizon up to `now`, persisting it when it moved.
    fn observed_notebook(
        store: &mut S,
        notebook_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Notebook, GoldlistError> {
        let mut notebook = store.notebook(notebook_id)?;
        if notebook.observe(now) {
            store.upsert_notebook(notebook.clone())?;
        }
        Ok(notebook)
    }

    /// Follow-up work after a successful write. None of it may fail the write itself.
    fn after_write(&self, now: DateTime<Utc>) {
        if let Ok(mut cache) = lock(&self.stats) {
            cache.invalidate();
        }

        let entries = match lock(&self.store).and_then(|mut store| {
            let mut profile = store.profile()?;
            profile.record_activity(now);
            store.update_profile(profile)?;
            store.entries()
        }) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Post-write bookkeeping failed: {}", e);
                return;
            }
        };

        if let Some(tasks) = &self.tasks {
            match lock(tasks) {
                Ok(tasks) if self.settings.notifications_enabled => {
                    tasks.reschedule_reminders(entries, now, self.settings.reminder_hour_utc)
                }
                Ok(tasks) => tasks.cancel_reminders(),
                Err(e) => tracing::warn!("Could not reach task manager: {}", e),
            }
        }
    }
}
