//! Day-by-day view of a notebook. Page N belongs to the Nth calendar day since the notebook was
//! created, so the roadmap is always derived from the clock and the live word counts.

use std::collections::HashMap;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    utils::days_between,
    GoldlistError,
    Notebook,
};

pub const TOTAL_PAGES: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageState {
    /// Today's page, nothing written yet.
    Active,
    Partial,
    Completed,
    /// A past day with no words. It stays closed for good.
    Missed,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPage {
    pub page_number: u32,
    pub word_count: u32,
    pub state: PageState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Day {
    Past,
    Today,
    Future,
}

fn classify_page(day: Day, count: u32, limit: u32) -> PageState {
    match (day, count) {
        (Day::Future, _) => PageState::Locked,
        (Day::Today, 0) => PageState::Active,
        (Day::Past, 0) => PageState::Missed,
        (_, count) if count >= limit => PageState::Completed,
        _ => PageState::Partial,
    }
}

/// Classifies every page of the notebook for `now`.
pub fn classify_pages(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    word_counts: &HashMap<u32, u32>,
    limit: u32,
) -> Vec<RoadmapPage> {
    classify_pages_locked(created_at, now, word_counts, limit, 0)
}

/// Like [`classify_pages`], but pages up to `locked_through` are always treated as past days,
/// even if `now` has been moved back before them.
pub fn classify_pages_locked(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    word_counts: &HashMap<u32, u32>,
    limit: u32,
    locked_through: u32,
) -> Vec<RoadmapPage> {
    let active_day = days_between(created_at, now) + 1;

    (1..=TOTAL_PAGES)
        .map(|page_number| {
            let page = i64::from(page_number);
            let day = if page_number <= locked_through || page < active_day {
                Day::Past
            } else if page == active_day {
                Day::Today
            } else {
                Day::Future
            };
            let word_count = word_counts.get(&page_number).copied().unwrap_or(0);
            RoadmapPage { page_number, word_count, state: classify_page(day, word_count, limit) }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapSummary {
    pub active_page: Option<u32>,
    pub active: u32,
    pub partial: u32,
    pub completed: u32,
    pub missed: u32,
    pub locked: u32,
    pub words_written: u32,
}

impl RoadmapSummary {
    pub fn from_pages(pages: &[RoadmapPage]) -> Self {
        let mut summary = Self::default();
        for page in pages {
            summary.words_written += page.word_count;
            match page.state {
                PageState::Active => summary.active += 1,
                PageState::Partial => summary.partial += 1,
                PageState::Completed => summary.completed += 1,
                PageState::Missed => summary.missed += 1,
                PageState::Locked => summary.locked += 1,
            }
        }
        summary
    }

    pub fn with_active_page(mut self, active_page: Option<u32>) -> Self {
        self.active_page = active_page;
        self
    }
}

impl Notebook {
    pub fn roadmap(&self, now: DateTime<Utc>, word_counts: &HashMap<u32, u32>) -> Vec<RoadmapPage> {
        classify_pages_locked(
            self.created_at,
            now,
            word_counts,
            self.words_per_page,
            self.locked_through,
        )
    }

    /// Page for today if the notebook has one, `None` before creation, after the last page, or
    /// when the clock has been rewound into already locked days.
    pub fn todays_page(&self, now: DateTime<Utc>) -> Option<u32> {
        let day = self.active_day(now);
        u32::try_from(day)
            .ok()
            .filter(|day| (1..=TOTAL_PAGES).contains(day) && *day > self.locked_through)
    }

    pub fn summary(&self, now: DateTime<Utc>, word_counts: &HashMap<u32, u32>) -> RoadmapSummary {
        RoadmapSummary::from_pages(&self.roadmap(now, word_counts))
            .with_active_page(self.todays_page(now))
    }

    /// Checks that words may still be written on `page`. Missed days and future days are closed,
    /// a finished past day is closed, and today's page stays open even once full.
    pub fn can_add_words(
        &self,
        page: u32,
        now: DateTime<Utc>,
        word_counts: &HashMap<u32, u32>,
    ) -> Result<(), GoldlistError> {
        if !(1..=TOTAL_PAGES).contains(&page) {
            return Err(GoldlistError::PageNotWritable {
                page,
                reason: format!("pages run from 1 to {}", TOTAL_PAGES),
            });
        }

        let state = self
            .roadmap(now, word_counts)
            .get(page as usize - 1)
            .map(|p| p.state)
            .unwrap_or(PageState::Locked);
        let is_today = self.todays_page(now) == Some(page);

        let reason = match state {
            PageState::Active | PageState::Partial => return Ok(()),
            PageState::Completed if is_today => return Ok(()),
            PageState::Completed => "already completed",
            PageState::Missed => "day was missed",
            PageState::Locked => "day has not started yet",
        };
        Err(GoldlistError::PageNotWritable { page, reason: reason.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{
        Duration,
        TimeZone,
    };

    use super::*;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
    }

    fn day(n: i64) -> DateTime<Utc> {
        created() + Duration::days(n) + Duration::hours(6)
    }

    fn state_of(pages: &[RoadmapPage], page: u32) -> PageState {
        pages[page as usize - 1].state
    }

    #[test]
    fn test_every_page_is_classified() {
        let pages = classify_pages(created(), day(0), &HashMap::new(), 20);
        assert_eq!(pages.len(), TOTAL_PAGES as usize);
        assert_eq!(state_of(&pages, 1), PageState::Active);
        assert!(pages[1..].iter().all(|p| p.state == PageState::Locked));
    }

    #[test]
    fn test_active_day_limit_boundary() {
        let full = HashMap::from([(1, 20)]);
        let pages = classify_pages(created(), day(0), &full, 20);
        assert_eq!(state_of(&pages, 1), PageState::Completed);

        let almost = HashMap::from([(1, 19)]);
        let pages = classify_pages(created(), day(0), &almost, 20);
        assert_eq!(state_of(&pages, 1), PageState::Partial);

        let over = HashMap::from([(1, 25)]);
        let pages = classify_pages(created(), day(0), &over, 20);
        assert_eq!(state_of(&pages, 1), PageState::Completed);
    }

    #[test]
    fn test_fifth_day_scenario() {
        let counts = HashMap::from([(1, 20), (2, 4), (5, 12)]);
        let pages = classify_pages(created(), day(5), &counts, 20);

        assert_eq!(state_of(&pages, 1), PageState::Completed);
        assert_eq!(state_of(&pages, 2), PageState::Partial);
        assert_eq!(state_of(&pages, 3), PageState::Missed);
        assert_eq!(state_of(&pages, 4), PageState::Missed);
        assert_eq!(state_of(&pages, 5), PageState::Partial);
        assert_eq!(state_of(&pages, 6), PageState::Active);
        assert_eq!(state_of(&pages, 7), PageState::Locked);
        assert_eq!(state_of(&pages, 200), PageState::Locked);
    }

    #[test]
    fn test_missed_stays_missed_when_clock_is_rewound() {
        let counts = HashMap::new();
        let mut notebook = Notebook::new("French", 20, created());
        notebook.observe(day(5));
        assert_eq!(state_of(&notebook.roadmap(day(5), &counts), 3), PageState::Missed);

        // Rewinding to day 2 would make page 3 today without the lock.
        assert_eq!(state_of(&classify_pages(created(), day(2), &counts, 20), 3), PageState::Active);
        let rewound = notebook.roadmap(day(2), &counts);
        assert_eq!(state_of(&rewound, 3), PageState::Missed);
        assert_eq!(state_of(&rewound, 5), PageState::Missed);
        assert_eq!(state_of(&rewound, 6), PageState::Locked);
        assert_eq!(notebook.todays_page(day(2)), None);
    }

    #[test]
    fn test_before_creation_everything_is_locked() {
        let pages = classify_pages(created(), created() - Duration::days(3), &HashMap::new(), 20);
        assert!(pages.iter().all(|p| p.state == PageState::Locked));
    }

    #[test]
    fn test_past_last_page_nothing_is_active() {
        let pages = classify_pages(created(), day(250), &HashMap::from([(200, 3)]), 20);
        assert!(pages.iter().all(|p| p.state != PageState::Active && p.state != PageState::Locked));
        assert_eq!(state_of(&pages, 200), PageState::Partial);
    }

    #[test]
    fn test_summary_counts() {
        let notebook = Notebook::new("German", 20, created());
        let counts = HashMap::from([(1, 20), (2, 4), (5, 12)]);
        let summary = notebook.summary(day(5), &counts);

        assert_eq!(summary.active_page, Some(6));
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.partial, 2);
        assert_eq!(summary.missed, 2);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.locked, TOTAL_PAGES - 6);
        assert_eq!(summary.words_written, 36);
    }

    #[test]
    fn test_can_add_words() {
        let notebook = Notebook::new("Italian", 20, created());
        let counts = HashMap::from([(1, 20), (2, 4), (6, 20)]);
        let now = day(5);

        assert!(notebook.can_add_words(2, now, &counts).is_ok());
        assert!(notebook.can_add_words(6, now, &counts).is_ok());
        assert!(matches!(
            notebook.can_add_words(1, now, &counts),
            Err(GoldlistError::PageNotWritable { page: 1, .. })
        ));
        assert!(notebook.can_add_words(3, now, &counts).is_err());
        assert!(notebook.can_add_words(7, now, &counts).is_err());
        assert!(notebook.can_add_words(0, now, &counts).is_err());
        assert!(notebook.can_add_words(201, now, &counts).is_err());
    }
}
