use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    Stage,
    Status,
    VocabularyEntry,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyStats {
    pub total: usize,
    pub waiting: usize,
    pub ready: usize,
    pub learned: usize,
    pub leech: usize,
    /// Entries still in rotation, per stage.
    pub by_stage: BTreeMap<Stage, usize>,
}

impl VocabularyStats {
    pub fn compute(entries: &[VocabularyEntry], today: NaiveDate) -> Self {
        let mut stats = Self { total: entries.len(), ..Default::default() };

        for entry in entries {
            match entry.effective_status(today) {
                Status::Waiting => stats.waiting += 1,
                Status::Ready => stats.ready += 1,
                Status::Learned => stats.learned += 1,
                Status::Leech => stats.leech += 1,
            }
            if !entry.status.is_terminal() {
                *stats.by_stage.entry(entry.stage).or_insert(0) += 1;
            }
        }

        stats
    }

    /// Share of finished entries that were distilled out rather than given up on.
    pub fn retention(&self) -> f32 {
        let finished = self.learned + self.leech;
        if finished == 0 {
            0.0
        } else {
            self.learned as f32 / finished as f32
        }
    }
}

/// Last computed stats, valid for one day until a write invalidates them.
#[derive(Debug, Default)]
pub struct StatsCache {
    cached: Option<(NaiveDate, VocabularyStats)>,
}

impl StatsCache {
    pub fn get(&self, today: NaiveDate) -> Option<&VocabularyStats> {
        match &self.cached {
            Some((day, stats)) if *day == today => Some(stats),
            _ => None,
        }
    }

    pub fn store(&mut self, today: NaiveDate, stats: VocabularyStats) {
        self.cached = Some((today, stats));
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{
        TimeZone,
        Utc,
    };
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_compute_counts_effective_status() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let notebook = Uuid::new_v4();
        let ready = VocabularyEntry::new(notebook, 1, "a", "", created);
        let waiting =
            VocabularyEntry::new(notebook, 5, "b", "", created + chrono::Duration::days(4));
        let mut learned = VocabularyEntry::new(notebook, 1, "c", "", created);
        learned.status = Status::Learned;
        learned.next_review_date = None;
        let mut leech = VocabularyEntry::new(notebook, 1, "d", "", created);
        leech.stage = Stage::Gold;
        leech.status = Status::Leech;
        leech.next_review_date = None;

        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let stats = VocabularyStats::compute(&[ready, waiting, learned, leech], today);

        assert_eq!(stats.total, 4);
        assert_eq!((stats.ready, stats.waiting, stats.learned, stats.leech), (1, 1, 1, 1));
        assert_eq!(stats.by_stage.get(&Stage::Bronze), Some(&2));
        assert_eq!(stats.by_stage.get(&Stage::Gold), None);
        assert!((stats.retention() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cache_expires_with_the_day_and_on_invalidate() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut cache = StatsCache::default();
        cache.store(today, VocabularyStats { total: 3, ..Default::default() });

        assert_eq!(cache.get(today).map(|s| s.total), Some(3));
        assert!(cache.get(today.succ_opt().unwrap()).is_none());

        cache.invalidate();
        assert!(cache.get(today).is_none());
    }
}
