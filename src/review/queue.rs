use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    core::{
        GoldlistError,
        VocabularyEntry,
    },
    persistence::VocabularyStore,
};

/// Entries to review on a given day, oldest due first.
#[derive(Debug, Clone, Default)]
pub struct ReviewQueue {
    entries: Vec<VocabularyEntry>,
}

impl ReviewQueue {
    pub fn build(store: &impl VocabularyStore, today: NaiveDate) -> Result<Self, GoldlistError> {
        Ok(Self::from_due(store.due_entries(today)?))
    }

    pub fn from_due(mut entries: Vec<VocabularyEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.next_review_date
                .cmp(&b.next_review_date)
                .then_with(|| a.stage.cmp(&b.stage))
                .then_with(|| a.page_number.cmp(&b.page_number))
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        tracing::debug!("Review queue holds {} entries", entries.len());
        Self { entries }
    }

    pub fn for_notebook(mut self, notebook_id: Uuid) -> Self {
        self.entries.retain(|e| e.notebook_id == notebook_id);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabularyEntry> {
        self.entries.iter()
    }
}
