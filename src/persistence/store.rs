use std::{
    collections::HashMap,
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use super::{
    load_json_from,
    save_json_to,
};
use crate::core::{
    GoldlistError,
    Notebook,
    Profile,
    VocabularyEntry,
};

pub const STORE_FILE: &str = "store.json";

/// The queries the review flow needs from whatever backend holds the learner's data.
/// Each call reads or writes a single row atomically; nothing here spans more than one.
pub trait VocabularyStore {
    fn entry(&self, id: Uuid) -> Result<VocabularyEntry, GoldlistError>;
    fn entries(&self) -> Result<Vec<VocabularyEntry>, GoldlistError>;
    fn insert_entry(&mut self, entry: VocabularyEntry) -> Result<(), GoldlistError>;
    fn update_entry(&mut self, entry: VocabularyEntry) -> Result<(), GoldlistError>;

    /// Entries with `next_review_date <= today` that are neither learned nor leech.
    fn due_entries(&self, today: NaiveDate) -> Result<Vec<VocabularyEntry>, GoldlistError>;

    /// Number of words written on each page of a notebook. Pages without words are absent.
    fn page_counts(&self, notebook_id: Uuid) -> Result<HashMap<u32, u32>, GoldlistError>;

    fn notebook(&self, id: Uuid) -> Result<Notebook, GoldlistError>;
    fn notebooks(&self) -> Result<Vec<Notebook>, GoldlistError>;
    fn upsert_notebook(&mut self, notebook: Notebook) -> Result<(), GoldlistError>;

    fn profile(&self) -> Result<Profile, GoldlistError>;
    fn update_profile(&mut self, profile: Profile) -> Result<(), GoldlistError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub notebooks: Vec<Notebook>,
    #[serde(default)]
    pub entries: Vec<VocabularyEntry>,
    #[serde(default)]
    pub profile: Profile,
}

/// Store backed by a single JSON document, written through on every change.
/// Without a file path it lives only in memory.
#[derive(Debug)]
pub struct JsonStore {
    data: StoreData,
    file_path: Option<PathBuf>,
}

impl JsonStore {
    pub fn open(file_path: PathBuf) -> Result<Self, GoldlistError> {
        let data = load_json_from::<StoreData>(&file_path)?;
        tracing::info!(
            notebooks = data.notebooks.len(),
            entries = data.entries.len(),
            "Opened store at {}",
            file_path.display()
        );
        Ok(Self { data, file_path: Some(file_path) })
    }

    pub fn in_memory() -> Self {
        Self { data: StoreData::default(), file_path: None }
    }

    fn save(&self) -> Result<(), GoldlistError> {
        match &self.file_path {
            Some(path) => save_json_to(&self.data, path),
            None => Ok(()),
        }
    }

    fn position(&self, id: Uuid) -> Result<usize, GoldlistError> {
        self.data
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(GoldlistError::EntryNotFound(id))
    }
}

impl VocabularyStore for JsonStore {
    fn entry(&self, id: Uuid) -> Result<VocabularyEntry, GoldlistError> {
        Ok(self.data.entries[self.position(id)?].clone())
    }

    fn entries(&self) -> Result<Vec<VocabularyEntry>, GoldlistError> {
        Ok(self.data.entries.clone())
    }

    fn insert_entry(&mut self, entry: VocabularyEntry) -> Result<(), GoldlistError> {
        if !self.data.notebooks.iter().any(|n| n.id == entry.notebook_id) {
            return Err(GoldlistError::NotebookNotFound(entry.notebook_id));
        }
        if self.data.entries.iter().any(|e| e.id == entry.id) {
            return Err(GoldlistError::Custom(format!("Entry {} already exists", entry.id)));
        }
        self.data.entries.push(entry);
        if let Err(e) = self.save() {
            self.data.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    fn update_entry(&mut self, entry: VocabularyEntry) -> Result<(), GoldlistError> {
        let index = self.position(entry.id)?;
        let previous = std::mem::replace(&mut self.data.entries[index], entry);
        if let Err(e) = self.save() {
            self.data.entries[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    fn due_entries(&self, today: NaiveDate) -> Result<Vec<VocabularyEntry>, GoldlistError> {
        Ok(self.data.entries.iter().filter(|e| e.is_due(today)).cloned().collect())
    }

    fn page_counts(&self, notebook_id: Uuid) -> Result<HashMap<u32, u32>, GoldlistError> {
        let mut counts = HashMap::new();
        for entry in self.data.entries.iter().filter(|e| e.notebook_id == notebook_id) {
            *counts.entry(entry.page_number).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn notebook(&self, id: Uuid) -> Result<Notebook, GoldlistError> {
        self.data
            .notebooks
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(GoldlistError::NotebookNotFound(id))
    }

    fn notebooks(&self) -> Result<Vec<Notebook>, GoldlistError> {
        Ok(self.data.notebooks.clone())
    }

    fn upsert_notebook(&mut self, notebook: Notebook) -> Result<(), GoldlistError> {
        let previous = match self.data.notebooks.iter().position(|n| n.id == notebook.id) {
            Some(index) => {
                Some((index, std::mem::replace(&mut self.data.notebooks[index], notebook)))
            }
            None => {
                self.data.notebooks.push(notebook);
                None
            }
        };

        if let Err(e) = self.save() {
            match previous {
                Some((index, previous)) => self.data.notebooks[index] = previous,
                None => {
                    self.data.notebooks.pop();
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn profile(&self) -> Result<Profile, GoldlistError> {
        Ok(self.data.profile.clone())
    }

    fn update_profile(&mut self, profile: Profile) -> Result<(), GoldlistError> {
        let previous = std::mem::replace(&mut self.data.profile, profile);
        if let Err(e) = self.save() {
            self.data.profile = previous;
            return Err(e);
        }
        Ok(())
    }
}
