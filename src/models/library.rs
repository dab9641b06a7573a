use std::collections::HashMap;

use crate::models::Media;

/// An in-memory catalog of records keyed by exact title
#[derive(Debug, Clone, Default)]
pub struct Library {
    by_title: HashMap<String, Media>,
}

impl Library {
    /// Builds a library from loaded records
    ///
    /// Titles are unique within a library; when a later record reuses one,
    /// the first record wins and the duplicate is logged.
    pub fn from_records(records: Vec<Media>) -> Self {
        let mut by_title = HashMap::with_capacity(records.len());
        for media in records {
            if by_title.contains_key(&media.title) {
                tracing::warn!(title = %media.title, "Duplicate title in catalog, keeping the first");
                continue;
            }
            by_title.insert(media.title.clone(), media);
        }
        Self { by_title }
    }

    /// Looks up a record by its exact title
    pub fn get(&self, title: &str) -> Option<&Media> {
        self.by_title.get(title)
    }

    /// Case-insensitive substring search, ordered by title
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Media> {
        let needle = query.to_lowercase();
        let mut hits: Vec<&Media> = self
            .by_title
            .values()
            .filter(|media| media.title.to_lowercase().contains(&needle))
            .collect();
        hits.sort_by(|a, b| a.title.cmp(&b.title));
        hits.truncate(limit);
        hits
    }

    /// Iterates over every record, in no particular order
    pub fn items(&self) -> impl Iterator<Item = &Media> {
        self.by_title.values()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    /// Returns true when the library holds no records
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}
