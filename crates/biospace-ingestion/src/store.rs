//! Read-only in-memory publication store.
//!
//! Built once at startup from the static dataset and shared as
//! `Arc<PublicationStore>`. Nothing mutates it after construction, so any
//! number of concurrent readers can use it without locking.

use std::collections::HashMap;
use std::path::Path;

use biospace_common::{Publication, Result};
use chrono::Datelike;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::models::RawPublication;
use crate::normalise::{fallback_id, normalise};

#[derive(Debug, Default)]
pub struct PublicationStore {
    publications: Vec<Publication>,
    index: HashMap<String, usize>,
}

impl PublicationStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalise `records` in order. Duplicate ids are replaced by the
    /// positional fallback so ids stay unique within the store.
    pub fn from_records(records: Vec<RawPublication>) -> Self {
        let current_year = chrono::Local::now().year();
        let mut publications = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for (i, raw) in records.into_iter().enumerate() {
            let mut publication = normalise(raw, i, current_year);
            if index.contains_key(&publication.id) {
                let mut replacement = fallback_id(i);
                let mut n = 1;
                while index.contains_key(&replacement) {
                    replacement = format!("{}-{n}", fallback_id(i));
                    n += 1;
                }
                warn!(
                    duplicate = %publication.id,
                    replacement = %replacement,
                    "Duplicate publication id in dataset"
                );
                publication.id = replacement;
            }
            index.insert(publication.id.clone(), publications.len());
            publications.push(publication);
        }

        Self { publications, index }
    }

    /// Parse a JSON array of raw records. Records that do not fit the raw
    /// shape are skipped with a warning; only a non-array document fails.
    pub fn try_from_json_str(json: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(json)?;

        let records = values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<RawPublication>(value) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    warn!(position = i, error = %e, "Skipping malformed publication record");
                    None
                }
            })
            .collect();

        let store = Self::from_records(records);
        info!(count = store.len(), "Loaded and normalised publications");
        Ok(store)
    }

    /// Like [`try_from_json_str`](Self::try_from_json_str), but a parse
    /// failure is logged and yields an empty store.
    pub fn from_json_str(json: &str) -> Self {
        Self::try_from_json_str(json).unwrap_or_else(|e| {
            error!(error = %e, "Failed to parse publication dataset");
            Self::empty()
        })
    }

    pub fn try_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::try_from_json_str(&content)
    }

    /// Load the dataset file at `path`. An unreadable or unparseable file
    /// yields an empty store.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading publications");
        Self::try_from_path(path).unwrap_or_else(|e| {
            error!(path = %path.display(), error = %e, "Failed to load publication dataset");
            Self::empty()
        })
    }

    pub fn get(&self, id: &str) -> Option<&Publication> {
        self.index.get(id).map(|&i| &self.publications[i])
    }

    pub fn all(&self) -> &[Publication] {
        &self.publications
    }

    pub fn iter(&self) -> impl Iterator<Item = &Publication> {
        self.publications.iter()
    }

    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }
}
