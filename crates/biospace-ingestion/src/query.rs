//! In-memory filters over the publication store.

use biospace_common::Publication;

use crate::store::PublicationStore;

/// Query words shorter than this are ignored by keyword search.
const MIN_KEYWORD_LEN: usize = 3;

impl PublicationStore {
    /// Keyword search over title and summary.
    ///
    /// The query is lower-cased and split on whitespace; words of fewer than
    /// three characters are dropped. A publication matches when any remaining
    /// word occurs in its lower-cased title or summary. Matches are returned
    /// in dataset order, at most `limit` of them.
    pub fn keyword_search(&self, query: &str, limit: usize) -> Vec<&Publication> {
        let query = query.to_lowercase();
        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        self.iter()
            .filter(|p| {
                let content = format!("{} {}", p.title.to_lowercase(), p.summary.to_lowercase());
                words.iter().any(|w| content.contains(w))
            })
            .take(limit)
            .collect()
    }

    /// Publications whose topic list contains `topic` exactly.
    pub fn by_topic(&self, topic: &str) -> Vec<&Publication> {
        self.iter().filter(|p| p.has_topic(topic)).collect()
    }

    /// Case-insensitive substring filter over title, summary, authors and
    /// topics. An empty query returns everything.
    pub fn filter_text(&self, query: &str) -> Vec<&Publication> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.iter().collect();
        }
        self.iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&query)
                    || p.summary.to_lowercase().contains(&query)
                    || p.authors.join(" ").to_lowercase().contains(&query)
                    || p.topics.join(" ").to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Resolve ids in the given order, skipping unknown ones.
    pub fn by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Publication> {
        ids.iter().filter_map(|id| self.get(id.as_ref())).collect()
    }
}
