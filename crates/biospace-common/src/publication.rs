/// Core publication record shared by the store, the knowledge map, the
/// prompt flows and the exporters.

use serde::{Deserialize, Serialize};

/// Author list used when a record carries none.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Topic assigned when a record has no keywords.
pub const DEFAULT_TOPIC: &str = "Uncategorized";

/// Summary used when a record has no abstract.
pub const NO_SUMMARY: &str = "No summary available.";

/// A normalized research publication.
///
/// Built once from a raw dataset record and never mutated afterwards.
/// `id`, `summary`, `full_text` and `topics` are derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub link: String,
    pub source: String,
    pub authors: Vec<String>,
    pub publication_year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub introduction: String,
    pub methods: String,
    pub results: String,
    pub conclusions: String,
    pub keywords: Vec<String>,

    pub summary: String,
    pub full_text: String,
    pub topics: Vec<String>,
}

impl Publication {
    /// Authors joined with `", "`, the form used in prompts and PDF output.
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// True when the record only carries the placeholder topic.
    pub fn is_uncategorized(&self) -> bool {
        self.topics.len() == 1 && self.topics[0] == DEFAULT_TOPIC
    }
}
