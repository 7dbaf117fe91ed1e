//! Load a dataset file from disk end to end.

use std::io::Write;

use biospace_ingestion::PublicationStore;
use chrono::Datelike;

const DATASET: &str = r#"[
  {
    "title": "Mice in Space: bone loss",
    "link": "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC2013/",
    "authors": ["R. Globus", "T. Morey-Holton"],
    "abstract": "Spaceflight causes bone loss in mice.",
    "introduction": "Bone remodels.",
    "methods": "Mice flew.",
    "results": "Less bone.",
    "conclusions": "Countermeasures needed.",
    "keywords": ["Rodent Model", "Spaceflight", "Bone Loss"]
  },
  {
    "title": "Untagged study",
    "source_link": "https://example.org/untagged"
  },
  {
    "abstract": "No title and no link."
  }
]"#;

#[test]
fn test_load_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(DATASET.as_bytes())?;

    let store = PublicationStore::from_path(file.path());
    assert_eq!(store.len(), 3);

    let first = &store.all()[0];
    assert_eq!(first.publication_year, 2013);
    assert_eq!(first.authors.len(), 2);
    assert_eq!(first.topics.len(), 3);

    let second = store.get("https://example.org/untagged").expect("source_link id");
    assert_eq!(second.authors, vec!["Unknown Author".to_string()]);
    assert_eq!(second.topics, vec!["Uncategorized".to_string()]);
    assert_eq!(second.summary, "No summary available.");
    assert_eq!(second.publication_year, chrono::Local::now().year());

    let third = store.get("pub-2").expect("positional id");
    assert_eq!(third.summary, "No title and no link.");
    Ok(())
}

#[test]
fn test_ids_unique_across_dataset() {
    let store = PublicationStore::from_json_str(DATASET);
    let mut ids: Vec<&str> = store.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), store.len());
}

#[test]
fn test_corrupt_file_is_not_fatal() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"[{\"title\": \"cut off")?;
    assert!(PublicationStore::from_path(file.path()).is_empty());
    Ok(())
}
