//! Raw record → `Publication` normalisation.
//!
//! Pure and infallible: every missing field has a default, so a sparse
//! record still yields a usable publication.

use biospace_common::publication::{Publication, DEFAULT_AUTHOR, DEFAULT_TOPIC, NO_SUMMARY};
use regex::Regex;

use crate::models::RawPublication;

/// Title used when a record has none.
pub const UNTITLED: &str = "Untitled publication";

/// Normalise one raw record. `index` is the record's position in the
/// dataset (used for the fallback id) and `current_year` the fallback
/// publication year.
pub fn normalise(raw: RawPublication, index: usize, current_year: i32) -> Publication {
    let link = non_blank(raw.link).or_else(|| non_blank(raw.source_link.clone()));
    let id = link.clone().unwrap_or_else(|| fallback_id(index));
    let link = link.unwrap_or_default();

    let title = non_blank(raw.title).unwrap_or_else(|| UNTITLED.to_string());
    let authors = match raw.authors {
        Some(list) if list.iter().any(|a| !a.trim().is_empty()) => list
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect(),
        _ => vec![DEFAULT_AUTHOR.to_string()],
    };
    let publication_year = extract_year(&link).unwrap_or(current_year);

    let abstract_text = raw.abstract_text.unwrap_or_default();
    let summary = if abstract_text.trim().is_empty() {
        NO_SUMMARY.to_string()
    } else {
        abstract_text.clone()
    };

    let introduction = raw.introduction.unwrap_or_default();
    let methods = raw.methods.unwrap_or_default();
    let results = raw.results.unwrap_or_default();
    let conclusions = raw.conclusions.unwrap_or_default();

    let full_text = [
        format!("Title: {title}"),
        format!("Authors: {}", authors.join(", ")),
        format!("Year: {publication_year}"),
        format!("\n--- Introduction ---\n{introduction}"),
        format!("\n--- Methods ---\n{methods}"),
        format!("\n--- Results ---\n{results}"),
        format!("\n--- Conclusion ---\n{conclusions}"),
    ]
    .join("\n\n");

    let keywords = raw.keywords.unwrap_or_default();
    let topics = if keywords.is_empty() {
        vec![DEFAULT_TOPIC.to_string()]
    } else {
        keywords.clone()
    };

    Publication {
        id,
        title,
        link,
        source: raw.source.or(raw.source_link).unwrap_or_default(),
        authors,
        publication_year,
        abstract_text,
        introduction,
        methods,
        results,
        conclusions,
        keywords,
        summary,
        full_text,
        topics,
    }
}

/// Positional id for records without any link.
pub fn fallback_id(index: usize) -> String {
    format!("pub-{index}")
}

/// First run of four digits in `text`, parsed as a year.
pub fn extract_year(text: &str) -> Option<i32> {
    year_regex()
        .find(text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

fn year_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("static year pattern"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
