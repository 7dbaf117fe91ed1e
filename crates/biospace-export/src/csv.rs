//! CSV listing of publications.
//!
//! Title, authors (joined with `"; "`) and summary are quoted with embedded
//! quotes doubled. Id, year and link are written bare.

use biospace_common::Publication;

const HEADER: &str = "id,title,year,authors,summary,link";

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(p: &Publication) -> String {
    [
        p.id.clone(),
        quoted(&p.title),
        p.publication_year.to_string(),
        quoted(&p.authors.join("; ")),
        quoted(&p.summary),
        p.link.clone(),
    ]
    .join(",")
}

/// Header plus one row per publication, joined by `\n` with no trailing newline.
pub fn to_csv(publications: &[&Publication]) -> String {
    std::iter::once(HEADER.to_string())
        .chain(publications.iter().map(|p| row(p)))
        .collect::<Vec<_>>()
        .join("\n")
}
