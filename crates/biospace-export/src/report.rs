//! Insights report: title page, research trends, research gaps and a few
//! representative publications.

use std::collections::HashSet;

use biospace_common::Publication;
use biospace_kg::{ResearchGap, TopicCount, Trends};
use chrono::NaiveDate;

use crate::error::ExportError;
use crate::pdf::{display_date, line_height, table, Canvas, Column, Font, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT, TEXT_WIDTH};

pub const REPORT_TITLE: &str = "BioSpace Explorer: Insights Report";
pub const MAX_REPORT_GAPS: usize = 15;

/// One publication per leading topic, in topic order, without repeats.
pub fn representative_publications<'a>(
    publications: &'a [Publication],
    topics: &[TopicCount],
    n: usize,
) -> Vec<&'a Publication> {
    let mut seen = HashSet::new();
    let mut picked = Vec::new();
    for topic in topics {
        if picked.len() == n {
            break;
        }
        let next = publications
            .iter()
            .find(|p| p.has_topic(&topic.name) && !seen.contains(p.id.as_str()));
        if let Some(p) = next {
            seen.insert(p.id.as_str());
            picked.push(p);
        }
    }
    picked
}

fn heading(canvas: &mut Canvas, text: &str) {
    canvas.text(MARGIN, 22.0, 18.0, Font::Bold, text);
}

fn trends_section(canvas: &mut Canvas, trends: &Trends) {
    canvas.add_page();
    heading(canvas, "Research Trends");
    let half = CONTENT_WIDTH / 2.0;
    let mut y = 35.0;

    if !trends.publications_by_year.is_empty() {
        canvas.text(MARGIN, y, 14.0, Font::Bold, "Publications Over Time");
        let rows: Vec<Vec<String>> = trends
            .publications_by_year
            .iter()
            .map(|d| vec![d.year.to_string(), d.count.to_string()])
            .collect();
        let columns = [Column { title: "Year", width: half }, Column { title: "Publication Count", width: half }];
        y = table(canvas, y + 5.0, &columns, &rows, 10.0) + 10.0;
    }

    if !trends.top_topics.is_empty() {
        if y + 30.0 > PAGE_HEIGHT - MARGIN {
            canvas.add_page();
            y = 22.0;
        }
        let title = format!("Top {} Research Topics", trends.top_topics.len());
        canvas.text(MARGIN, y, 14.0, Font::Bold, &title);
        let rows: Vec<Vec<String>> = trends
            .top_topics
            .iter()
            .map(|t| vec![t.name.clone(), t.count.to_string()])
            .collect();
        let columns = [Column { title: "Topic", width: half }, Column { title: "Publication Count", width: half }];
        table(canvas, y + 5.0, &columns, &rows, 10.0);
    }
}

fn gaps_section(canvas: &mut Canvas, gaps: &[ResearchGap]) {
    canvas.add_page();
    heading(canvas, "Identified Research Gaps");
    canvas.text(
        MARGIN,
        30.0,
        10.0,
        Font::Regular,
        "Potentially under-studied areas based on combinations of topics, organisms, and environments.",
    );
    let rows: Vec<Vec<String>> = gaps
        .iter()
        .take(MAX_REPORT_GAPS)
        .map(|g| {
            vec![
                g.topic.clone(),
                g.organism.clone().unwrap_or_else(|| "-".into()),
                g.environment.clone().unwrap_or_else(|| "-".into()),
                g.count.to_string(),
            ]
        })
        .collect();
    let columns = [
        Column { title: "Topic", width: 70.0 },
        Column { title: "Organism", width: 45.0 },
        Column { title: "Environment", width: 45.0 },
        Column { title: "Count", width: CONTENT_WIDTH - 160.0 },
    ];
    table(canvas, 40.0, &columns, &rows, 10.0);
}

fn publications_section(canvas: &mut Canvas, publications: &[&Publication]) {
    canvas.add_page();
    heading(canvas, "Representative Publications");
    let mut y = 35.0;
    for p in publications {
        if y > 250.0 {
            canvas.add_page();
            y = 22.0;
        }
        y = canvas.paragraph(MARGIN, y, TEXT_WIDTH, 12.0, Font::Bold, &p.title);
        y += 4.0 - line_height(12.0) + line_height(10.0);
        y = canvas.paragraph(MARGIN, y, TEXT_WIDTH, 10.0, Font::Regular, &format!("Summary: {}", p.summary));
        y += 5.0;
    }
}

/// Render the insights report. Sections with no data are left out; the
/// title page is always present.
pub fn insights_report(
    trends: &Trends,
    gaps: &[ResearchGap],
    representative: &[&Publication],
    date: NaiveDate,
) -> Result<Vec<u8>, ExportError> {
    let mut canvas = Canvas::new();
    canvas.text_centered(100.0, 22.0, Font::Bold, REPORT_TITLE);
    canvas.text_centered(110.0, 12.0, Font::Regular, &format!("Generated on: {}", display_date(date)));

    trends_section(&mut canvas, trends);
    if !gaps.is_empty() {
        gaps_section(&mut canvas, gaps);
    }
    if !representative.is_empty() {
        publications_section(&mut canvas, representative);
    }

    tracing::info!(gaps = gaps.len(), publications = representative.len(), "Insights report rendered");
    canvas.finish()
}
