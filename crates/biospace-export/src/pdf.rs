//! PDF rendering on top of `lopdf`.
//!
//! Layout code works in millimetres from the top-left corner of an A4 page;
//! [`Canvas`] converts to PDF points on output. Text uses the standard
//! Helvetica faces with WinAnsi encoding, so characters outside Latin-1 are
//! written as `?`. Line widths are estimated from an average glyph width.

use biospace_common::Publication;
use biospace_kg::NodeKind;
use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::error::ExportError;
use crate::ExportTarget;

pub(crate) const PAGE_WIDTH: f32 = 210.0;
pub(crate) const PAGE_HEIGHT: f32 = 297.0;
pub(crate) const MARGIN: f32 = 14.0;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub(crate) const TEXT_WIDTH: f32 = 180.0;

const PT_PER_MM: f32 = 72.0 / 25.4;
const AVG_GLYPH_WIDTH: f32 = 0.5;
const CELL_PADDING: f32 = 2.0;

pub const EXPORT_TITLE: &str = "BioSpace Explorer Export";

fn to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Baseline-to-baseline distance in mm for a font size in points.
pub(crate) fn line_height(size: f32) -> f32 {
    size * 1.15 / PT_PER_MM
}

fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn max_chars(width: f32, size: f32) -> usize {
    ((to_pt(width) / (size * AVG_GLYPH_WIDTH)).floor() as usize).max(1)
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH / PT_PER_MM
}

/// Greedy word wrap to `width` mm. Words longer than a line are split.
/// Always returns at least one line.
pub(crate) fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let max = max_chars(width, size);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let split = word.char_indices().nth(max).map_or(word.len(), |(i, _)| i);
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let len = line.chars().count();
        if len > 0 && len + 1 + word.chars().count() > max {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Accumulates page content streams.
#[derive(Default)]
pub(crate) struct Canvas {
    done: Vec<Vec<Operation>>,
    current: Vec<Operation>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, font: Font, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), size.into()]),
            Operation::new("Td", vec![to_pt(x).into(), to_pt(PAGE_HEIGHT - y).into()]),
            Operation::new("Tj", vec![Object::String(encode(text), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
    }

    pub fn text_centered(&mut self, y: f32, size: f32, font: Font, text: &str) {
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(0.0);
        self.text(x, y, size, font, text);
    }

    /// Wrapped text starting at baseline `y`, breaking onto new pages as
    /// needed. Returns the baseline of the line after the last one written.
    pub fn paragraph(&mut self, x: f32, y: f32, width: f32, size: f32, font: Font, text: &str) -> f32 {
        let step = line_height(size);
        let mut y = y;
        for line in wrap(text, width, size) {
            if y > PAGE_HEIGHT - MARGIN {
                self.add_page();
                y = MARGIN + step;
            }
            self.text(x, y, size, font, &line);
            y += step;
        }
        y
    }

    /// Grey-level fill colour for subsequent shapes and text (0 black, 1 white).
    pub fn fill_gray(&mut self, level: f32) {
        self.current.push(Operation::new("g", vec![level.into()]));
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.current.extend([
            Operation::new(
                "re",
                vec![
                    to_pt(x).into(),
                    to_pt(PAGE_HEIGHT - y - height).into(),
                    to_pt(width).into(),
                    to_pt(height).into(),
                ],
            ),
            Operation::new("f", vec![]),
        ]);
    }

    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        self.add_page();
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(font("Helvetica"));
        let bold = doc.add_object(font("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.done.len());
        for operations in self.done {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            to_pt(PAGE_WIDTH).into(),
            to_pt(PAGE_HEIGHT).into(),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

// ── Tables ──────────────────────────────────────────────────────────────────

pub(crate) struct Column<'a> {
    pub title: &'a str,
    pub width: f32,
}

fn table_header(canvas: &mut Canvas, y: f32, columns: &[Column], size: f32) -> f32 {
    let height = line_height(size) + 2.0 * CELL_PADDING;
    let total: f32 = columns.iter().map(|c| c.width).sum();
    canvas.fill_gray(0.0);
    canvas.fill_rect(MARGIN, y, total, height);
    canvas.fill_gray(1.0);
    let mut x = MARGIN;
    for column in columns {
        canvas.text(x + CELL_PADDING, y + CELL_PADDING + line_height(size) * 0.8, size, Font::Bold, column.title);
        x += column.width;
    }
    canvas.fill_gray(0.0);
    y + height
}

/// Draw a table whose top edge is at `y`. The black header row is repeated
/// on every page the table spans. A row that fits on a fresh page is never
/// split; a row taller than a whole page continues line by line onto the
/// following pages. Returns the y of the table's bottom edge.
pub(crate) fn table(canvas: &mut Canvas, y: f32, columns: &[Column], rows: &[Vec<String>], size: f32) -> f32 {
    let step = line_height(size);
    let bottom = PAGE_HEIGHT - MARGIN;
    let lines_fitting = |top: f32| (((bottom - top - 2.0 * CELL_PADDING) / step).floor().max(0.0)) as usize;
    let page_capacity = lines_fitting(MARGIN + step + 2.0 * CELL_PADDING).max(1);
    let mut y = table_header(canvas, y, columns, size);

    for row in rows {
        let cells: Vec<Vec<String>> = columns
            .iter()
            .zip(row)
            .map(|(column, value)| wrap(value, column.width - 2.0 * CELL_PADDING, size))
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1);

        let mut start = 0;
        while start < lines {
            let available = lines_fitting(y);
            let remaining = lines - start;
            if available == 0 || (start == 0 && remaining <= page_capacity && available < remaining) {
                canvas.add_page();
                y = table_header(canvas, MARGIN, columns, size);
                continue;
            }
            let take = remaining.min(available);
            let mut x = MARGIN;
            for (column, cell) in columns.iter().zip(&cells) {
                for (i, line) in cell.iter().enumerate().skip(start).take(take) {
                    let offset = (i - start) as f32 + 0.8;
                    canvas.text(x + CELL_PADDING, y + CELL_PADDING + step * offset, size, Font::Regular, line);
                }
                x += column.width;
            }
            y += take as f32 * step + 2.0 * CELL_PADDING;
            start += take;
        }
    }
    y
}

// ── Node export ─────────────────────────────────────────────────────────────

/// Date as printed in document headers, e.g. `3/7/2024`.
pub(crate) fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn publication_detail(canvas: &mut Canvas, p: &Publication) {
    let mut y = canvas.paragraph(MARGIN, 50.0, TEXT_WIDTH, 14.0, Font::Bold, &p.title);
    y += 9.0 - line_height(14.0);
    y = canvas.paragraph(MARGIN, y.max(65.0), TEXT_WIDTH, 10.0, Font::Regular, &format!("Authors: {}", p.author_line()));
    y += 6.0 - line_height(10.0);
    canvas.text(MARGIN, y, 10.0, Font::Regular, &format!("Year: {}", p.publication_year));
    y += 6.0;
    y = canvas.paragraph(MARGIN, y, TEXT_WIDTH, 10.0, Font::Regular, &format!("Link: {}", p.link));
    y += 10.0 - line_height(10.0);
    canvas.text(MARGIN, y, 12.0, Font::Bold, "Summary:");
    canvas.paragraph(MARGIN, y + 6.0, TEXT_WIDTH, 10.0, Font::Regular, &p.summary);
}

/// PDF listing of the publications behind a map node.
///
/// A publication node backed by exactly one publication gets a detail page;
/// anything else gets a Title / Year / Authors table.
pub fn node_pdf(target: &ExportTarget, publications: &[&Publication], date: NaiveDate) -> Result<Vec<u8>, ExportError> {
    let mut canvas = Canvas::new();
    canvas.text(MARGIN, 22.0, 18.0, Font::Bold, EXPORT_TITLE);
    canvas.text(
        MARGIN,
        30.0,
        12.0,
        Font::Regular,
        &format!("Focused on: {} (Type: {})", target.label, target.kind.as_str()),
    );
    canvas.text(MARGIN, 38.0, 12.0, Font::Regular, &format!("Date: {}", display_date(date)));

    match publications {
        [only] if target.kind == NodeKind::Publication => publication_detail(&mut canvas, only),
        _ => {
            let columns = [
                Column { title: "Title", width: 100.0 },
                Column { title: "Year", width: 20.0 },
                Column { title: "Authors", width: CONTENT_WIDTH - 120.0 },
            ];
            let rows: Vec<Vec<String>> = publications
                .iter()
                .map(|p| vec![p.title.clone(), p.publication_year.to_string(), p.author_line()])
                .collect();
            table(&mut canvas, 50.0, &columns, &rows, 8.0);
        }
    }

    canvas.finish()
}

/// Text drawn on each page, in page order. Test helper.
#[cfg(test)]
pub(crate) fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}
