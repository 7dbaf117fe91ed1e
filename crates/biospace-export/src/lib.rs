//! biospace-export: Knowledge map exports.
//! - CSV and PDF listings of the publications behind a map node
//! - The insights report PDF
//! - Download file names

pub mod csv;
pub mod error;
pub mod filename;
pub mod pdf;
pub mod report;

use std::fmt;
use std::str::FromStr;

use biospace_common::Publication;
use biospace_kg::{GraphNode, NodeKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::csv::to_csv;
pub use error::ExportError;
pub use filename::{export_filename, report_filename, safe_id};
pub use pdf::node_pdf;
pub use report::{insights_report, representative_publications};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// The map node an export is focused on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub node_id: String,
    pub label: String,
    pub kind: NodeKind,
}

impl ExportTarget {
    pub fn from_node(node: &GraphNode) -> Self {
        Self { node_id: node.id.clone(), label: node.label.clone(), kind: node.kind }
    }

    /// Identifier used in the file name: the label, or the node id when the
    /// label is empty.
    pub fn name(&self) -> &str {
        if self.label.is_empty() {
            &self.node_id
        } else {
            &self.label
        }
    }
}

/// A rendered export, ready to be served as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render the publications behind `target` in the requested format.
pub fn export(
    format: ExportFormat,
    target: &ExportTarget,
    publications: &[&Publication],
    date: NaiveDate,
) -> Result<ExportFile, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(publications).into_bytes(),
        ExportFormat::Pdf => node_pdf(target, publications, date)?,
    };
    tracing::info!(
        format = %format,
        node = %target.node_id,
        publications = publications.len(),
        bytes = bytes.len(),
        "Export rendered"
    );
    Ok(ExportFile {
        filename: export_filename(format, target.kind, target.name(), date),
        content_type: format.content_type(),
        bytes,
    })
}
