use biospace_kg::NodeKind;
use chrono::NaiveDate;

use crate::ExportFormat;

const MAX_ID_CHARS: usize = 50;

/// Replace every character outside `[A-Za-z0-9]` with `-`, keeping at most
/// 50 characters.
pub fn safe_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .take(MAX_ID_CHARS)
        .collect()
}

/// `export_<kind>_<safeId>_<yyyymmdd>.<ext>`
pub fn export_filename(format: ExportFormat, kind: NodeKind, id: &str, date: NaiveDate) -> String {
    format!(
        "export_{}_{}_{}.{}",
        kind.as_str(),
        safe_id(id),
        date.format("%Y%m%d"),
        format.extension()
    )
}

pub fn report_filename(date: NaiveDate) -> String {
    format!("BioSpace_Insights_Report_{}.pdf", date.format("%Y%m%d"))
}
