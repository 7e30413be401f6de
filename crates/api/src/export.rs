use chrono::{FixedOffset, NaiveDate};

use crate::format::{PLACEHOLDER, format_date, status_label};
use crate::models::Participant;

pub const CSV_HEADERS: [&str; 5] = ["Nama", "Email", "Status", "Dibuat", "Check-in"];

/// Serializes the given rows (already filtered and sorted) as CSV.
///
/// Every cell, the header included, is double-quoted.
pub fn to_csv(rows: &[&Participant], offset: &FixedOffset) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(CSV_HEADERS.iter().map(|h| h.to_string())));

    for participant in rows {
        let cells = [
            participant.name.clone(),
            participant.email().unwrap_or(PLACEHOLDER).to_string(),
            status_label(participant.is_checked_in).to_string(),
            format_date(Some(&participant.created_at), offset),
            format_date(participant.checked_in_at.as_ref(), offset),
        ];
        lines.push(csv_line(cells.into_iter()));
    }

    lines.join("\n")
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("peserta-{}.csv", date.format("%Y-%m-%d"))
}

fn csv_line(cells: impl Iterator<Item = String>) -> String {
    cells.map(|cell| quote(&cell)).collect::<Vec<_>>().join(",")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
