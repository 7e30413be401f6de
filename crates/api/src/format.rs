use chrono::{DateTime, Datelike, FixedOffset, Utc};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Shown wherever an optional value is missing.
pub const PLACEHOLDER: &str = "-";

/// Formats a timestamp as `dd Mon yyyy, HH.mm` in the display offset, or `-` when absent.
pub fn format_date(value: Option<&DateTime<Utc>>, offset: &FixedOffset) -> String {
    match value {
        Some(value) => {
            let local = value.with_timezone(offset);
            format!(
                "{:02} {} {}, {}",
                local.day(),
                MONTHS[local.month0() as usize],
                local.year(),
                local.format("%H.%M")
            )
        }
        None => PLACEHOLDER.to_string(),
    }
}

pub fn status_label(is_checked_in: bool) -> &'static str {
    if is_checked_in { "Hadir" } else { "Belum" }
}
