// src/utils.rs
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Strip JSON-array punctuation from an employment type: `["INTERN","PART_TIME"]`
/// becomes `INTERN, PART_TIME`.
pub fn format_employment_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']' | '"'))
        .collect::<String>()
        .replace(',', ", ")
}

/// Render a posting date in Indonesian long form (`15 Januari 2024`).
/// Timestamps with an offset are shown in the local time zone; input that is not
/// a recognisable date is returned as-is.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Local).date_naive())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()));

    match parsed {
        Ok(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS_ID[date.month0() as usize],
            date.year()
        ),
        Err(_) => raw.to_string(),
    }
}

/// Cut text to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
