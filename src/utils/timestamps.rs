use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Timestamp layouts seen across the yearly sheet exports.
const SHEET_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Parse a first-column cell as a sheet timestamp, trying each known
/// export layout in turn. Returns `None` for anything that is not a
/// timestamp (titles, blanks, the header marker, footnote text).
pub fn parse_sheet_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    SHEET_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Truncate a timestamp to minute resolution, dropping seconds and
/// sub-second components.
pub fn floor_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date()
        .and_hms_opt(ts.hour(), ts.minute(), 0)
        .expect("hour and minute taken from a valid timestamp")
}

/// Calendar-correct number of days in a year (365, or 366 for leap years).
pub fn days_in_year(year: i32) -> usize {
    let last = NaiveDate::from_ymd_opt(year, 12, 31).expect("Dec 31 exists in every year");
    last.ordinal() as usize
}
