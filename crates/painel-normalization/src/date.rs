//! Localized date parsing.
//!
//! Sheets mix `31/01/2025`, `31/01/25`, `31-01-2025 00:00:00` and ISO
//! `2025-01-31`. Anything that does not resolve to a calendar date yields
//! `None`.

use chrono::NaiveDate;

const DAY_FIRST_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const DAY_FIRST_SHORT_FORMATS: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];
const MONTH_FIRST_FORMATS: [&str; 3] = ["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"];
const MONTH_FIRST_SHORT_FORMATS: [&str; 3] = ["%m/%d/%y", "%m-%d-%y", "%m.%d.%y"];
const ISO_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a day/month/year date string, ignoring any time-of-day suffix.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use painel_normalization::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 1, 31);
/// assert_eq!(parse_date("31/01/2025", true), expected);
/// assert_eq!(parse_date("31/01/2025 14:30:00", true), expected);
/// assert_eq!(parse_date("2025-01-31", true), expected);
/// assert_eq!(parse_date("01/31/2025", false), expected);
/// assert_eq!(parse_date("31/02/2025", true), None);
/// assert_eq!(parse_date("", true), None);
/// ```
pub fn parse_date(raw: &str, day_first: bool) -> Option<NaiveDate> {
    let date_part = date_component(raw)?;
    let first_len = leading_digits(date_part);
    if first_len == 4 {
        return try_formats(date_part, &ISO_FORMATS);
    }
    let short_year = trailing_digits(date_part) == 2;
    let formats = match (day_first, short_year) {
        (true, false) => &DAY_FIRST_FORMATS,
        (true, true) => &DAY_FIRST_SHORT_FORMATS,
        (false, false) => &MONTH_FIRST_FORMATS,
        (false, true) => &MONTH_FIRST_SHORT_FORMATS,
    };
    try_formats(date_part, formats)
}

/// Formats a date for display (`dd/mm/yyyy`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn date_component(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let token = trimmed.split_whitespace().next()?;
    // ISO timestamps glue the time on with a `T`.
    let token = match token.find('T') {
        Some(idx) if idx >= 8 => &token[..idx],
        _ => token,
    };
    if token.is_empty() { None } else { Some(token) }
}

fn leading_digits(value: &str) -> usize {
    value.chars().take_while(char::is_ascii_digit).count()
}

fn trailing_digits(value: &str) -> usize {
    value.chars().rev().take_while(char::is_ascii_digit).count()
}

fn try_formats(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
