//! Classification code cleanup.

/// Normalizes a numeric-looking code and left-pads it with zeros.
///
/// Spreadsheet exports turn codes such as `33903900` into `33903900.0` and
/// drop leading zeros; this strips the float artifact and any non-digit
/// characters, then pads to `width`. Blank or digit-free input yields an
/// empty string; codes longer than `width` are kept whole.
///
/// # Examples
///
/// ```
/// use painel_normalization::pad_code;
///
/// assert_eq!(pad_code("339039.0", 8), "00339039");
/// assert_eq!(pad_code("3.3.90.39", 8), "00339039");
/// assert_eq!(pad_code("", 4), "");
/// ```
pub fn pad_code(raw: &str, width: usize) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    format!("{digits:0>width$}")
}
