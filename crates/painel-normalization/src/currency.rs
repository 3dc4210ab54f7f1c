//! Brazilian-real currency parsing and formatting.
//!
//! Source sheets write amounts as `R$ 1.234,56`: `.` groups thousands and
//! `,` marks decimals. Parsing coalesces blanks, dashes and garbage to
//! `0.0`, so a missing amount and a true zero look the same afterwards.

/// Literal prefix written before amounts.
pub const CURRENCY_SYMBOL: &str = "R$";

/// A raw cell as it arrives from the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCell<'a> {
    Text(&'a str),
    Number(f64),
    Null,
}

/// Parses a cell of any kind into an amount.
///
/// Numbers pass through unchanged (NaN becomes `0.0`); nulls become `0.0`.
pub fn parse_currency_cell(cell: RawCell<'_>) -> f64 {
    match cell {
        RawCell::Text(text) => parse_currency(text),
        RawCell::Number(value) if value.is_finite() => value,
        RawCell::Number(_) | RawCell::Null => 0.0,
    }
}

/// Parses a localized currency string.
///
/// # Examples
///
/// ```
/// use painel_normalization::parse_currency;
///
/// assert_eq!(parse_currency("R$ 1.234,56"), 1234.56);
/// assert_eq!(parse_currency("  987,5 "), 987.5);
/// assert_eq!(parse_currency("-"), 0.0);
/// assert_eq!(parse_currency(""), 0.0);
/// assert_eq!(parse_currency("n/d"), 0.0);
/// ```
pub fn parse_currency(raw: &str) -> f64 {
    let mut text = raw.trim();
    let mut negative = false;
    if let Some(rest) = text.strip_prefix('-') {
        negative = true;
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_prefix(CURRENCY_SYMBOL) {
        text = rest.trim();
    }
    if let Some(rest) = text.strip_prefix('-') {
        negative = !negative;
        text = rest.trim_start();
    }
    if text.is_empty() {
        return 0.0;
    }
    let canonical: String = text
        .chars()
        .filter(|ch| *ch != '.' && !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    match canonical.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative {
                -value
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Formats an amount as `R$ 1.234,56`.
///
/// Values are rounded to cents. Negative amounts keep the sign after the
/// symbol (`R$ -10,00`); non-finite input renders as zero.
///
/// # Examples
///
/// ```
/// use painel_normalization::format_currency;
///
/// assert_eq!(format_currency(1234.56), "R$ 1.234,56");
/// assert_eq!(format_currency(0.5), "R$ 0,50");
/// assert_eq!(format_currency(-1000000.0), "R$ -1.000.000,00");
/// ```
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u128;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    let units = group_thousands(cents / 100);
    format!("{CURRENCY_SYMBOL} {sign}{units},{:02}", cents % 100)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
