//! Value normalization for spreadsheet cells.
//!
//! Published spreadsheets carry localized text: `R$ 1.234,56` currency,
//! `31/01/2025` dates and classification codes mangled into floats
//! (`33903900.0`). This crate turns those into canonical values and back
//! into display strings:
//!
//! - **currency**: parse and format Brazilian-real amounts
//! - **date**: day-first date parsing and display
//! - **code**: zero-padded classification codes
//! - **status**: vigency classification from an end date
//!
//! Every parser degrades to a safe default instead of failing.

pub mod code;
pub mod currency;
pub mod date;
pub mod status;

pub use code::pad_code;
pub use currency::{CURRENCY_SYMBOL, RawCell, format_currency, parse_currency, parse_currency_cell};
pub use date::{format_date, parse_date};
pub use status::{classify_status, days_until};
