//! Vigency classification against a reference day.

use chrono::NaiveDate;
use painel_model::Status;

/// Whole days from `today` until `end` (negative once `end` has passed).
pub fn days_until(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days()
}

/// Classifies an end date.
///
/// - `Vencido`: the end date is before `today`
/// - `Próximo do Vencimento`: 0 to `window_days` days remain
/// - `Vigente`: more than `window_days` days remain
///
/// A missing end date has no classification.
pub fn classify_status(
    end: Option<NaiveDate>,
    today: NaiveDate,
    window_days: i64,
) -> Option<Status> {
    let remaining = days_until(end?, today);
    let status = if remaining < 0 {
        Status::Vencido
    } else if remaining <= window_days {
        Status::ProximoDoVencimento
    } else {
        Status::Vigente
    };
    Some(status)
}
