use chrono::{Datelike, Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;

/// date offset by whole calendar months, day-of-month preserved
///
/// When the target month is shorter the day clamps to its last day.
/// Offsets are always taken from the original date, never iterated, so
/// clamping in one month does not leak into later ones. `None` only on
/// calendar overflow.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// count of full calendar months from `from` to `to`
///
/// A month counts once `to` reaches the same day-of-month as `from`.
/// Negative when `to` precedes `from`.
pub fn full_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months =
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

/// the ledger's business date for the provided clock
pub fn business_date(time: &SafeTimeProvider) -> NaiveDate {
    time.now().date_naive()
}
