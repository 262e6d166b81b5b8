//! Week-offset arithmetic.

use chrono::{Datelike, Duration, NaiveDate};

/// The Sunday that starts the week `week_offset` weeks away from the week
/// containing `today`.
///
/// Week offset 0 is the current week; the week starts by rewinding `today`
/// to its Sunday.
#[must_use]
pub fn week_start(today: NaiveDate, week_offset: i64) -> NaiveDate {
    let days_back = today.weekday().num_days_from_sunday() as i64;
    today - Duration::days(days_back) + Duration::weeks(week_offset)
}
