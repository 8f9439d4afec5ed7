//! Epoch-day arithmetic on top of `chrono::NaiveDate`.

use chrono::{Datelike, Months, NaiveDate};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// 0001-01-01, the earliest date a lease may start on.
pub const MIN_SUPPORTED_EPOCH_DAY: i64 = -719_162;
/// 9999-12-31, the latest date a lease may start on.
pub const MAX_SUPPORTED_EPOCH_DAY: i64 = 2_932_896;

/// Whether `epoch_day` is a date whose anniversaries can all be computed.
pub fn is_supported_epoch_day(epoch_day: i64) -> bool {
    (MIN_SUPPORTED_EPOCH_DAY..=MAX_SUPPORTED_EPOCH_DAY).contains(&epoch_day)
}

pub fn date_from_epoch_day(epoch_day: i64) -> Option<NaiveDate> {
    let days = epoch_day.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(days).ok()?)
}

pub fn epoch_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Number of complete calendar years from `start` to `end`, assuming `start <= end`.
///
/// A year is complete once `end` reaches the month and day of `start`.
pub fn whole_years_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut years = end.year() - start.year();
    if (end.month(), end.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Shifts `date` by whole years. 29 February lands on 28 February in common years.
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years.checked_mul(12)?))
}
