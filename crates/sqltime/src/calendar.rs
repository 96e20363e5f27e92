//! Calendar-aware shifting shared by the date and date-time columns.

use chrono::{Datelike, NaiveDate, TimeDelta};

/// Adds years, months and days, normalizing overflow.
///
/// Years and months are added to the month first, the day of month is then
/// counted forward from the first of that month, so excess days roll into the
/// following month (`2018-01-31 + 1 month = 2018-03-03`).
///
/// Returns `None` when the result leaves chrono's range.
pub(crate) fn add_date(date: NaiveDate, years: i32, months: i32, days: i32) -> Option<NaiveDate> {
    let total_months = i64::from(date.year()) * 12
        + i64::from(date.month0())
        + i64::from(years) * 12
        + i64::from(months);
    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month0 = u32::try_from(total_months.rem_euclid(12)).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;

    let offset = TimeDelta::try_days(i64::from(date.day0()) + i64::from(days))?;
    first.checked_add_signed(offset)
}
