//! Text layouts and sentinel bounds shared by the column types.

use chrono::{NaiveDate, NaiveDateTime};

/// `YYYY-MM-DD`
pub const DATE_LAYOUT: &str = "%Y-%m-%d";
/// `HH:MM:SS` with an optional fractional part when parsing
pub const TIME_LAYOUT: &str = "%H:%M:%S%.f";
/// Layout of date-time columns delivered as raw bytes
pub const DATE_TIME_LAYOUT: &str = const_str::concat!(DATE_LAYOUT, " ", TIME_LAYOUT);

/// Exact character shape of date text; letters stand for ASCII digits.
pub const DATE_SHAPE: &str = "YYYY-MM-DD";
/// Exact character shape of date-time column bytes before the optional fraction.
pub const DATE_TIME_SHAPE: &str = const_str::concat!(DATE_SHAPE, " ", "HH:MM:SS");
/// Wall clock part of RFC 3339 text, the fraction and offset are appended separately.
pub const RFC3339_SECONDS_LAYOUT: &str = const_str::concat!(DATE_LAYOUT, "T", "%H:%M:%S");

/// Smallest date a `DATE` column is expected to hold.
pub const MIN_DATE: NaiveDate = ymd(1000, 1, 1);
/// Largest date a `DATE` column is expected to hold.
pub const MAX_DATE: NaiveDate = ymd(9999, 12, 31);
/// Value of a date that was never set.
pub const ZERO_DATE: NaiveDate = ymd(1, 1, 1);

/// Day zero of the `PostgreSQL` binary date and timestamp formats.
pub const PG_EPOCH_DATE: NaiveDate = ymd(2000, 1, 1);
/// Microseconds between the Unix epoch and [`PG_EPOCH_DATE`].
pub const PG_EPOCH_OFFSET_MICROS: i64 = 946_684_800_000_000;

pub const MIN_DATE_TIME: NaiveDateTime = ymd_hms_micro(MIN_DATE, 0, 0, 0, 0);
pub const MAX_DATE_TIME: NaiveDateTime = ymd_hms_micro(MAX_DATE, 23, 59, 59, 999_999);
pub const ZERO_DATE_TIME: NaiveDateTime = ymd_hms_micro(ZERO_DATE, 0, 0, 0, 0);

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("sentinel date out of range"),
    }
}

const fn ymd_hms_micro(date: NaiveDate, hour: u32, min: u32, sec: u32, micro: u32) -> NaiveDateTime {
    match date.and_hms_micro_opt(hour, min, sec, micro) {
        Some(date_time) => date_time,
        None => panic!("sentinel time out of range"),
    }
}
