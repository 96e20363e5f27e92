//! Date-only column type.
//!
//! ## Summary
//! [`DateValue`] stores a calendar day and stands for the instant at UTC
//! midnight of that day. Every constructor normalizes its input by dropping the
//! time of day and keeping the calendar date, so two values compare equal
//! exactly when they name the same day.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use diesel::sql_types::Date;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar;
use crate::column::{ColumnType, ColumnValue};
use crate::constants::{DATE_LAYOUT, MAX_DATE, MIN_DATE, ZERO_DATE};
use crate::error::{SqlTimeError, SqlTimeResult};
use crate::layout;

/// Calendar date persisted in a `DATE` column and encoded as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Date)]
pub struct DateValue(NaiveDate);

impl DateValue {
    /// ## Summary
    /// Creates the date `year-month-day` as a calendar day in `tz`.
    ///
    /// The day starts at local midnight in `tz`. Normalization keeps the
    /// calendar date, so the result is the same day in every zone, including
    /// zones where a DST transition skips midnight.
    ///
    /// ## Errors
    /// Returns `OutOfRange` if the components do not name a real day.
    pub fn new<Tz: TimeZone>(year: i32, month: u32, day: u32, tz: &Tz) -> SqlTimeResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(SqlTimeError::OutOfRange)?;
        Ok(tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .map_or(Self(date), |midnight| Self::from_datetime(&midnight)))
    }

    /// ## Summary
    /// Keeps the calendar date of `instant` as seen in its own zone.
    ///
    /// `2018-08-21T01:00:00+09:00` becomes `2018-08-21` even though the same
    /// instant is still `2018-08-20` in UTC. Convert to UTC first when the UTC
    /// day is the one that matters.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.date_naive())
    }

    #[must_use]
    pub const fn min_value() -> Self {
        Self(MIN_DATE)
    }

    #[must_use]
    pub const fn max_value() -> Self {
        Self(MAX_DATE)
    }

    /// Current date in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Current date in `tz`.
    #[must_use]
    pub fn today_in<Tz: TimeZone>(tz: &Tz) -> Self {
        Self::from_datetime(&Utc::now().with_timezone(tz))
    }

    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    /// UTC midnight of this date.
    #[must_use]
    pub fn instant(self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    #[must_use]
    pub const fn date_naive(self) -> NaiveDate {
        self.0
    }

    /// ## Summary
    /// Shifts the date by whole years, months and days.
    ///
    /// Overflowing days roll into the next month, so
    /// `2018-01-31 + 1 month` is `2018-03-03` and
    /// `2016-12-31 + 1 year 2 months 4 days` is `2018-03-07`.
    ///
    /// ## Errors
    /// Returns `OutOfRange` if the result cannot be represented.
    pub fn add_date(self, years: i32, months: i32, days: i32) -> SqlTimeResult<Self> {
        calendar::add_date(self.0, years, months, days)
            .map(Self)
            .ok_or(SqlTimeError::OutOfRange)
    }

    /// ## Summary
    /// Adds `delta` to the UTC midnight instant and normalizes the result back
    /// to a date. Anything short of a full day forward is dropped, while any
    /// negative delta moves to the previous day at least.
    ///
    /// ## Errors
    /// Returns `OutOfRange` if the result cannot be represented.
    pub fn add_duration(self, delta: TimeDelta) -> SqlTimeResult<Self> {
        self.instant()
            .checked_add_signed(delta)
            .map(|instant| Self::from_datetime(&instant))
            .ok_or(SqlTimeError::OutOfRange)
    }

    /// Duration between the two UTC midnights.
    #[must_use]
    pub fn signed_duration_since(self, other: Self) -> TimeDelta {
        self.0.signed_duration_since(other.0)
    }

    /// Whether this is the unset date `0001-01-01`.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == ZERO_DATE
    }

    #[must_use]
    pub fn ymd(self) -> (i32, u32, u32) {
        (self.0.year(), self.0.month(), self.0.day())
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// ISO 8601 week-numbering year and week.
    #[must_use]
    pub fn iso_week(self) -> (i32, u32) {
        let week = self.0.iso_week();
        (week.year(), week.week())
    }

    /// Day of the year, starting at 1.
    #[must_use]
    pub fn year_day(self) -> u32 {
        self.0.ordinal()
    }

    fn parse(text: &str) -> SqlTimeResult<Self> {
        layout::check_date(text)?;
        Ok(Self(NaiveDate::parse_from_str(text, DATE_LAYOUT)?))
    }
}

impl Default for DateValue {
    fn default() -> Self {
        Self(ZERO_DATE)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<DateValue> for NaiveDate {
    fn from(value: DateValue) -> Self {
        value.0
    }
}

impl Sub for DateValue {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> TimeDelta {
        self.signed_duration_since(rhs)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_LAYOUT))
    }
}

impl FromStr for DateValue {
    type Err = SqlTimeError;

    fn from_str(s: &str) -> SqlTimeResult<Self> {
        Self::parse(s)
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl ColumnType for DateValue {
    fn from_column(value: &ColumnValue) -> SqlTimeResult<Self> {
        tracing::trace!(kind = value.kind(), "decoding date column");
        match value {
            ColumnValue::Timestamp(instant) => Ok(Self::from_datetime(instant)),
            ColumnValue::Bytes(bytes) => Self::parse(std::str::from_utf8(bytes)?),
            other => Err(SqlTimeError::InvalidValueType(other.kind())),
        }
    }

    fn to_column(&self) -> ColumnValue {
        ColumnValue::Timestamp(self.instant().fixed_offset())
    }
}
