//! Date-time column type.
//!
//! ## Summary
//! [`DateTimeValue`] keeps a full instant together with the UTC offset it was
//! created with. Nothing is normalized: equality, ordering and hashing compare
//! the absolute instant, while the offset only affects the calendar and clock
//! accessors and the text form.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, RoundingError, TimeDelta,
    TimeZone, Timelike, Utc, Weekday,
};
use diesel::sql_types::{Timestamp, Timestamptz};
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar;
use crate::column::{ColumnType, ColumnValue};
use crate::constants::{
    DATE_TIME_LAYOUT, MAX_DATE_TIME, MIN_DATE_TIME, RFC3339_SECONDS_LAYOUT, ZERO_DATE_TIME,
};
use crate::error::{SqlTimeError, SqlTimeResult};
use crate::layout;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Instant persisted in a `TIMESTAMP`/`TIMESTAMPTZ` column and encoded as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Timestamptz)]
#[diesel(sql_type = Timestamp)]
pub struct DateTimeValue(DateTime<FixedOffset>);

impl DateTimeValue {
    /// ## Summary
    /// Creates the instant whose wall clock in `tz` reads the given components.
    ///
    /// An ambiguous wall clock (a repeated hour at the end of daylight saving
    /// time) resolves to the earlier instant.
    ///
    /// ## Errors
    /// Returns `OutOfRange` if the components are invalid or the wall clock does
    /// not exist in `tz`.
    #[expect(clippy::too_many_arguments)]
    pub fn new<Tz: TimeZone>(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nano: u32,
        tz: &Tz,
    ) -> SqlTimeResult<Self> {
        let local = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nano))
            .ok_or(SqlTimeError::OutOfRange)?;
        tz.from_local_datetime(&local)
            .earliest()
            .map(Self::from_datetime)
            .ok_or(SqlTimeError::OutOfRange)
    }

    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self(instant.fixed_offset())
    }

    #[must_use]
    pub fn min_value() -> Self {
        Self(MIN_DATE_TIME.and_utc().fixed_offset())
    }

    /// `9999-12-31T23:59:59.999999Z`, the last microsecond a column can hold.
    #[must_use]
    pub fn max_value() -> Self {
        Self(MAX_DATE_TIME.and_utc().fixed_offset())
    }

    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    #[must_use]
    pub fn now_in<Tz: TimeZone>(tz: &Tz) -> Self {
        Self::from_datetime(Utc::now().with_timezone(tz))
    }

    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    #[must_use]
    pub const fn instant(self) -> DateTime<FixedOffset> {
        self.0
    }

    /// ## Summary
    /// Rounds to the nearest multiple of `delta` since the Unix epoch, measured
    /// on the absolute instant. Halfway values round up. The offset is kept.
    ///
    /// ## Errors
    /// Returns `RoundingError` if `delta` is not positive, `OutOfRange` if the
    /// rounded instant cannot be represented.
    pub fn round(self, delta: TimeDelta) -> SqlTimeResult<Self> {
        let step = step_nanos(delta)?;
        let nanos = self.epoch_nanos();
        let remainder = nanos.rem_euclid(step);
        let below = nanos - remainder;
        if remainder * 2 >= step {
            self.with_epoch_nanos(below + step)
        } else {
            self.with_epoch_nanos(below)
        }
    }

    /// ## Summary
    /// Rounds towards the past to a multiple of `delta`, counted like
    /// [`Self::round`].
    ///
    /// ## Errors
    /// Same as [`Self::round`].
    pub fn truncate(self, delta: TimeDelta) -> SqlTimeResult<Self> {
        let step = step_nanos(delta)?;
        let nanos = self.epoch_nanos();
        self.with_epoch_nanos(nanos - nanos.rem_euclid(step))
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn unix(self) -> i64 {
        self.0.timestamp()
    }

    /// Nanoseconds since the Unix epoch, `None` outside roughly 1677..=2262.
    #[must_use]
    pub fn unix_nano(self) -> Option<i64> {
        self.0.timestamp_nanos_opt()
    }

    /// ## Summary
    /// Shifts the local calendar date by whole years, months and days, keeping
    /// the wall clock and offset. Overflowing days roll into the next month as
    /// in [`DateValue::add_date`](crate::DateValue::add_date).
    ///
    /// ## Errors
    /// Returns `OutOfRange` if the result cannot be represented.
    pub fn add_date(self, years: i32, months: i32, days: i32) -> SqlTimeResult<Self> {
        let local = self.0.naive_local();
        calendar::add_date(local.date(), years, months, days)
            .and_then(|date| {
                self.0
                    .offset()
                    .from_local_datetime(&date.and_time(local.time()))
                    .single()
            })
            .map(Self)
            .ok_or(SqlTimeError::OutOfRange)
    }

    /// ## Errors
    /// Returns `OutOfRange` if the result cannot be represented.
    pub fn add_duration(self, delta: TimeDelta) -> SqlTimeResult<Self> {
        self.0
            .checked_add_signed(delta)
            .map(Self)
            .ok_or(SqlTimeError::OutOfRange)
    }

    #[must_use]
    pub fn signed_duration_since(self, other: Self) -> TimeDelta {
        self.0.signed_duration_since(other.0)
    }

    #[must_use]
    pub fn offset(self) -> FixedOffset {
        *self.0.offset()
    }

    /// Same instant, shown in the system time zone.
    #[must_use]
    pub fn local(self) -> Self {
        Self::from_datetime(self.0.with_timezone(&Local))
    }

    #[must_use]
    pub fn utc(self) -> Self {
        Self::from_datetime(self.0.with_timezone(&Utc))
    }

    /// Same instant, shown in `tz`.
    #[must_use]
    pub fn in_timezone<Tz: TimeZone>(self, tz: &Tz) -> Self {
        Self::from_datetime(self.0.with_timezone(tz))
    }

    /// Whether this is the unset instant `0001-01-01T00:00:00Z`, in any offset.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.naive_utc() == ZERO_DATE_TIME
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

    #[must_use]
    pub fn iso_week(self) -> (i32, u32) {
        let week = self.0.iso_week();
        (week.year(), week.week())
    }

    #[must_use]
    pub fn year_day(self) -> u32 {
        self.0.ordinal()
    }

    /// Hour, minute and second of the local wall clock.
    #[must_use]
    pub fn clock(self) -> (u32, u32, u32) {
        (self.0.hour(), self.0.minute(), self.0.second())
    }

    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    #[must_use]
    pub fn second(self) -> u32 {
        self.0.second()
    }

    #[must_use]
    pub fn nanosecond(self) -> u32 {
        self.0.nanosecond()
    }

    fn epoch_nanos(self) -> i128 {
        i128::from(self.0.timestamp()) * NANOS_PER_SECOND
            + i128::from(self.0.timestamp_subsec_nanos())
    }

    fn with_epoch_nanos(self, nanos: i128) -> SqlTimeResult<Self> {
        let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).ok();
        let subsec = u32::try_from(nanos.rem_euclid(NANOS_PER_SECOND)).ok();
        secs.zip(subsec)
            .and_then(|(secs, subsec)| DateTime::from_timestamp(secs, subsec))
            .map(|instant| Self(instant.with_timezone(self.0.offset())))
            .ok_or(SqlTimeError::OutOfRange)
    }

    fn parse_column_text(text: &str) -> SqlTimeResult<Self> {
        layout::check_date_time(text)?;
        let naive = NaiveDateTime::parse_from_str(text, DATE_TIME_LAYOUT)?;
        Ok(Self::from_datetime(naive.and_utc()))
    }
}

fn step_nanos(delta: TimeDelta) -> SqlTimeResult<i128> {
    let step =
        i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos());
    if step > 0 {
        Ok(step)
    } else {
        Err(SqlTimeError::RoundingError(RoundingError::DurationExceedsLimit))
    }
}

impl Default for DateTimeValue {
    fn default() -> Self {
        Self(ZERO_DATE_TIME.and_utc().fixed_offset())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateTimeValue {
    fn from(instant: DateTime<Tz>) -> Self {
        Self::from_datetime(instant)
    }
}

impl From<DateTimeValue> for DateTime<FixedOffset> {
    fn from(value: DateTimeValue) -> Self {
        value.0
    }
}

impl Sub for DateTimeValue {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> TimeDelta {
        self.signed_duration_since(rhs)
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RFC3339_SECONDS_LAYOUT))?;
        let nanos = self.0.nanosecond() % 1_000_000_000;
        if nanos != 0 {
            let digits = format!("{nanos:09}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        if self.0.offset().local_minus_utc() == 0 {
            f.write_str("Z")
        } else {
            write!(f, "{}", self.0.format("%:z"))
        }
    }
}

impl FromStr for DateTimeValue {
    type Err = SqlTimeError;

    fn from_str(s: &str) -> SqlTimeResult<Self> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?))
    }
}

impl Serialize for DateTimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTimeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl ColumnType for DateTimeValue {
    fn from_column(value: &ColumnValue) -> SqlTimeResult<Self> {
        tracing::trace!(kind = value.kind(), "decoding date-time column");
        match value {
            ColumnValue::Timestamp(instant) => Ok(Self(*instant)),
            ColumnValue::Bytes(bytes) => Self::parse_column_text(std::str::from_utf8(bytes)?),
            other => Err(SqlTimeError::InvalidValueType(other.kind())),
        }
    }

    fn to_column(&self) -> ColumnValue {
        ColumnValue::Timestamp(self.0)
    }
}
