//! Diesel mappings for `PostgreSQL` date and timestamp columns
//!
//! `DATE` travels as a big-endian `i32` counting days since 2000-01-01, while
//! `TIMESTAMP` and `TIMESTAMPTZ` travel as a big-endian `i64` counting
//! microseconds since 2000-01-01 00:00:00 UTC. Decoded values go through
//! [`ColumnType::from_column`] so database reads and driver scans normalize
//! the same way. `TEXT` columns are read through the byte-sequence path.

use std::io::Write;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::{Date, Text, Timestamp, Timestamptz};

use crate::column::{ColumnType, ColumnValue};
use crate::constants::{PG_EPOCH_DATE, PG_EPOCH_OFFSET_MICROS};
use crate::date::DateValue;
use crate::date_time::DateTimeValue;
use crate::error::{SqlTimeError, SqlTimeResult};

pub(crate) fn date_from_pg_days(days: i32) -> SqlTimeResult<NaiveDate> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|delta| PG_EPOCH_DATE.checked_add_signed(delta))
        .ok_or(SqlTimeError::OutOfRange)
}

pub(crate) fn pg_days(date: NaiveDate) -> SqlTimeResult<i32> {
    i32::try_from(date.signed_duration_since(PG_EPOCH_DATE).num_days())
        .ok()
        .ok_or(SqlTimeError::OutOfRange)
}

pub(crate) fn timestamp_from_pg_micros(micros: i64) -> SqlTimeResult<DateTime<Utc>> {
    micros
        .checked_add(PG_EPOCH_OFFSET_MICROS)
        .and_then(DateTime::from_timestamp_micros)
        .ok_or(SqlTimeError::OutOfRange)
}

pub(crate) fn pg_micros<Tz: TimeZone>(instant: &DateTime<Tz>) -> SqlTimeResult<i64> {
    instant
        .timestamp_micros()
        .checked_sub(PG_EPOCH_OFFSET_MICROS)
        .ok_or(SqlTimeError::OutOfRange)
}

fn read_days(bytes: &PgValue<'_>) -> deserialize::Result<i32> {
    let raw: [u8; 4] = bytes
        .as_bytes()
        .try_into()
        .ok()
        .ok_or("Invalid DATE byte length")?;
    Ok(i32::from_be_bytes(raw))
}

fn read_instant(bytes: &PgValue<'_>) -> deserialize::Result<ColumnValue> {
    let raw: [u8; 8] = bytes
        .as_bytes()
        .try_into()
        .ok()
        .ok_or("Invalid TIMESTAMP byte length")?;
    let instant = timestamp_from_pg_micros(i64::from_be_bytes(raw))?;
    Ok(ColumnValue::Timestamp(instant.fixed_offset()))
}

fn read_text(bytes: &PgValue<'_>) -> ColumnValue {
    ColumnValue::Bytes(bytes.as_bytes().to_vec())
}

impl FromSql<Date, Pg> for DateValue {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from(date_from_pg_days(read_days(&bytes)?)?))
    }
}

impl ToSql<Date, Pg> for DateValue {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(&pg_days(self.date_naive())?.to_be_bytes())?;
        Ok(IsNull::No)
    }
}

/// Reading a date from a timestamp keeps the UTC calendar day.
impl FromSql<Timestamptz, Pg> for DateValue {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from_column(&read_instant(&bytes)?)?)
    }
}

impl FromSql<Text, Pg> for DateValue {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from_column(&read_text(&bytes))?)
    }
}

impl FromSql<Timestamptz, Pg> for DateTimeValue {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from_column(&read_instant(&bytes)?)?)
    }
}

/// `TIMESTAMP` carries no zone; its wall clock is read as UTC.
impl FromSql<Timestamp, Pg> for DateTimeValue {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from_column(&read_instant(&bytes)?)?)
    }
}

impl FromSql<Text, Pg> for DateTimeValue {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        Ok(Self::from_column(&read_text(&bytes))?)
    }
}

impl ToSql<Timestamptz, Pg> for DateTimeValue {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(&pg_micros(&self.instant())?.to_be_bytes())?;
        Ok(IsNull::No)
    }
}

/// Written as the UTC wall clock, sub-microsecond digits are dropped.
impl ToSql<Timestamp, Pg> for DateTimeValue {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(&pg_micros(&self.instant())?.to_be_bytes())?;
        Ok(IsNull::No)
    }
}
