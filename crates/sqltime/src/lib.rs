//! Date and date-time column types for Diesel on `PostgreSQL`.
//!
//! ## Summary
//! [`DateValue`] and [`DateTimeValue`] wrap chrono values so they can be
//! stored in `DATE` and `TIMESTAMP[TZ]` columns, scanned from raw driver
//! values, and exchanged as text (`YYYY-MM-DD` and RFC 3339 respectively).

mod calendar;
pub mod column;
pub mod constants;
pub mod date;
pub mod date_time;
pub mod error;
mod layout;
mod pg_types;

pub use column::{ColumnType, ColumnValue};
pub use date::DateValue;
pub use date_time::DateTimeValue;
pub use error::{SqlTimeError, SqlTimeResult};
