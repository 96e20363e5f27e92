//! Driver-facing column values.
//!
//! ## Summary
//! A database driver hands over column values of a handful of shapes. The
//! column types in this crate accept only a native timestamp or a raw byte
//! sequence and reject everything else, so the shapes are modeled as a closed
//! enum instead of an opaque value.

use chrono::{DateTime, FixedOffset};

use crate::error::SqlTimeResult;

/// Value of a single column as delivered by (or handed to) a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<FixedOffset>),
}

impl ColumnValue {
    /// Short name of the variant, used in error messages and trace events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

/// A type that can be read from and written to a database column.
pub trait ColumnType: Sized {
    /// ## Summary
    /// Decodes a value from a driver column.
    ///
    /// ## Errors
    /// Returns `InvalidValueType` when the column shape is not supported, or the
    /// `LayoutMismatch` or parse error of a malformed byte sequence.
    fn from_column(value: &ColumnValue) -> SqlTimeResult<Self>;

    /// Encodes the value for the driver.
    fn to_column(&self) -> ColumnValue;

    /// ## Summary
    /// Decodes `value` into `self`. On failure `self` is left untouched.
    ///
    /// ## Errors
    /// Same as [`ColumnType::from_column`].
    fn scan(&mut self, value: &ColumnValue) -> SqlTimeResult<()> {
        *self = Self::from_column(value)?;
        Ok(())
    }
}

/// Nullable columns map `NULL` to `None`.
impl<T: ColumnType> ColumnType for Option<T> {
    fn from_column(value: &ColumnValue) -> SqlTimeResult<Self> {
        match value {
            ColumnValue::Null => Ok(None),
            other => T::from_column(other).map(Some),
        }
    }

    fn to_column(&self) -> ColumnValue {
        self.as_ref().map_or(ColumnValue::Null, ColumnType::to_column)
    }
}
