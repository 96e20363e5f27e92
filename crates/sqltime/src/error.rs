use thiserror::Error;

/// Errors raised while constructing, decoding or shifting date values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlTimeError {
    /// A column value was neither a native timestamp nor a byte sequence.
    #[error("invalid value type: {0}")]
    InvalidValueType(&'static str),

    #[error("parse error: {0}")]
    ParseError(#[from] chrono::ParseError),

    /// Text that chrono would accept leniently but that is not in the exact column shape.
    #[error("text does not match {0}")]
    LayoutMismatch(&'static str),

    #[error("column bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("out of range")]
    OutOfRange,

    #[error("rounding error: {0}")]
    RoundingError(#[from] chrono::RoundingError),
}

pub type SqlTimeResult<T> = std::result::Result<T, SqlTimeError>;
