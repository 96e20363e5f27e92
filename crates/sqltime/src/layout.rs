//! Exact shape checks run before handing text to chrono.
//!
//! chrono's `%Y`, `%m` and `%d` accept signs, short years and unpadded
//! fields; the column formats do not.

use crate::constants::{DATE_SHAPE, DATE_TIME_SHAPE};
use crate::error::{SqlTimeError, SqlTimeResult};

fn matches_shape(text: &[u8], shape: &str) -> bool {
    text.len() == shape.len()
        && text.iter().zip(shape.bytes()).all(|(&c, s)| {
            if s.is_ascii_alphabetic() {
                c.is_ascii_digit()
            } else {
                c == s
            }
        })
}

/// Requires `YYYY-MM-DD`.
pub(crate) fn check_date(text: &str) -> SqlTimeResult<()> {
    if matches_shape(text.as_bytes(), DATE_SHAPE) {
        Ok(())
    } else {
        Err(SqlTimeError::LayoutMismatch(DATE_SHAPE))
    }
}

/// Requires `YYYY-MM-DD HH:MM:SS` followed by nothing or `.` and one to nine digits.
pub(crate) fn check_date_time(text: &str) -> SqlTimeResult<()> {
    const MISMATCH: SqlTimeError = SqlTimeError::LayoutMismatch(DATE_TIME_SHAPE);

    let (head, fraction) = text
        .as_bytes()
        .split_at_checked(DATE_TIME_SHAPE.len())
        .ok_or(MISMATCH)?;
    if !matches_shape(head, DATE_TIME_SHAPE) {
        return Err(MISMATCH);
    }
    match fraction {
        [] => Ok(()),
        [b'.', digits @ ..] if (1..=9).contains(&digits.len()) && digits.iter().all(u8::is_ascii_digit) => {
            Ok(())
        }
        _ => Err(MISMATCH),
    }
}
