// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar date and timestamp conversions.
//!
//! Published dates are stored and compared as `YYYY-MM-DD` text, so the
//! lexical order of the stored value matches the chronological order.
//! Timestamps (update runs) are stored as UTC `YYYY-MM-DD HH:MM:SS`.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::InvalidPublishedDate` if the value is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, DATE_FORMAT).map_err(|_| DomainError::InvalidPublishedDate {
        value: value.to_string(),
    })
}

/// Parses a bill's published value into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 date-times.
/// The time-of-day component, when present, is discarded.
///
/// # Errors
///
/// Returns `DomainError::InvalidPublishedDate` if none of the accepted
/// formats match.
pub fn parse_published(value: &str) -> Result<Date, DomainError> {
    let trimmed: &str = value.trim();

    if let Ok(date) = Date::parse(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(datetime) = PrimitiveDateTime::parse(trimmed, TIMESTAMP_FORMAT) {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(datetime.date());
    }

    Err(DomainError::InvalidPublishedDate {
        value: value.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `DomainError::DateFormatting` if `time` cannot render the date.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(DATE_FORMAT).map_err(|e| DomainError::DateFormatting {
        value: date.to_string(),
        error: e.to_string(),
    })
}

/// Converts a Unix timestamp (seconds) to its UTC calendar date.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the timestamp is outside the
/// representable range.
pub fn date_from_unix_timestamp(timestamp: i64) -> Result<Date, DomainError> {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map(OffsetDateTime::date)
        .map_err(|e| DomainError::InvalidTimestamp {
            value: timestamp.to_string(),
            error: e.to_string(),
        })
}

/// Formats an instant as UTC `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns `DomainError::DateFormatting` if `time` cannot render the instant.
pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, DomainError> {
    let utc: OffsetDateTime = instant.to_offset(UtcOffset::UTC);
    utc.format(TIMESTAMP_FORMAT).map_err(|e| DomainError::DateFormatting {
        value: utc.to_string(),
        error: e.to_string(),
    })
}

/// Parses a UTC `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimestamp` if the value does not match the
/// stored format.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::InvalidTimestamp {
            value: value.to_string(),
            error: e.to_string(),
        })
}
