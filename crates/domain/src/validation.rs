// Copyright (C) 2026 CampTrack Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date parsing, formatting, and range validation.
//!
//! Calendar dates are stored as `YYYY-MM-DD` text; timestamps as RFC 3339
//! text. Both round-trip losslessly through these helpers.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns an error if the string is not a valid date in that format.
pub fn parse_date(s: &str) -> Result<Date, DomainError> {
    Date::parse(s, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: s.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(DATE_FORMAT)
        .map_err(|e| DomainError::DateFormatError {
            error: e.to_string(),
        })
}

/// Parses an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the string is not a valid RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(s, &Rfc3339).map_err(|e| DomainError::DateParseError {
        date_string: s.to_string(),
        error: e.to_string(),
    })
}

/// Formats a timestamp as RFC 3339.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, DomainError> {
    ts.format(&Rfc3339).map_err(|e| DomainError::DateFormatError {
        error: e.to_string(),
    })
}

/// Validates that a campaign date range is well-formed.
///
/// # Errors
///
/// Returns an error unless `end > start`.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), DomainError> {
    if end > start {
        Ok(())
    } else {
        Err(DomainError::EndDateNotAfterStart { start, end })
    }
}

/// Inclusive interval overlap: `a_start <= b_end AND a_end >= b_start`.
#[must_use]
pub fn ranges_overlap(a_start: Date, a_end: Date, b_start: Date, b_end: Date) -> bool {
    a_start <= b_end && a_end >= b_start
}
