// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! UTC timestamps and calendar dates as they appear on the ledger.
//!
//! Every timestamp is stored and rendered as `YYYY-MM-DD HH:MM:SS` in UTC.
//! Parsing is more forgiving: ISO-8601 with a `T` separator, RFC 3339 with
//! an offset (converted to UTC) and bare dates (taken as midnight) are all
//! accepted.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::DomainError;

const LEDGER_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const ISO_LOCAL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A UTC instant with one-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    /// Wraps a date-time that is already known to be UTC.
    #[must_use]
    pub const fn from_utc(value: PrimitiveDateTime) -> Self {
        Self(value)
    }

    /// Converts an offset-aware instant to UTC and truncates sub-second precision.
    #[must_use]
    pub fn from_offset(value: OffsetDateTime) -> Self {
        let utc: OffsetDateTime = value.to_offset(UtcOffset::UTC);
        let time: Time = utc.time().replace_nanosecond(0).unwrap_or(Time::MIDNIGHT);
        Self(PrimitiveDateTime::new(utc.date(), time))
    }

    /// The current wall-clock time in UTC.
    #[must_use]
    pub fn now_utc() -> Self {
        Self::from_offset(OffsetDateTime::now_utc())
    }

    /// Midnight at the start of `date`.
    #[must_use]
    pub const fn start_of(date: Date) -> Self {
        Self(PrimitiveDateTime::new(date, Time::MIDNIGHT))
    }

    #[must_use]
    pub const fn date(&self) -> Date {
        self.0.date()
    }

    #[must_use]
    pub const fn value(&self) -> PrimitiveDateTime {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.format(LEDGER_FORMAT) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

impl FromStr for Timestamp {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input: &str = s.trim();

        if let Ok(value) = PrimitiveDateTime::parse(input, LEDGER_FORMAT) {
            return Ok(Self(value));
        }
        if let Ok(value) = PrimitiveDateTime::parse(input, ISO_LOCAL_FORMAT) {
            return Ok(Self(value));
        }
        if let Ok(value) = OffsetDateTime::parse(input, &Rfc3339) {
            return Ok(Self::from_offset(value));
        }

        Date::parse(input, DATE_FORMAT)
            .map(Self::start_of)
            .map_err(|e| DomainError::InvalidTimestamp {
                input: s.to_string(),
                error: e.to_string(),
            })
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// A full timestamp is also accepted; its date part is kept.
///
/// # Errors
///
/// Returns an error if the input is neither a date nor a timestamp.
pub fn parse_date(input: &str) -> Result<Date, DomainError> {
    let trimmed: &str = input.trim();
    Date::parse(trimmed, DATE_FORMAT)
        .or_else(|date_err| {
            Timestamp::from_str(trimmed)
                .map(|ts| ts.date())
                .map_err(|_| date_err)
        })
        .map_err(|e| DomainError::InvalidDate {
            input: input.to_string(),
            error: e.to_string(),
        })
}

/// Renders a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
