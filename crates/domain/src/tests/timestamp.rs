// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Month;

use super::{date, ts};
use crate::{DomainError, Timestamp, format_date, parse_date};

#[test]
fn test_ledger_format_round_trips() {
    let stamp: Timestamp = ts("2026-04-01 09:30:15");
    assert_eq!(stamp.to_string(), "2026-04-01 09:30:15");
}

#[test]
fn test_iso_separator_is_accepted() {
    assert_eq!(ts("2026-04-01T09:30:15"), ts("2026-04-01 09:30:15"));
}

#[test]
fn test_offset_is_converted_to_utc() {
    assert_eq!(ts("2026-04-01T18:30:15+09:00"), ts("2026-04-01 09:30:15"));
    assert_eq!(ts("2026-04-01T09:30:15.250Z"), ts("2026-04-01 09:30:15"));
}

#[test]
fn test_bare_date_is_midnight() {
    let stamp: Timestamp = ts("2026-04-01");
    assert_eq!(stamp.to_string(), "2026-04-01 00:00:00");
    assert_eq!(stamp.date(), date(2026, Month::April, 1));
}

#[test]
fn test_invalid_timestamp_is_rejected() {
    let result: Result<Timestamp, DomainError> = "yesterday".parse();
    assert!(matches!(result, Err(DomainError::InvalidTimestamp { .. })));
}

#[test]
fn test_parse_date_accepts_timestamp() {
    assert_eq!(
        parse_date("2026-05-10 12:00:00").unwrap(),
        date(2026, Month::May, 10)
    );
    assert!(matches!(
        parse_date("10/05/2026"),
        Err(DomainError::InvalidDate { .. })
    ));
}

#[test]
fn test_format_date() {
    assert_eq!(format_date(date(2026, Month::January, 9)), "2026-01-09");
}

#[test]
fn test_timestamp_serde_uses_ledger_format() {
    let json: String = serde_json::to_string(&ts("2026-04-01T09:30:15")).unwrap();
    assert_eq!(json, "\"2026-04-01 09:30:15\"");
    let back: Timestamp = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ts("2026-04-01 09:30:15"));
}
