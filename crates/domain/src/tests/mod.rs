// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod timestamp;

use time::Date;

use crate::{EventId, Money, PaymentDefinition, PaymentId, Timestamp};

pub fn ts(text: &str) -> Timestamp {
    text.parse().unwrap()
}

pub fn date(year: i32, month: time::Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap()
}

pub fn create_test_payment(value_cents: i64, penalty_cents: i64) -> PaymentDefinition {
    PaymentDefinition {
        payment_id: PaymentId::new(7),
        title: String::from("Spring Dues"),
        created_at: ts("2026-01-01 00:00:00"),
        due_date: date(2026, time::Month::March, 1),
        payment_value: Money::from_cents(value_cents),
        overdue_penalty: Money::from_cents(penalty_cents),
        event_id: Some(EventId::new(3)),
    }
}
