// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod assignment_tests;
mod counter_tests;
mod initialization_tests;
mod lifecycle_tests;

use time::{Date, Month};

use nafuda::FixedClock;
use nafuda_domain::{
    MemberDraft, MemberId, MemberStatus, Money, PaymentDefinition, PaymentDraft, PaymentId,
    Timestamp,
};

use crate::Persistence;

pub fn ts(text: &str) -> Timestamp {
    text.parse().unwrap()
}

pub fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap()
}

pub fn create_test_clock() -> FixedClock {
    FixedClock(ts("2026-02-10 12:00:00"))
}

pub fn create_test_member_draft(first_name: &str, status: MemberStatus) -> MemberDraft {
    MemberDraft {
        first_name: first_name.to_string(),
        last_name: String::from("Tanaka"),
        email: format!("{}@example.com", first_name.to_lowercase()),
        rank_type: String::from("Kyu"),
        rank_number: String::from("3"),
        zekken_text: String::new(),
        status,
    }
}

pub fn register(persistence: &mut Persistence, first_name: &str, status: MemberStatus) -> MemberId {
    persistence
        .register_member(&create_test_member_draft(first_name, status))
        .unwrap()
        .member_id
}

pub fn create_test_payment(payment_id: i64, due_date: Date) -> PaymentDefinition {
    PaymentDefinition {
        payment_id: PaymentId::new(payment_id),
        title: format!("Dues {payment_id}"),
        created_at: ts("2026-01-05 09:30:00"),
        due_date,
        payment_value: Money::from_cents(4500),
        overdue_penalty: Money::from_cents(1000),
        event_id: None,
    }
}

pub fn create_test_draft(due_date: Date) -> PaymentDraft {
    PaymentDraft {
        title: String::from("Federation Dues 2026"),
        created_at: None,
        due_date,
        payment_value: Money::from_cents(6000),
        overdue_penalty: Some(Money::from_cents(1500)),
        event_id: None,
    }
}
