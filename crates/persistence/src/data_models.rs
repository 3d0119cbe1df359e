// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes of the ledger tables and their conversions to domain types.
//!
//! Timestamps, dates and amounts are stored as text in their canonical
//! rendering, so equality filters can compare the stored text directly.

use std::str::FromStr;

use diesel::prelude::*;

use nafuda_domain::{
    AssignmentEntry, AssignmentStatus, EventId, Member, MemberDraft, MemberId, MemberStatus,
    Money, PaymentDefinition, PaymentId, SubmissionEntry, Timestamp, format_date, parse_date,
};

use crate::diesel_schema::{assigned_payments, members, payments, submitted_payments};
use crate::error::PersistenceError;

/// Result of registering a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRegistration {
    pub member_id: MemberId,
    /// The registration matched an existing member, whose id is returned.
    pub duplicate: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MemberRow {
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rank_type: String,
    pub rank_number: String,
    pub zekken_text: String,
    pub status: String,
    pub fingerprint: String,
}

impl MemberRow {
    pub fn from_draft(member_id: MemberId, draft: &MemberDraft) -> Self {
        Self {
            member_id: member_id.value(),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_lowercase(),
            rank_type: draft.rank_type.trim().to_string(),
            rank_number: draft.rank_number.trim().to_string(),
            zekken_text: draft.zekken_text.trim().to_string(),
            status: draft.status.as_str().to_string(),
            fingerprint: draft.fingerprint(),
        }
    }

    pub fn into_domain(self) -> Result<Member, PersistenceError> {
        Ok(Member {
            member_id: MemberId::new(self.member_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            rank_type: self.rank_type,
            rank_number: self.rank_number,
            zekken_text: self.zekken_text,
            status: MemberStatus::from_str(&self.status)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentRow {
    pub payment_id: i64,
    pub title: String,
    pub created_at: String,
    pub due_date: String,
    pub payment_value: String,
    pub overdue_penalty: String,
    pub event_id: Option<i64>,
}

impl PaymentRow {
    pub fn from_domain(payment: &PaymentDefinition) -> Self {
        Self {
            payment_id: payment.payment_id.value(),
            title: payment.title.clone(),
            created_at: payment.created_at.to_string(),
            due_date: format_date(payment.due_date),
            payment_value: payment.payment_value.to_string(),
            overdue_penalty: payment.overdue_penalty.to_string(),
            event_id: payment.event_id.map(EventId::value),
        }
    }

    pub fn into_domain(self) -> Result<PaymentDefinition, PersistenceError> {
        Ok(PaymentDefinition {
            payment_id: PaymentId::new(self.payment_id),
            title: self.title,
            created_at: Timestamp::from_str(&self.created_at)?,
            due_date: parse_date(&self.due_date)?,
            payment_value: Money::from_str(&self.payment_value)?,
            overdue_penalty: Money::from_str(&self.overdue_penalty)?,
            event_id: self.event_id.map(EventId::new),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = assigned_payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssignmentRow {
    pub member_id: i64,
    pub payment_id: i64,
    pub status: String,
    pub assigned_on: String,
}

impl AssignmentRow {
    pub fn from_domain(entry: &AssignmentEntry) -> Self {
        Self {
            member_id: entry.member_id.value(),
            payment_id: entry.payment_id.value(),
            status: entry.status.as_str().to_string(),
            assigned_on: entry.assigned_on.to_string(),
        }
    }

    pub fn into_domain(self) -> Result<AssignmentEntry, PersistenceError> {
        Ok(AssignmentEntry {
            member_id: MemberId::new(self.member_id),
            payment_id: PaymentId::new(self.payment_id),
            status: AssignmentStatus::from_str(&self.status)?,
            assigned_on: Timestamp::from_str(&self.assigned_on)?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submitted_payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubmissionRow {
    pub member_id: i64,
    pub payment_id: i64,
    pub assigned_on: String,
    pub submitted_on: String,
    pub overdue: i32,
    pub total_paid: String,
}

impl SubmissionRow {
    pub fn from_domain(entry: &SubmissionEntry) -> Self {
        Self {
            member_id: entry.member_id.value(),
            payment_id: entry.payment_id.value(),
            assigned_on: entry.assigned_on.to_string(),
            submitted_on: entry.submitted_on.to_string(),
            overdue: i32::from(entry.overdue),
            total_paid: entry.total_paid.to_string(),
        }
    }

    pub fn into_domain(self) -> Result<SubmissionEntry, PersistenceError> {
        Ok(SubmissionEntry {
            payment_id: PaymentId::new(self.payment_id),
            member_id: MemberId::new(self.member_id),
            assigned_on: Timestamp::from_str(&self.assigned_on)?,
            submitted_on: Timestamp::from_str(&self.submitted_on)?,
            overdue: self.overdue != 0,
            total_paid: Money::from_str(&self.total_paid)?,
        })
    }
}

/// Converts a batch of rows, failing on the first row that does not parse.
pub fn rows_into_domain<R, T>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, PersistenceError>,
) -> Result<Vec<T>, PersistenceError> {
    rows.into_iter().map(convert).collect()
}
