// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

use crate::timestamp::Timestamp;
use crate::types::{AssignmentStatus, EventId, Money, PaymentId};

/// A payment that members can be billed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDefinition {
    pub payment_id: PaymentId,
    pub title: String,
    pub created_at: Timestamp,
    pub due_date: Date,
    pub payment_value: Money,
    pub overdue_penalty: Money,
    pub event_id: Option<EventId>,
}

impl PaymentDefinition {
    /// Whether an assignment of this payment is late as of `today`.
    ///
    /// The due date itself is still on time.
    #[must_use]
    pub fn is_past_due(&self, today: Date) -> bool {
        self.due_date < today
    }

    /// Amount owed for an assignment in the given status.
    #[must_use]
    pub fn amount_owed(&self, status: AssignmentStatus) -> Money {
        match status {
            AssignmentStatus::Due => self.payment_value,
            AssignmentStatus::Overdue => self.payment_value.saturating_add(self.overdue_penalty),
        }
    }

    /// Applies a partial update in place. Absent fields are left untouched.
    pub fn apply(&mut self, changes: &PaymentChanges) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(created_at) = changes.created_at {
            self.created_at = created_at;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(value) = changes.payment_value {
            self.payment_value = value;
        }
        if let Some(penalty) = changes.overdue_penalty {
            self.overdue_penalty = penalty;
        }
        if let Some(event_id) = changes.event_id {
            self.event_id = Some(event_id);
        }
    }
}

/// A payment definition awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    pub title: String,
    /// Defaults to the creation instant when absent.
    pub created_at: Option<Timestamp>,
    pub due_date: Date,
    pub payment_value: Money,
    /// Defaults to `$0.00` when absent.
    pub overdue_penalty: Option<Money>,
    pub event_id: Option<EventId>,
}

impl PaymentDraft {
    #[must_use]
    pub fn into_definition(self, payment_id: PaymentId, now: Timestamp) -> PaymentDefinition {
        PaymentDefinition {
            payment_id,
            title: self.title,
            created_at: self.created_at.unwrap_or(now),
            due_date: self.due_date,
            payment_value: self.payment_value,
            overdue_penalty: self.overdue_penalty.unwrap_or(Money::ZERO),
            event_id: self.event_id,
        }
    }
}

/// Partial update of a payment definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentChanges {
    pub title: Option<String>,
    pub created_at: Option<Timestamp>,
    pub due_date: Option<Date>,
    pub payment_value: Option<Money>,
    pub overdue_penalty: Option<Money>,
    pub event_id: Option<EventId>,
}

impl PaymentChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.created_at.is_none()
            && self.due_date.is_none()
            && self.payment_value.is_none()
            && self.overdue_penalty.is_none()
            && self.event_id.is_none()
    }
}

/// Attribute filter over the payment catalog; unset fields match anything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentFilter {
    pub payment_id: Option<PaymentId>,
    pub title: Option<String>,
    pub created_at: Option<Timestamp>,
    pub due_date: Option<Date>,
    pub payment_value: Option<Money>,
    pub overdue_penalty: Option<Money>,
    pub event_id: Option<EventId>,
}

impl PaymentFilter {
    #[must_use]
    pub fn matches(&self, payment: &PaymentDefinition) -> bool {
        self.payment_id.is_none_or(|id| id == payment.payment_id)
            && self.title.as_ref().is_none_or(|t| *t == payment.title)
            && self.created_at.is_none_or(|c| c == payment.created_at)
            && self.due_date.is_none_or(|d| d == payment.due_date)
            && self.payment_value.is_none_or(|v| v == payment.payment_value)
            && self
                .overdue_penalty
                .is_none_or(|p| p == payment.overdue_penalty)
            && self.event_id.is_none_or(|e| Some(e) == payment.event_id)
    }
}
