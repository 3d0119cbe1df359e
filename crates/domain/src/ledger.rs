// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment and submission ledger entries.
//!
//! An assignment is an outstanding obligation of one member to pay one
//! payment. Submitting it moves the obligation into the submission ledger,
//! which records what was actually charged. The two ledgers never hold the
//! same (member, payment) obligation at the same time once a move completes.

use crate::payment::PaymentDefinition;
use crate::timestamp::Timestamp;
use crate::types::{AssignmentStatus, MemberId, Money, PaymentId};

/// Identity of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey {
    pub member_id: MemberId,
    pub payment_id: PaymentId,
}

impl AssignmentKey {
    #[must_use]
    pub const fn new(member_id: MemberId, payment_id: PaymentId) -> Self {
        Self {
            member_id,
            payment_id,
        }
    }
}

impl std::fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "member {} / payment {}",
            self.member_id, self.payment_id
        )
    }
}

/// An outstanding payment obligation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEntry {
    pub member_id: MemberId,
    pub payment_id: PaymentId,
    pub status: AssignmentStatus,
    pub assigned_on: Timestamp,
}

impl AssignmentEntry {
    #[must_use]
    pub const fn key(&self) -> AssignmentKey {
        AssignmentKey::new(self.member_id, self.payment_id)
    }

    /// Applies a partial update in place. Absent fields are left untouched.
    pub const fn apply(&mut self, changes: &AssignmentChanges) {
        if let Some(assigned_on) = changes.assigned_on {
            self.assigned_on = assigned_on;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Partial update of an assignment's mutable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentChanges {
    pub assigned_on: Option<Timestamp>,
    pub status: Option<AssignmentStatus>,
}

impl AssignmentChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.assigned_on.is_none() && self.status.is_none()
    }
}

/// Attribute filter over the assignment ledger; unset fields match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentFilter {
    pub member_id: Option<MemberId>,
    pub payment_id: Option<PaymentId>,
    pub status: Option<AssignmentStatus>,
    pub assigned_on: Option<Timestamp>,
}

impl AssignmentFilter {
    #[must_use]
    pub fn matches(&self, entry: &AssignmentEntry) -> bool {
        self.member_id.is_none_or(|m| m == entry.member_id)
            && self.payment_id.is_none_or(|p| p == entry.payment_id)
            && self.status.is_none_or(|s| s == entry.status)
            && self.assigned_on.is_none_or(|a| a == entry.assigned_on)
    }
}

/// A completed payment. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEntry {
    pub payment_id: PaymentId,
    pub member_id: MemberId,
    pub assigned_on: Timestamp,
    pub submitted_on: Timestamp,
    pub overdue: bool,
    pub total_paid: Money,
}

impl SubmissionEntry {
    /// Closes out an assignment against its payment definition.
    ///
    /// `definition` may be absent if the payment was removed from the catalog
    /// after assignment; the charge is then zero.
    #[must_use]
    pub fn settle(
        assignment: &AssignmentEntry,
        definition: Option<&PaymentDefinition>,
        submitted_on: Timestamp,
    ) -> Self {
        Self {
            payment_id: assignment.payment_id,
            member_id: assignment.member_id,
            assigned_on: assignment.assigned_on,
            submitted_on,
            overdue: assignment.status == AssignmentStatus::Overdue,
            total_paid: compute_total_paid(definition, assignment.status),
        }
    }

    #[must_use]
    pub const fn key(&self) -> AssignmentKey {
        AssignmentKey::new(self.member_id, self.payment_id)
    }
}

/// Attribute filter over the submission ledger; unset fields match anything.
///
/// An empty filter selects the entire ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmissionFilter {
    pub member_id: Option<MemberId>,
    pub payment_id: Option<PaymentId>,
    pub assigned_on: Option<Timestamp>,
    pub submitted_on: Option<Timestamp>,
    pub overdue: Option<bool>,
    pub total_paid: Option<Money>,
}

impl SubmissionFilter {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.member_id.is_none()
            && self.payment_id.is_none()
            && self.assigned_on.is_none()
            && self.submitted_on.is_none()
            && self.overdue.is_none()
            && self.total_paid.is_none()
    }

    #[must_use]
    pub fn matches(&self, entry: &SubmissionEntry) -> bool {
        self.member_id.is_none_or(|m| m == entry.member_id)
            && self.payment_id.is_none_or(|p| p == entry.payment_id)
            && self.assigned_on.is_none_or(|a| a == entry.assigned_on)
            && self.submitted_on.is_none_or(|s| s == entry.submitted_on)
            && self.overdue.is_none_or(|o| o == entry.overdue)
            && self.total_paid.is_none_or(|t| t == entry.total_paid)
    }
}

/// Amount charged when an assignment in `status` is submitted.
///
/// `payment_value`, plus `overdue_penalty` when the assignment is overdue.
/// A missing definition charges nothing.
#[must_use]
pub fn compute_total_paid(
    definition: Option<&PaymentDefinition>,
    status: AssignmentStatus,
) -> Money {
    definition.map_or(Money::ZERO, |d| d.amount_owed(status))
}
