// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod due_scope;
mod error;
mod ledger;
mod member;
mod payment;
mod timestamp;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use due_scope::DueScope;
pub use error::DomainError;
pub use ledger::{
    AssignmentChanges, AssignmentEntry, AssignmentFilter, AssignmentKey, SubmissionEntry,
    SubmissionFilter, compute_total_paid,
};
pub use member::{Member, MemberDraft, MemberFilter, MemberStatus, duplicate_fingerprint};
pub use payment::{PaymentChanges, PaymentDefinition, PaymentDraft, PaymentFilter};
pub use timestamp::{Timestamp, format_date, parse_date};
pub use types::{AssignmentStatus, EventId, IdCounter, MemberId, Money, PaymentId};
pub use validation::{
    validate_member_draft, validate_overdue_penalty, validate_payment_changes,
    validate_payment_draft, validate_payment_value, validate_title,
};
